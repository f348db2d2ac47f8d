//! 格式保留 - 业务能力层
//!
//! 把看起来像代码的题干包进 `<pre><code>` 块，按内容选择转义方式，
//! 保证前端按 HTML 渲染时能原样显示。非代码文本原样返回。

use crate::services::code_detector::has_code_content;
use once_cell::sync::Lazy;
use regex::Regex;

/// 代码块开始标记
pub const CODE_BLOCK_OPEN: &str = "<pre><code>";
/// 代码块结束标记
pub const CODE_BLOCK_CLOSE: &str = "</code></pre>";

/// 出现这些片段说明文本本身是"要显示出来的 HTML"
static MARKUP_MARKERS: phf::Set<&'static str> = phf::phf_set! {
    "<html",
    "<!doctype",
    "<head",
    "<body",
    "<div",
    "<p>",
    "<p ",
    "<span",
    "<table",
    "<script",
    "<style",
};

static ENTITY_AT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("Invalid regex pattern")
});

/// 文本是否包含要按字面显示的 HTML 标记
pub fn looks_like_markup(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    MARKUP_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// 保留代码格式
///
/// - 非代码文本：原样返回
/// - HTML 代码：全部转义（`&` `<` `>` `"` `'`）后包进代码块
/// - 其他代码：`<` `>` 多为运算符，只转义不属于实体的 `&`
pub fn preserve_formatting(text: &str) -> String {
    if !has_code_content(text) {
        return text.to_string();
    }

    let body = if looks_like_markup(text) {
        escape_markup(text)
    } else {
        escape_bare_ampersands(text)
    };

    format!("{}{}{}", CODE_BLOCK_OPEN, body, CODE_BLOCK_CLOSE)
}

/// 完整 HTML 转义（`&` `<` `>` `"` `'`）
fn escape_markup(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// 转义不属于字符实体的 `&`
fn escape_bare_ampersands(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        if ch == '&' && !ENTITY_AT_START.is_match(&text[i..]) {
            out.push_str("&amp;");
        } else {
            out.push(ch);
        }
    }
    out
}
