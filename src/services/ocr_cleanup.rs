//! OCR 文本纠错 - 业务能力层
//!
//! 针对已知 OCR 误识别的固定替换表，以及选项字母被识别错时的兜底猜测。
//! 不做通用拼写纠错。

use crate::models::question::{OPTION_COUNT, OPTION_LETTERS};
use once_cell::sync::Lazy;
use regex::Regex;

/// `def f())):` 这类多余右括号
static DEF_EXTRA_PARENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(def\s+[A-Za-z_]\w*)\(\)\)+:").expect("Invalid regex pattern")
});

/// 按顺序应用的字面替换
static LITERAL_FIXES: phf::OrderedMap<&'static str, &'static str> = phf::phf_ordered_map! {
    "())):" => "):",
    "retum" => "return",
    "pnnt(" => "print(",
};

/// 常被误识别为选项字母的字符
static MARKER_LOOKALIKES: phf::Map<char, Option<char>> = phf::phf_map! {
    '|' => None,
    'l' => None,
    'I' => None,
    'o' => None,
    'O' => None,
    '0' => None,
    '©' => Some('C'),
};

/// 应用固定的 OCR 纠错替换
pub fn apply_ocr_corrections(text: &str) -> String {
    let mut fixed = DEF_EXTRA_PARENS.replace_all(text, "$1():").into_owned();
    for (&from, &to) in LITERAL_FIXES.entries() {
        if fixed.contains(from) {
            fixed = fixed.replace(from, to);
        }
    }
    fixed
}

/// 猜测被识别错的选项字母
///
/// `marker` 是选项括号前的那个字符，`options_seen` 是当前题已收集的选项数。
/// 真正的 A-D（不区分大小写）直接返回；形似字符优先用其固定含义，
/// 否则按顺序取下一个应出现的字母。
pub fn normalize_option_marker(marker: char, options_seen: usize) -> Option<char> {
    let upper = marker.to_ascii_uppercase();
    if OPTION_LETTERS.contains(&upper) {
        return Some(upper);
    }

    match MARKER_LOOKALIKES.get(&marker) {
        Some(Some(letter)) => Some(*letter),
        Some(None) if options_seen < OPTION_COUNT => Some(OPTION_LETTERS[options_seen]),
        _ => None,
    }
}
