//! Word 文档导入
//!
//! docx → 中间 HTML 标记 → 纯文本 → 逐行解析。
//! 结构化转换找不到段落时退回纯文本提取。
//!
//! 文本格式：
//! ```text
//! Q1. 题干 (2 marks) [Negative: 0.5]
//! A) 选项
//! B) 正确选项*
//! C) 选项
//! D) 选项
//! ```

use crate::error::{AppError, AppResult, DecodeError, SourceKind};
use crate::models::question::Question;
use crate::services::format_preserver::preserve_formatting;
use crate::utils::logging::truncate_text;
use crate::workflow::{collect_questions, PendingQuestion, WordGrammar};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use tracing::{debug, info, warn};

/// 旧版 .doc（OLE 复合文档）文件头
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// 结构化结果短于该长度时改用纯文本提取
const MIN_STRUCTURED_CHARS: usize = 50;

/// 要去掉标签、保留内容的行内格式
static INLINE_TAGS: phf::Set<&'static str> = phf::phf_set! {
    "strong", "b", "em", "i", "u", "span",
};

static BLOCK_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|div)>|<br\s*/?>").expect("Invalid regex pattern"));

static BLOCK_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:p|div)(?:\s[^>]*)?>").expect("Invalid regex pattern"));

static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?([A-Za-z]+)(?:\s[^>]*)?>").expect("Invalid regex pattern"));

static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("Invalid regex pattern"));

/// 解析 Word 文档字节流
pub fn parse_word_document(bytes: &[u8]) -> AppResult<Vec<Question>> {
    if bytes.starts_with(&OLE_MAGIC) {
        return Err(DecodeError::UnsupportedLegacyFormat.into());
    }

    let xml = read_document_xml(bytes)?;
    let markup = docx_to_markup(&xml)?;
    let mut text = markup_to_text(&markup);

    if !text.contains('\n') || text.chars().count() < MIN_STRUCTURED_CHARS {
        info!("结构化转换未找到段落，改用纯文本提取");
        text = docx_raw_text(&xml)?;
    }

    debug!("Word 文本: {}", truncate_text(&text, 200));
    parse_word_text(&text)
}

/// 解析已提取的 Word 文本
pub fn parse_word_text(text: &str) -> AppResult<Vec<Question>> {
    let questions: Vec<Question> = collect_questions(&WordGrammar, text)
        .into_iter()
        .filter_map(finalize)
        .collect();

    if questions.is_empty() {
        return Err(AppError::no_questions(SourceKind::WordDocument));
    }

    info!("✓ Word 文档解析出 {} 道题目", questions.len());
    Ok(questions)
}

fn finalize(pending: PendingQuestion) -> Option<Question> {
    let Some(options) = pending.option_texts() else {
        debug!(
            "Q{} 只有 {} 个选项，丢弃",
            pending.number,
            pending.options.len()
        );
        return None;
    };

    Question::new(
        preserve_formatting(&pending.text),
        options,
        pending.correct_index(),
        pending.marks.unwrap_or(1),
        pending.negative_marks.unwrap_or(0.0),
    )
    .map_err(|e| warn!("⚠️ Q{} 无效，跳过: {}", pending.number, e))
    .ok()
}

/// 从 docx 压缩包中读取 `word/document.xml`
fn read_document_xml(bytes: &[u8]) -> AppResult<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(AppError::invalid_word_document)?;

    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| AppError::invalid_word_document(format!("缺少 word/document.xml: {}", e)))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(AppError::invalid_word_document)?;
    Ok(xml)
}

/// document.xml 中关心的结构事件
#[derive(Debug, Clone, PartialEq)]
enum DocEvent {
    ParagraphStart,
    ParagraphEnd,
    RunStart,
    RunEnd,
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Text(String),
    Tab,
    Break,
}

/// 遍历 document.xml，把关心的元素转成 `DocEvent`
fn walk_document(xml: &str, mut on_event: impl FnMut(DocEvent)) -> AppResult<()> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut in_run = false;
    let mut in_run_props = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => on_event(DocEvent::ParagraphStart),
                b"w:r" => {
                    in_run = true;
                    on_event(DocEvent::RunStart);
                }
                b"w:rPr" => in_run_props = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => {
                    on_event(DocEvent::ParagraphStart);
                    on_event(DocEvent::ParagraphEnd);
                }
                b"w:b" if in_run && in_run_props => on_event(DocEvent::Bold(toggle_on(&e))),
                b"w:i" if in_run && in_run_props => on_event(DocEvent::Italic(toggle_on(&e))),
                b"w:u" if in_run && in_run_props => {
                    on_event(DocEvent::Underline(toggle_on(&e)))
                }
                b"w:tab" if in_run && !in_run_props => on_event(DocEvent::Tab),
                b"w:br" | b"w:cr" if in_run => on_event(DocEvent::Break),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => on_event(DocEvent::ParagraphEnd),
                b"w:r" => {
                    in_run = false;
                    on_event(DocEvent::RunEnd);
                }
                b"w:rPr" => in_run_props = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(AppError::invalid_word_document)?;
                on_event(DocEvent::Text(text.into_owned()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::invalid_word_document(format!(
                    "XML 解析错误 (位置 {}): {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(())
}

/// `<w:b/>` 开启，`<w:b w:val="0"/>` 关闭；下划线 `none` 也视为关闭
fn toggle_on(e: &BytesStart<'_>) -> bool {
    match e.try_get_attribute("w:val") {
        Ok(Some(attr)) => !matches!(
            attr.value.as_ref(),
            b"0" | b"false" | b"off" | b"none"
        ),
        _ => true,
    }
}

/// 把 document.xml 转成简单 HTML：段落 `<p>`，粗体/斜体/下划线转成对应标签
pub fn docx_to_markup(xml: &str) -> AppResult<String> {
    let mut out = String::new();
    let mut run = String::new();
    let (mut bold, mut italic, mut underline) = (false, false, false);

    walk_document(xml, |event| match event {
        DocEvent::ParagraphStart => out.push_str("<p>"),
        DocEvent::ParagraphEnd => out.push_str("</p>"),
        DocEvent::RunStart => {
            run.clear();
            bold = false;
            italic = false;
            underline = false;
        }
        DocEvent::Bold(on) => bold = on,
        DocEvent::Italic(on) => italic = on,
        DocEvent::Underline(on) => underline = on,
        DocEvent::Text(text) => run.push_str(&html_escape::encode_text(&text)),
        DocEvent::Tab => run.push('\t'),
        DocEvent::Break => run.push_str("<br />"),
        DocEvent::RunEnd => {
            if run.is_empty() {
                return;
            }
            let tags: Vec<&str> = [(bold, "strong"), (italic, "em"), (underline, "u")]
                .into_iter()
                .filter_map(|(on, tag)| on.then_some(tag))
                .collect();
            for tag in &tags {
                out.push_str(&format!("<{}>", tag));
            }
            out.push_str(&run);
            for tag in tags.iter().rev() {
                out.push_str(&format!("</{}>", tag));
            }
            run.clear();
        }
    })?;

    Ok(out)
}

/// 中间标记转纯文本
///
/// 段落边界变换行，行内格式标签去掉保留内容，字符实体还原为字面字符（`&nbsp;` 变为空格），
/// 连续空行合并为一个。
pub fn markup_to_text(markup: &str) -> String {
    let text = BLOCK_BREAK.replace_all(markup, "\n");
    let text = BLOCK_OPEN.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, |caps: &regex::Captures<'_>| {
        if INLINE_TAGS.contains(caps[1].to_ascii_lowercase().as_str()) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    let text = html_escape::decode_html_entities(&text).replace('\u{a0}', " ");

    BLANK_RUNS.replace_all(&text, "\n\n").into_owned()
}

/// 纯文本模式：只拼接文字，段落和换行符号变成 `\n`
pub fn docx_raw_text(xml: &str) -> AppResult<String> {
    let mut out = String::new();

    walk_document(xml, |event| match event {
        DocEvent::Text(text) => out.push_str(&text),
        DocEvent::Tab => out.push('\t'),
        DocEvent::Break | DocEvent::ParagraphEnd => out.push('\n'),
        _ => {}
    })?;

    Ok(out)
}
