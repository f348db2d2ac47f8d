//! 行语法
//!
//! 把一行文本识别为：题目开头 / 选项 / 题干续行。
//! Word 文本格式规整，使用严格语法；OCR 文本噪声多，使用宽松语法。

use crate::services::ocr_cleanup::normalize_option_marker;
use once_cell::sync::Lazy;
use regex::Regex;

static MARKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*(\d+)\s*marks?\s*\)").expect("Invalid regex pattern"));

static NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*negative\s*:\s*(\d+(?:\.\d+)?)\s*\]").expect("Invalid regex pattern")
});

static WORD_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Q(\d+)\.\s*(.*)$").expect("Invalid regex pattern"));

static WORD_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-D])\)\s*(.*)$").expect("Invalid regex pattern"));

static OCR_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[Qq]\s*(\d+)\s*[.:)]|([1-9]\d*)[.)](?:\s+|$)|(?i:question)\s+(\d+)\s*[.:)]?)\s*(.*)$")
        .expect("Invalid regex pattern")
});

static OCR_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([A-Da-d|lIoO0©])\s*([).])\s*(.*)$").expect("Invalid regex pattern")
});

static OCR_MARKED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s*\*|\s+[xX])$").expect("Invalid regex pattern"));

/// 题目开头行（已去掉分值等元数据）
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionHeader {
    pub number: u32,
    pub text: String,
    pub marks: Option<u32>,
    pub negative_marks: Option<f64>,
}

impl QuestionHeader {
    /// 从题号后的文本中提取 `(2 marks)` 与 `[Negative: 0.5]`
    fn parse(number: u32, rest: &str) -> Self {
        let marks = MARKS
            .captures(rest)
            .and_then(|c| c[1].parse::<u32>().ok())
            .filter(|m| *m >= 1);
        let negative_marks = NEGATIVE
            .captures(rest)
            .and_then(|c| c[1].parse::<f64>().ok());

        let text = MARKS.replace_all(rest, "");
        let text = NEGATIVE.replace_all(&text, "");

        Self {
            number,
            text: text.trim().to_string(),
            marks,
            negative_marks,
        }
    }
}

/// 一个选项
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLine {
    pub letter: char,
    pub text: String,
    /// 带 `*`（OCR 还接受 `x`）标记的正确选项
    pub marked: bool,
}

/// 一行的识别结果
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine<'a> {
    Header(QuestionHeader),
    Option(OptionLine),
    Body(&'a str),
}

/// 行语法
pub trait LineGrammar {
    /// `options_seen` 是当前题已收集的选项数，用于宽松语法猜测选项字母
    fn classify<'a>(&self, line: &'a str, options_seen: usize) -> ParsedLine<'a>;
}

/// Word 文档语法：`Q1.` 开头，`A)` - `D)` 选项，选项首尾的 `*` 标记答案
#[derive(Debug, Default, Clone, Copy)]
pub struct WordGrammar;

impl LineGrammar for WordGrammar {
    fn classify<'a>(&self, line: &'a str, _options_seen: usize) -> ParsedLine<'a> {
        let trimmed = line.trim();

        if let Some(caps) = WORD_HEADER.captures(trimmed) {
            let number = caps[1].parse().unwrap_or(0);
            return ParsedLine::Header(QuestionHeader::parse(number, &caps[2]));
        }

        if let Some(caps) = WORD_OPTION.captures(trimmed) {
            let letter = caps[1].chars().next().unwrap_or('A');
            let raw = caps[2].trim();
            let (text, marked) = match (raw.strip_suffix('*'), raw.strip_prefix('*')) {
                (Some(stripped), _) => (stripped.trim_end(), true),
                (None, Some(stripped)) => (stripped.trim_start(), true),
                (None, None) => (raw, false),
            };
            return ParsedLine::Option(OptionLine {
                letter,
                text: text.to_string(),
                marked,
            });
        }

        ParsedLine::Body(line)
    }
}

/// OCR 语法：接受 `Q1.` / `1.` / `Question 1` 开头，容忍选项字母识别错误，
/// `*` 或结尾的 `x` 标记答案
#[derive(Debug, Default, Clone, Copy)]
pub struct OcrGrammar;

impl LineGrammar for OcrGrammar {
    fn classify<'a>(&self, line: &'a str, options_seen: usize) -> ParsedLine<'a> {
        let trimmed = line.trim();

        if let Some(caps) = OCR_HEADER.captures(trimmed) {
            let number = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let rest = caps.get(4).map_or("", |m| m.as_str());
            return ParsedLine::Header(QuestionHeader::parse(number, rest));
        }

        if let Some(caps) = OCR_OPTION.captures(trimmed) {
            let marker = caps[1].chars().next().unwrap_or(' ');
            // `.` 只接受大写 A-D，避免把 `a.append(2)` "I." 之类的正文当成选项
            if &caps[2] == ")" || matches!(marker, 'A'..='D') {
                if let Some(letter) = normalize_option_marker(marker, options_seen) {
                    let raw = caps[3].trim();
                    let marked = OCR_MARKED.is_match(raw);
                    let text = if marked {
                        OCR_MARKED.replace(raw, "").trim_end().to_string()
                    } else {
                        raw.to_string()
                    };
                    return ParsedLine::Option(OptionLine {
                        letter,
                        text,
                        marked,
                    });
                }
            }
        }

        ParsedLine::Body(line)
    }
}
