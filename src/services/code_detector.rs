//! 代码行识别 - 业务能力层
//!
//! 只负责判断"这一行看起来像不像代码"，按顺序尝试一组规则，
//! 命中任意一条即认为是代码。允许误判，不会对任何输入报错。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// 一条代码识别规则
///
/// `raw` 是原始行（保留前导空白），`trimmed` 是去除首尾空白后的行。
struct CodeRule {
    name: &'static str,
    matches: fn(raw: &str, trimmed: &str) -> bool,
}

static LEADING_INDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {2,}").expect("Invalid regex pattern"));

static KEYWORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?:def|class)\s+\w+",
        r"\bfunction\b\s*\w*\s*\(",
        r"^(?:if|elif|else|for|while|return|try|except|catch|finally)\b",
        r"\bprint\s*\(",
        r"console\.log\s*\(",
        r"^import\s+[\w.]+",
        r"^from\s+[\w.]+\s+import\b",
        r"include\s*<",
        r"\busing\s+namespace\b",
        r"^(?:public|private|protected)\b",
        r"\bint\s+main\s*\(",
        r"^(?:var|let|const)\s+\w+\s*=",
        r"^(?:unsigned\s+)?(?:int|float|double|char|bool|void|long|short|string|auto)\s+\**\w+\s*(?:=|;|\(|\[|,)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex pattern"))
    .collect()
});

static BRACE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{.*\}").expect("Invalid regex pattern"));

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][\w-]*(?:\s[^>]*)?/?>").expect("Invalid regex pattern"));

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:#|//)").expect("Invalid regex pattern"));

static CALL_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+\s*=\s*[A-Za-z_][\w.]*\s*\(").expect("Invalid regex pattern")
});

/// 按顺序尝试的规则表
static RULES: &[CodeRule] = &[
    CodeRule {
        name: "leading-indent",
        matches: |raw, _| LEADING_INDENT.is_match(raw),
    },
    CodeRule {
        name: "keyword",
        matches: |_, trimmed| KEYWORDS.iter().any(|re| re.is_match(trimmed)),
    },
    CodeRule {
        name: "brace-block",
        matches: |_, trimmed| BRACE_BLOCK.is_match(trimmed),
    },
    CodeRule {
        name: "markup-tag",
        matches: |_, trimmed| MARKUP_TAG.is_match(trimmed),
    },
    CodeRule {
        name: "comment",
        matches: |raw, _| COMMENT.is_match(raw),
    },
    CodeRule {
        name: "call-assignment",
        matches: |_, trimmed| CALL_ASSIGNMENT.is_match(trimmed),
    },
];

/// 返回第一条命中的规则名（空行返回 `None`）
pub fn matching_rule(line: &str) -> Option<&'static str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let rule = RULES.iter().find(|rule| (rule.matches)(line, trimmed))?;
    trace!(rule = rule.name, line = trimmed, "代码行规则命中");
    Some(rule.name)
}

/// 判断一行文本是否像代码
pub fn is_code_line(line: &str) -> bool {
    matching_rule(line).is_some()
}

/// 任意一行像代码即返回 true
pub fn has_code_content(text: &str) -> bool {
    text.split('\n').any(is_code_line)
}
