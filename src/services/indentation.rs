//! 缩进恢复 - 业务能力层
//!
//! OCR 和纯文本提取会丢失行首空白。这里用简单的块跟踪规则重新推算缩进：
//! 以 `:` / `{` 结尾的块开始行让深度加一，`}` 和 else 类关键字让深度减一。
//! 结果只是"看起来合理"，不保证还原原始缩进。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// 每级缩进的空格数
const INDENT_UNIT: &str = "    ";

static BLOCK_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:def|class|function|if|for|while|try|with)\b").expect("Invalid regex pattern")
});

static SCOPE_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:def|class|function)\b").expect("Invalid regex pattern"));

static CONTINUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\}?\s*(?:else|elif|except|finally|catch)\b").expect("Invalid regex pattern")
});

static STANDALONE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][\w.]*\s*\(.*\)\s*;?$").expect("Invalid regex pattern")
});

static TOP_LEVEL_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:def|class|if|for|while)\b").expect("Invalid regex pattern")
});

/// 单次调用内的缩进状态
#[derive(Debug, Default)]
struct IndentState {
    depth: usize,
}

impl IndentState {
    fn emit(&self, trimmed: &str) -> String {
        format!("{}{}", INDENT_UNIT.repeat(self.depth), trimmed)
    }

    fn open(&mut self) {
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn reset(&mut self) {
        self.depth = 0;
    }
}

fn opens_block(trimmed: &str) -> bool {
    trimmed.ends_with(':') || trimmed.ends_with('{')
}

/// 顶层函数调用的启发式判断
///
/// 已在块内时，独立的函数调用行如果后面是空行或新的顶层语句，
/// 视为回到顶层（例如定义完函数后紧跟的调用）。
fn is_dedented_call(trimmed: &str, next: Option<&str>, depth: usize) -> bool {
    if depth == 0 || !STANDALONE_CALL.is_match(trimmed) {
        return false;
    }
    match next.map(str::trim) {
        Some(next) => next.is_empty() || TOP_LEVEL_START.is_match(next),
        None => false,
    }
}

/// 恢复缩进，返回与输入等长的行列表
pub fn restore_indentation<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut state = IndentState::default();
    let mut out = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.as_ref().trim();

        let restored = if trimmed.is_empty() {
            String::new()
        } else if CONTINUATION.is_match(trimmed) {
            state.close();
            let restored = state.emit(trimmed);
            if opens_block(trimmed) {
                state.open();
            }
            restored
        } else if BLOCK_OPENER.is_match(trimmed) && opens_block(trimmed) {
            if SCOPE_OPENER.is_match(trimmed) {
                state.reset();
            }
            let restored = state.emit(trimmed);
            state.open();
            restored
        } else if trimmed.starts_with('}') {
            state.close();
            state.emit(trimmed)
        } else if trimmed.ends_with(':') {
            let restored = state.emit(trimmed);
            state.open();
            restored
        } else if is_dedented_call(trimmed, lines.get(i + 1).map(AsRef::as_ref), state.depth) {
            state.reset();
            state.emit(trimmed)
        } else {
            state.emit(trimmed)
        };

        trace!(depth = state.depth, line = %restored, "缩进恢复");
        out.push(restored);
    }

    out
}
