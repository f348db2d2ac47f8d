//! 题目累积状态机
//!
//! 逐行推进，遇到下一个题目开头（或输入结束）时才把当前题交出去。
//! 第 4 个选项之后、下一个题目开头之前的内容会被忽略。

use crate::models::question::OPTION_COUNT;
use crate::services::code_detector::has_code_content;
use crate::workflow::line_grammar::{LineGrammar, OptionLine, ParsedLine, QuestionHeader};
use tracing::{debug, trace};

/// 正在累积的题目（尚未校验）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingQuestion {
    pub number: u32,
    /// 题干：代码行按原样换行拼接，普通文本用单个空格拼接
    pub text: String,
    /// 题干原始行（供 OCR 恢复缩进）
    pub lines: Vec<String>,
    pub options: Vec<OptionLine>,
    pub marks: Option<u32>,
    pub negative_marks: Option<f64>,
}

impl PendingQuestion {
    fn from_header(header: QuestionHeader) -> Self {
        let lines = if header.text.is_empty() {
            Vec::new()
        } else {
            vec![header.text.clone()]
        };
        Self {
            number: header.number,
            text: header.text,
            lines,
            options: Vec::new(),
            marks: header.marks,
            negative_marks: header.negative_marks,
        }
    }

    fn push_body(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        self.lines.push(raw.trim_end().to_string());

        let leading_spaces = raw.len() - raw.trim_start_matches(' ').len();
        if has_code_content(raw) || leading_spaces >= 2 {
            if !self.text.is_empty() {
                self.text.push('\n');
            }
            self.text.push_str(raw);
        } else {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(trimmed);
        }
    }

    /// 选项是否已满
    pub fn is_complete(&self) -> bool {
        self.options.len() == OPTION_COUNT
    }

    /// 第一个被标记的选项下标，没有标记时为 0
    pub fn correct_index(&self) -> usize {
        self.options.iter().position(|o| o.marked).unwrap_or(0)
    }

    /// 恰好四个选项时返回选项文本
    pub fn option_texts(&self) -> Option<[String; OPTION_COUNT]> {
        self.options
            .iter()
            .map(|o| o.text.clone())
            .collect::<Vec<_>>()
            .try_into()
            .ok()
    }
}

/// 累积状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuestionState {
    /// 还没遇到题目开头
    #[default]
    NoCurrentQuestion,
    /// 已有题目开头，尚无选项
    AccumulatingBody(PendingQuestion),
    /// 已收集 1-4 个选项
    AccumulatingOptions(PendingQuestion),
}

impl QuestionState {
    /// 当前题已收集的选项数
    pub fn options_seen(&self) -> usize {
        match self {
            QuestionState::NoCurrentQuestion => 0,
            QuestionState::AccumulatingBody(_) => 0,
            QuestionState::AccumulatingOptions(p) => p.options.len(),
        }
    }

    /// 推进一行；遇到新题目开头时返回上一道题
    pub fn step(self, line: ParsedLine<'_>) -> (Self, Option<PendingQuestion>) {
        match (self, line) {
            (state, ParsedLine::Header(header)) => {
                trace!(number = header.number, "新题目开头");
                let finished = state.finish();
                (
                    QuestionState::AccumulatingBody(PendingQuestion::from_header(header)),
                    finished,
                )
            }

            (QuestionState::NoCurrentQuestion, _) => (QuestionState::NoCurrentQuestion, None),

            (QuestionState::AccumulatingBody(mut pending), ParsedLine::Option(option)) => {
                pending.options.push(option);
                (QuestionState::AccumulatingOptions(pending), None)
            }
            (QuestionState::AccumulatingBody(mut pending), ParsedLine::Body(raw)) => {
                pending.push_body(raw);
                (QuestionState::AccumulatingBody(pending), None)
            }

            (QuestionState::AccumulatingOptions(pending), _) if pending.is_complete() => {
                (QuestionState::AccumulatingOptions(pending), None)
            }
            (QuestionState::AccumulatingOptions(mut pending), ParsedLine::Option(option)) => {
                pending.options.push(option);
                (QuestionState::AccumulatingOptions(pending), None)
            }
            (QuestionState::AccumulatingOptions(mut pending), ParsedLine::Body(raw)) => {
                pending.push_body(raw);
                (QuestionState::AccumulatingOptions(pending), None)
            }
        }
    }

    /// 输入结束，交出当前题
    pub fn finish(self) -> Option<PendingQuestion> {
        match self {
            QuestionState::NoCurrentQuestion => None,
            QuestionState::AccumulatingBody(p) | QuestionState::AccumulatingOptions(p) => Some(p),
        }
    }
}

/// 用指定语法把整段文本切分成待定题目（含不完整的题）
pub fn collect_questions<G: LineGrammar>(grammar: &G, text: &str) -> Vec<PendingQuestion> {
    let mut state = QuestionState::default();
    let mut collected = Vec::new();

    for line in text.lines() {
        let parsed = grammar.classify(line, state.options_seen());
        let (next, finished) = state.step(parsed);
        state = next;
        collected.extend(finished);
    }
    collected.extend(state.finish());

    debug!("切分出 {} 道待定题目", collected.len());
    collected
}
