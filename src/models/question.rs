use crate::error::{AppError, AppResult};
use crate::services::code_detector::has_code_content;
use crate::services::format_preserver::CODE_BLOCK_OPEN;
use serde::Serialize;

/// 每道题固定的选项数量
pub const OPTION_COUNT: usize = 4;

/// 选项字母（A-D）
pub const OPTION_LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// 标准化后的单选题
///
/// 由解析器构造后不可变，只能通过 getter 读取。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_option_index: usize,
    marks: u32,
    negative_marks: f64,
    is_code_question: bool,
}

impl Question {
    /// 创建题目并校验约束
    ///
    /// # 参数
    /// - `text`: 题干（可能已包含 `<pre><code>` 代码块）
    /// - `options`: 四个选项
    /// - `correct_option_index`: 正确选项下标（0-3）
    /// - `marks`: 分值（>= 1）
    /// - `negative_marks`: 答错扣分（>= 0）
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_option_index: usize,
        marks: u32,
        negative_marks: f64,
    ) -> AppResult<Self> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(AppError::invalid_question("题干为空"));
        }
        if correct_option_index >= OPTION_COUNT {
            return Err(AppError::invalid_question(format!(
                "正确选项下标 {} 超出范围 [0, {}]",
                correct_option_index,
                OPTION_COUNT - 1
            )));
        }
        if marks < 1 {
            return Err(AppError::invalid_question("分值必须至少为 1"));
        }
        if !negative_marks.is_finite() || negative_marks < 0.0 {
            return Err(AppError::invalid_question(format!(
                "扣分值无效: {}",
                negative_marks
            )));
        }

        let is_code_question = text.starts_with(CODE_BLOCK_OPEN) || has_code_content(&text);

        Ok(Self {
            text,
            options,
            correct_option_index,
            marks,
            negative_marks,
            is_code_question,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    /// 正确选项字母
    pub fn correct_letter(&self) -> char {
        OPTION_LETTERS[self.correct_option_index]
    }

    pub fn marks(&self) -> u32 {
        self.marks
    }

    pub fn negative_marks(&self) -> f64 {
        self.negative_marks
    }

    /// 是否为代码题（仅供界面参考）
    pub fn is_code_question(&self) -> bool {
        self.is_code_question
    }

    /// 返回替换扣分值后的新题目（原题不变）
    pub(crate) fn with_negative_marks(&self, negative_marks: f64) -> Self {
        Self {
            negative_marks: negative_marks.max(0.0),
            ..self.clone()
        }
    }
}

/// 选项字母转下标（不区分大小写）
pub fn letter_to_index(letter: &str) -> Option<usize> {
    let mut chars = letter.trim().chars();
    let first = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    OPTION_LETTERS.iter().position(|&l| l == first)
}
