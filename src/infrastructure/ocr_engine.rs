//! OCR 引擎抽象 - 基础设施层
//!
//! 只暴露"图片 → 文本"的能力，不认识 Question。

use crate::error::OcrError;
use std::future::Future;

/// 识别时允许输出的字符：字母数字、常见标点、空白以及选项纠错用到的 `©`
pub const CHAR_ALLOWLIST: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789",
    " .,;:!?'\"`()[]{}<>+-*/=_%&|#@$^~\\",
    "©",
);

/// OCR 引擎句柄
///
/// `recognize` 借用 `&mut self`，同一个引擎不会被重叠调用。
pub trait OcrEngine {
    /// 识别一张图片，返回原始文本
    fn recognize(&mut self, image: &[u8]) -> impl Future<Output = Result<String, OcrError>> + Send;
}
