//! 导入层（Loaders）
//!
//! 每种输入格式一个解析器，输入原始字节，输出 `Vec<Question>`。
//! 解析出零道题时返回 `AppError::NoQuestions`，不会返回空列表。
//!
//! ```text
//! spreadsheet: xlsx / xls → 行 → Question
//! word:        docx → 标记 → 文本 → WordGrammar → Question
//! image:       图片 → OcrEngine → 纠错 → OcrGrammar → Question
//! ```

pub mod image;
pub mod spreadsheet;
pub mod word;

pub use image::{parse_images, parse_ocr_text};
pub use spreadsheet::{parse_rows, parse_spreadsheet};
pub use word::{parse_word_document, parse_word_text};
