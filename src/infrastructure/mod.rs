//! 基础设施层（Infrastructure Layer）
//!
//! 持有稀缺的外部资源（OCR 引擎进程），只暴露最基础的能力。
//! 由编排层按批次获取和释放。

pub mod ocr_engine;
pub mod tesseract;

pub use ocr_engine::{OcrEngine, CHAR_ALLOWLIST};
pub use tesseract::TesseractEngine;
