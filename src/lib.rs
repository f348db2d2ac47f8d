//! # Quiz Ingest
//!
//! 把教师上传的表格、Word 文档和题目图片解析成统一的四选一题目
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（OCR 引擎进程），只暴露能力
//! - `OcrEngine` - 图片 → 文本
//! - `TesseractEngine` - 基于 tesseract 命令行的实现，按批次获取/释放
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 无状态的单项能力
//! - `code_detector` - 判断一行是否像代码
//! - `format_preserver` - 代码题干包进 `<pre><code>` 并转义
//! - `indentation` - 为丢失缩进的代码恢复缩进
//! - `ocr_cleanup` - OCR 固定纠错
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的逐行累积流程
//! - `LineGrammar` - 行分类（Word 严格 / OCR 宽松）
//! - `QuestionState` - 题目累积状态机
//!
//! ### ④ 导入层（Loaders）
//! - `loaders/` - 每种文件格式一个解析器
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/ingest` - 上传校验、分发、OCR 引擎生命周期和统计
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod loaders;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{OcrEngine, TesseractEngine};
pub use loaders::{parse_images, parse_spreadsheet, parse_word_document};
pub use models::{Question, Quiz, QuizMeta, Upload, UploadKind};
pub use orchestrator::{App, IngestReport, IngestStats};
