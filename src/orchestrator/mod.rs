//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责上传文件的校验、分发和统计，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (处理 Vec<Upload>)
//!     ↓
//! loaders (处理单个文件 / 一批图片)
//!     ↓
//! workflow (逐行累积单道题)
//!     ↓
//! services (能力层：代码识别 / 格式保留 / 缩进恢复 / OCR 纠错)
//!     ↓
//! infrastructure (基础设施：OCR 引擎)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层获取和释放 OCR 引擎
//! 2. **向下依赖**：编排层 → loaders → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体解析判断

pub mod ingest;

pub use ingest::{App, IngestReport, IngestStats};
