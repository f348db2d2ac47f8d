//! 上传导入 - 编排层
//!
//! ## 职责
//!
//! 1. **上传校验**：大小、空文件（MIME 白名单在创建 `Upload` 时已检查）
//! 2. **分发**：按文件类别交给对应的解析器
//! 3. **资源管理**：有图片时才获取 OCR 引擎，批次结束后释放
//! 4. **统计**：汇总成功/失败数量和题目总数
//!
//! 文档逐个解析；同一次调用中的所有图片组成一个 OCR 批次。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{OcrEngine, TesseractEngine};
use crate::loaders::{parse_images, parse_spreadsheet, parse_word_document};
use crate::models::{Question, Upload, UploadKind};
use crate::utils::logging::{
    log_startup, log_upload_complete, log_upload_start, print_final_stats,
};
use std::time::Duration;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

/// 一次导入的结果
#[derive(Debug, Default)]
pub struct IngestReport {
    pub questions: Vec<Question>,
    pub stats: IngestStats,
}

/// 导入统计（图片批次整体算一个单位）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub questions: usize,
}

impl IngestReport {
    fn record(&mut self, result: AppResult<Vec<Question>>) -> Result<usize, AppError> {
        self.stats.total += 1;
        match result {
            Ok(questions) => {
                let count = questions.len();
                self.stats.success += 1;
                self.stats.questions += count;
                self.questions.extend(questions);
                Ok(count)
            }
            Err(e) => {
                self.stats.failed += 1;
                Err(e)
            }
        }
    }
}

impl App {
    /// 创建应用
    pub fn new(config: Config) -> Self {
        log_startup(&config);
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.config.ocr_timeout_secs)
    }

    /// 导入单个上传文件
    ///
    /// 图片会单独获取一次 OCR 引擎；多张图片请使用 [`App::ingest_images`]。
    pub async fn ingest_upload(&self, upload: &Upload) -> AppResult<Vec<Question>> {
        match upload.kind {
            UploadKind::Image => self.ingest_images(std::slice::from_ref(upload)).await,
            _ => self.parse_document(upload),
        }
    }

    /// 导入一批图片（获取 Tesseract 引擎，结束后释放）
    pub async fn ingest_images(&self, uploads: &[Upload]) -> AppResult<Vec<Question>> {
        let mut engine = TesseractEngine::acquire(&self.config).await?;
        let result = self.ingest_images_with(&mut engine, uploads).await;
        engine.release();
        result
    }

    /// 用调用方提供的引擎导入一批图片
    ///
    /// 未通过校验的图片与 OCR 失败的图片一样，记录警告后跳过。
    pub async fn ingest_images_with<E: OcrEngine>(
        &self,
        engine: &mut E,
        uploads: &[Upload],
    ) -> AppResult<Vec<Question>> {
        let mut images: Vec<&[u8]> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            if upload.kind != UploadKind::Image {
                warn!("⚠️ {} 不是图片，已跳过", upload.file_name);
                continue;
            }
            match upload.validate(self.config.max_upload_bytes) {
                Ok(()) => images.push(&upload.bytes),
                Err(e) => warn!("⚠️ {} 未通过校验，已跳过: {}", upload.file_name, e),
            }
        }

        info!("🖼️ OCR 批次: {} 张图片", images.len());
        parse_images(engine, &images, self.ocr_timeout()).await
    }

    /// 导入全部上传文件：文档逐个解析，图片作为一个批次
    pub async fn ingest_all(&self, uploads: Vec<Upload>) -> IngestReport {
        let (images, documents): (Vec<Upload>, Vec<Upload>) = uploads
            .into_iter()
            .partition(|u| u.kind == UploadKind::Image);

        let mut report = self.ingest_documents(&documents);
        if !images.is_empty() {
            let result = self.ingest_images(&images).await;
            self.record_image_batch(&mut report, documents.len() + 1, images.len(), result);
        }

        log_report(&report);
        report
    }

    /// 与 [`App::ingest_all`] 相同，但使用调用方提供的 OCR 引擎
    pub async fn ingest_all_with<E: OcrEngine>(
        &self,
        engine: &mut E,
        uploads: Vec<Upload>,
    ) -> IngestReport {
        let (images, documents): (Vec<Upload>, Vec<Upload>) = uploads
            .into_iter()
            .partition(|u| u.kind == UploadKind::Image);

        let mut report = self.ingest_documents(&documents);
        if !images.is_empty() {
            let result = self.ingest_images_with(engine, &images).await;
            self.record_image_batch(&mut report, documents.len() + 1, images.len(), result);
        }

        log_report(&report);
        report
    }

    fn ingest_documents(&self, documents: &[Upload]) -> IngestReport {
        let mut report = IngestReport::default();

        for (idx, upload) in documents.iter().enumerate() {
            let index = idx + 1;
            log_upload_start(index, &upload.file_name, upload.kind.label(), upload.bytes.len());

            match report.record(self.parse_document(upload)) {
                Ok(count) => log_upload_complete(index, count),
                Err(e) => error!("[文件 {}] ❌ {}: {}", index, upload.file_name, e),
            }
        }

        report
    }

    fn record_image_batch(
        &self,
        report: &mut IngestReport,
        index: usize,
        image_count: usize,
        result: AppResult<Vec<Question>>,
    ) {
        log_upload_start(index, "图片批次", UploadKind::Image.label(), image_count);
        match report.record(result) {
            Ok(count) => log_upload_complete(index, count),
            Err(e) => error!("[文件 {}] ❌ 图片批次: {}", index, e),
        }
    }

    fn parse_document(&self, upload: &Upload) -> AppResult<Vec<Question>> {
        upload.validate(self.config.max_upload_bytes)?;
        match upload.kind {
            UploadKind::Spreadsheet => parse_spreadsheet(&upload.bytes),
            UploadKind::WordDocument => parse_word_document(&upload.bytes),
            UploadKind::Image => Err(AppError::invalid_question(format!(
                "{} 是图片，需要 OCR 引擎",
                upload.file_name
            ))),
        }
    }
}

fn log_report(report: &IngestReport) {
    let stats = &report.stats;
    print_final_stats(stats.success, stats.failed, stats.total, stats.questions);
}
