//! Tesseract 命令行引擎 - 基础设施层
//!
//! 每批图片 acquire 一次，批次结束后 release。
//! 图片通过 stdin 传入，文本从 stdout 读出；进程句柄被丢弃时会被杀掉。

use crate::config::Config;
use crate::error::OcrError;
use crate::infrastructure::ocr_engine::{OcrEngine, CHAR_ALLOWLIST};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// 基于 `tesseract` 可执行文件的 OCR 引擎
#[derive(Debug)]
pub struct TesseractEngine {
    binary: String,
    language: String,
    page_seg_mode: u8,
}

impl TesseractEngine {
    /// 检查引擎可用并创建句柄
    pub async fn acquire(config: &Config) -> Result<Self, OcrError> {
        let output = Command::new(&config.tesseract_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| OcrError::EngineUnavailable {
                path: config.tesseract_path.clone(),
                source,
            })?;

        // 旧版本把版本号写在 stderr
        let banner = if output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        let version = String::from_utf8_lossy(banner);
        info!(
            "🔍 OCR 引擎就绪: {} (语言 {})",
            version.lines().next().unwrap_or("tesseract").trim(),
            config.ocr_language
        );

        Ok(Self {
            binary: config.tesseract_path.clone(),
            language: config.ocr_language.clone(),
            page_seg_mode: config.ocr_page_seg_mode,
        })
    }

    /// 释放引擎
    pub fn release(self) {
        debug!("OCR 引擎已释放: {}", self.binary);
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.page_seg_mode.to_string())
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", CHAR_ALLOWLIST))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl OcrEngine for TesseractEngine {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrError> {
        let mut child = self.command().spawn().map_err(OcrError::SpawnFailed)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image).await.map_err(OcrError::SpawnFailed)?;
            stdin.shutdown().await.map_err(OcrError::SpawnFailed)?;
        }

        let output = child.wait_with_output().await.map_err(OcrError::SpawnFailed)?;
        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| OcrError::InvalidOutput)?;
        debug!("OCR 输出 {} 字符", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_engine_unavailable() {
        let config = Config {
            tesseract_path: "/nonexistent/tesseract-binary".to_string(),
            ..Config::default()
        };
        let err = TesseractEngine::acquire(&config).await.unwrap_err();
        assert!(matches!(err, OcrError::EngineUnavailable { .. }));
    }

    #[tokio::test]
    #[ignore] // 需要本机安装 tesseract
    async fn real_engine_rejects_non_image_bytes() {
        let mut engine = TesseractEngine::acquire(&Config::default()).await.unwrap();
        let result = engine.recognize(b"not an image").await;
        assert!(result.is_err());
        engine.release();
    }
}
