use crate::error::{ConfigError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// 上传文件大小上限（5 MB）
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 单个上传文件的最大字节数
    pub max_upload_bytes: usize,
    /// OCR 语言模型
    pub ocr_language: String,
    /// tesseract 可执行文件路径
    pub tesseract_path: String,
    /// 页面分割模式（6 = 单一文本块）
    pub ocr_page_seg_mode: u8,
    /// 单张图片 OCR 超时（秒）
    pub ocr_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            ocr_language: "eng".to_string(),
            tesseract_path: "tesseract".to_string(),
            ocr_page_seg_mode: 6,
            ocr_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载（未设置或无法解析的项使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(config)
    }

    /// 加载配置：默认值 → 配置文件（可选）→ 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            max_upload_bytes: env_parse("QUIZ_MAX_UPLOAD_BYTES").unwrap_or(self.max_upload_bytes),
            ocr_language: std::env::var("QUIZ_OCR_LANGUAGE").unwrap_or(self.ocr_language),
            tesseract_path: std::env::var("QUIZ_TESSERACT_PATH").unwrap_or(self.tesseract_path),
            ocr_page_seg_mode: env_parse("QUIZ_OCR_PSM").unwrap_or(self.ocr_page_seg_mode),
            ocr_timeout_secs: env_parse("QUIZ_OCR_TIMEOUT_SECS").unwrap_or(self.ocr_timeout_secs),
            verbose_logging: env_parse("QUIZ_VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
