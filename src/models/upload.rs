use crate::error::{AppResult, UploadError};
use std::path::Path;

/// 上传文件类别（决定使用哪个解析器）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Spreadsheet,
    WordDocument,
    Image,
}

impl UploadKind {
    /// 根据 MIME 类型判断（白名单之外返回 `None`）
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => Some(UploadKind::Spreadsheet),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/msword" => Some(UploadKind::WordDocument),
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" => Some(UploadKind::Image),
            _ => None,
        }
    }

    /// 根据文件扩展名判断（命令行使用）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xls" => Some(UploadKind::Spreadsheet),
            "docx" | "doc" => Some(UploadKind::WordDocument),
            "jpg" | "jpeg" | "png" | "gif" => Some(UploadKind::Image),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadKind::Spreadsheet => "表格",
            UploadKind::WordDocument => "Word 文档",
            UploadKind::Image => "图片",
        }
    }
}

/// 一个待解析的上传文件
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub kind: UploadKind,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// 通过 MIME 类型创建上传
    pub fn from_mime(
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> AppResult<Self> {
        let kind = UploadKind::from_mime(mime).ok_or_else(|| UploadError::UnsupportedMimeType {
            mime: mime.to_string(),
        })?;
        Ok(Self {
            file_name: file_name.into(),
            kind,
            bytes,
        })
    }

    /// 读取本地文件并按扩展名判断类型
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let kind = UploadKind::from_path(path).ok_or_else(|| UploadError::UnsupportedMimeType {
            mime: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| "(无扩展名)".to_string()),
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self {
            file_name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            kind,
            bytes,
        })
    }

    /// 解析前的大小校验
    pub fn validate(&self, max_bytes: usize) -> AppResult<()> {
        if self.bytes.is_empty() {
            return Err(UploadError::Empty.into());
        }
        if self.bytes.len() > max_bytes {
            return Err(UploadError::TooLarge {
                size: self.bytes.len(),
                limit: max_bytes,
            }
            .into());
        }
        Ok(())
    }
}
