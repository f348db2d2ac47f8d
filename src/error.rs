use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 上传校验错误（进入解析器之前）
    #[error("上传错误: {0}")]
    Upload(#[from] UploadError),
    /// 文件解码错误
    #[error("解码错误: {0}")]
    Decode(#[from] DecodeError),
    /// OCR 识别错误
    #[error("OCR错误: {0}")]
    Ocr(#[from] OcrError),
    /// 没有解析出任何有效题目
    #[error("no valid questions found in {source_kind} (未解析出有效题目)")]
    NoQuestions { source_kind: SourceKind },
    /// 题目或测验不满足约束
    #[error("题目数据无效: {reason}")]
    InvalidQuestion { reason: String },
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件读写错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 题目来源类型（用于错误信息和日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Spreadsheet,
    WordDocument,
    Images,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Spreadsheet => write!(f, "spreadsheet"),
            SourceKind::WordDocument => write!(f, "word document"),
            SourceKind::Images => write!(f, "image batch"),
        }
    }
}

/// 上传校验错误
#[derive(Debug, Error)]
pub enum UploadError {
    /// 不支持的文件类型
    #[error("不支持的文件类型: {mime}")]
    UnsupportedMimeType { mime: String },
    /// 文件超过大小限制
    #[error("文件过大: {size} 字节 (上限 {limit} 字节)")]
    TooLarge { size: usize, limit: usize },
    /// 空文件
    #[error("文件内容为空")]
    Empty,
}

/// 文件解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 工作簿中没有工作表
    #[error("no sheets (工作簿中没有工作表)")]
    NoSheets,
    /// 表格格式无效
    #[error("invalid format: {reason}")]
    InvalidSpreadsheet { reason: String },
    /// Word 文档无法解析
    #[error("无法解析 Word 文档: {reason}")]
    InvalidWordDocument { reason: String },
    /// 旧版 .doc 二进制格式
    #[error("不支持旧版 .doc 格式，请另存为 .docx")]
    UnsupportedLegacyFormat,
}

/// OCR 识别错误（单张图片级别）
#[derive(Debug, Error)]
pub enum OcrError {
    /// 找不到 OCR 引擎
    #[error("OCR 引擎不可用 ({path}): {source}")]
    EngineUnavailable {
        path: String,
        source: std::io::Error,
    },
    /// 启动 OCR 进程失败
    #[error("启动 OCR 进程失败: {0}")]
    SpawnFailed(#[source] std::io::Error),
    /// OCR 进程返回非零状态
    #[error("OCR 进程失败 (状态: {status}): {stderr}")]
    EngineFailed { status: String, stderr: String },
    /// OCR 超时
    #[error("OCR 超时 ({seconds} 秒)")]
    Timeout { seconds: u64 },
    /// OCR 输出不是有效文本
    #[error("OCR 输出不是有效的 UTF-8 文本")]
    InvalidOutput,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建"没有有效题目"错误
    pub fn no_questions(source_kind: SourceKind) -> Self {
        AppError::NoQuestions { source_kind }
    }

    /// 创建题目约束错误
    pub fn invalid_question(reason: impl Into<String>) -> Self {
        AppError::InvalidQuestion {
            reason: reason.into(),
        }
    }

    /// 创建表格格式错误
    pub fn invalid_spreadsheet(reason: impl std::fmt::Display) -> Self {
        AppError::Decode(DecodeError::InvalidSpreadsheet {
            reason: reason.to_string(),
        })
    }

    /// 创建 Word 文档解析错误
    pub fn invalid_word_document(reason: impl std::fmt::Display) -> Self {
        AppError::Decode(DecodeError::InvalidWordDocument {
            reason: reason.to_string(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
