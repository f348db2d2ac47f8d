//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info 级别。
/// 重复调用是安全的（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 题目导入启动");
    info!(
        "📏 上传上限: {} 字节 | OCR: {} (psm {}, 超时 {}s)",
        config.max_upload_bytes,
        config.ocr_language,
        config.ocr_page_seg_mode,
        config.ocr_timeout_secs
    );
    info!("{}", "=".repeat(60));
}

/// 记录单个上传文件开始处理
///
/// # 参数
/// - `index`: 文件序号（从1开始）
/// - `name`: 文件名
/// - `kind`: 文件类型描述
/// - `size`: 字节数
pub fn log_upload_start(index: usize, name: &str, kind: &str, size: usize) {
    info!("\n[文件 {}] {}", index, "─".repeat(30));
    info!("[文件 {}] {} ({}, {} 字节)", index, name, kind, size);
}

/// 记录单个上传文件处理完成
pub fn log_upload_complete(index: usize, question_count: usize) {
    info!("[文件 {}] ✅ 解析出 {} 道题目", index, question_count);
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `questions`: 题目总数
pub fn print_final_stats(success: usize, failed: usize, total: usize, questions: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("📝 题目总数: {}", questions);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text("题目内容很长", 2), "题目...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
