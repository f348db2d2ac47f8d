use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use quiz_ingest::models::{Eligibility, QuizMeta};
use quiz_ingest::utils::logging;
use quiz_ingest::{App, Config, Quiz, Upload};
use std::path::{Path, PathBuf};

/// 把表格、Word 文档和题目图片导入为四选一题目，输出 JSON
#[derive(Parser, Debug)]
#[command(name = "quiz-ingest", version, about, long_about = None)]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 对所有文件使用指定的 MIME 类型（默认按扩展名判断）
    #[arg(long)]
    mime: Option<String>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,

    /// 组装成测验时的标题（不提供则只输出题目列表）
    #[arg(long)]
    title: Option<String>,

    /// 测验时长（分钟）
    #[arg(long, default_value_t = 30)]
    duration_minutes: u32,

    /// 负分制默认扣分值
    #[arg(long)]
    negative_marks: Option<f64>,

    /// 要导入的文件
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    logging::init(cli.verbose || config.verbose_logging);

    let uploads = cli
        .files
        .iter()
        .map(|path| read_upload(path, cli.mime.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    let app = App::new(config);
    let report = app.ingest_all(uploads).await;

    if report.questions.is_empty() {
        bail!("没有导入任何题目 ({} 个文件全部失败)", report.stats.failed);
    }

    let json = match cli.title {
        Some(title) => {
            let starts_at = Utc::now();
            let meta = QuizMeta {
                title,
                duration_minutes: cli.duration_minutes,
                starts_at,
                ends_at: starts_at + Duration::minutes(i64::from(cli.duration_minutes)),
                eligibility: Eligibility::default(),
                negative_marking: cli.negative_marks,
            };
            let quiz = Quiz::assemble(meta, report.questions)?;
            serde_json::to_string_pretty(&quiz)?
        }
        None => serde_json::to_string_pretty(&report.questions)?,
    };

    println!("{}", json);
    Ok(())
}

fn read_upload(path: &Path, mime: Option<&str>) -> Result<Upload> {
    let upload = match mime {
        Some(mime) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("读取文件失败: {}", path.display()))?;
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            Upload::from_mime(name, mime, bytes)?
        }
        None => Upload::from_file(path)?,
    };
    Ok(upload)
}
