//! 图片导入（OCR）
//!
//! 图片逐张识别，单张失败或超时只记录警告并跳过。
//! 识别文本先做固定纠错，再用宽松语法切分题目；含代码的题干会先恢复缩进。

use crate::error::{AppError, AppResult, OcrError, SourceKind};
use crate::infrastructure::OcrEngine;
use crate::models::question::Question;
use crate::services::code_detector::has_code_content;
use crate::services::format_preserver::preserve_formatting;
use crate::services::indentation::restore_indentation;
use crate::services::ocr_cleanup::apply_ocr_corrections;
use crate::workflow::{collect_questions, OcrGrammar, PendingQuestion};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 批量识别图片并解析题目
///
/// 引擎由调用方获取和释放，这里按顺序逐张调用。
pub async fn parse_images<E, B>(
    engine: &mut E,
    images: &[B],
    timeout: Duration,
) -> AppResult<Vec<Question>>
where
    E: OcrEngine,
    B: AsRef<[u8]>,
{
    let mut questions = Vec::new();

    for (index, image) in images.iter().enumerate() {
        let number = index + 1;
        let text = match tokio::time::timeout(timeout, engine.recognize(image.as_ref())).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("⚠️ [图片 {}] OCR 失败，跳过: {}", number, e);
                continue;
            }
            Err(_) => {
                let e = OcrError::Timeout {
                    seconds: timeout.as_secs(),
                };
                warn!("⚠️ [图片 {}] {}，跳过", number, e);
                continue;
            }
        };

        let parsed = parse_ocr_text(&text);
        info!("[图片 {}] 解析出 {} 道题目", number, parsed.len());
        questions.extend(parsed);
    }

    if questions.is_empty() {
        return Err(AppError::no_questions(SourceKind::Images));
    }

    Ok(questions)
}

/// 解析一张图片的 OCR 文本，不完整的题目直接丢弃
pub fn parse_ocr_text(text: &str) -> Vec<Question> {
    let corrected = apply_ocr_corrections(text);

    collect_questions(&OcrGrammar, &corrected)
        .into_iter()
        .filter_map(finalize)
        .collect()
}

fn finalize(pending: PendingQuestion) -> Option<Question> {
    let options = pending.option_texts()?;

    let text = if has_code_content(&pending.lines.join("\n")) {
        restore_indentation(&pending.lines).join("\n")
    } else {
        pending.text.clone()
    };

    Question::new(
        preserve_formatting(&text),
        options,
        pending.correct_index(),
        pending.marks.unwrap_or(1),
        pending.negative_marks.unwrap_or(0.0),
    )
    .map_err(|e| debug!("Q{} 无效，丢弃: {}", pending.number, e))
    .ok()
}
