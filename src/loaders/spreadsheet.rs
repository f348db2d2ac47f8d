//! 表格导入
//!
//! 第一张工作表，第 0 行为表头。列顺序：
//! 题干 | 选项A | 选项B | 选项C | 选项D | 答案字母 | 分值 | 扣分（可选）

use crate::error::{AppError, AppResult, DecodeError, SourceKind};
use crate::models::question::{letter_to_index, Question};
use crate::services::format_preserver::preserve_formatting;
use crate::utils::logging::truncate_text;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::{debug, info, warn};

/// 有效行至少需要的非空列数
const MIN_COLUMNS: usize = 6;

/// 解析表格字节流
pub fn parse_spreadsheet(bytes: &[u8]) -> AppResult<Vec<Question>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(AppError::invalid_spreadsheet)?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoSheets)?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(AppError::invalid_spreadsheet)?;

    debug!("读取工作表 {} ({} 行)", first_sheet, range.height());

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    parse_rows(&rows)
}

/// 解析已读出的行（第 0 行为表头）
pub fn parse_rows(rows: &[Vec<String>]) -> AppResult<Vec<Question>> {
    let mut questions = Vec::new();

    for (index, row) in rows.iter().enumerate().skip(1) {
        match parse_row(row) {
            Some(question) => questions.push(question),
            None => debug!("第 {} 行无效，已跳过", index + 1),
        }
    }

    if questions.is_empty() {
        return Err(AppError::no_questions(SourceKind::Spreadsheet));
    }

    info!("✓ 表格解析出 {} 道题目", questions.len());
    Ok(questions)
}

fn parse_row(row: &[String]) -> Option<Question> {
    let populated = row
        .iter()
        .rposition(|cell| !cell.trim().is_empty())
        .map_or(0, |last| last + 1);
    if populated < MIN_COLUMNS {
        return None;
    }

    let text = row[0].trim();
    if text.is_empty() {
        return None;
    }

    let Some(correct) = letter_to_index(&row[5]) else {
        warn!(
            "⚠️ 答案列无效 ({:?})，跳过: {}",
            row[5],
            truncate_text(text, 40)
        );
        return None;
    };

    let options = [1usize, 2, 3, 4].map(|col| row[col].trim().to_string());
    let marks = parse_marks(row.get(6).map(String::as_str));
    let negative_marks = parse_negative_marks(row.get(7).map(String::as_str));

    Question::new(preserve_formatting(text), options, correct, marks, negative_marks)
        .map_err(|e| warn!("⚠️ 题目无效，跳过: {}", e))
        .ok()
}

/// 分值：取整数部分，无法解析或小于 1 时为 1
fn parse_marks(cell: Option<&str>) -> u32 {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 1.0)
        .map_or(1, |v| v.trunc() as u32)
}

/// 扣分：缺失或无效时为 0（测验级默认值在组卷时再应用）
fn parse_negative_marks(cell: Option<&str>) -> f64 {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        _ => cell.to_string(),
    }
}
