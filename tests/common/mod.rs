//! 集成测试共用的文件构造工具
#![allow(dead_code)]

use quiz_ingest::error::OcrError;
use quiz_ingest::OcrEngine;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn zip_archive(entries: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

fn column_name(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// 构造只有一张工作表的 xlsx，所有单元格都是内联字符串（空字符串跳过）
pub fn xlsx(rows: &[&[&str]]) -> Vec<u8> {
    let mut sheet_rows = String::new();
    for (r, row) in rows.iter().enumerate() {
        sheet_rows.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            sheet_rows.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                column_name(c),
                r + 1,
                escape(cell)
            ));
        }
        sheet_rows.push_str("</row>");
    }

    zip_archive(&[
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Questions" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
                SPREADSHEET_NS
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{}"><sheetData>{}</sheetData></worksheet>"#,
                SPREADSHEET_NS, sheet_rows
            ),
        ),
    ])
}

/// 一个段落的内容
pub enum Para<'a> {
    Plain(&'a str),
    /// 前缀普通文本 + 粗体文本
    WithBold(&'a str, &'a str),
}

/// 构造每行一个段落的 docx
pub fn docx(paragraphs: &[Para<'_>]) -> Vec<u8> {
    let run = |text: &str, bold: bool| {
        format!(
            r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
            if bold { "<w:rPr><w:b/></w:rPr>" } else { "" },
            escape(text)
        )
    };

    let body: String = paragraphs
        .iter()
        .map(|p| match p {
            Para::Plain(text) => format!("<w:p>{}</w:p>", run(text, false)),
            Para::WithBold(plain, bold) => {
                format!("<w:p>{}{}</w:p>", run(plain, false), run(bold, true))
            }
        })
        .collect();

    zip_archive(&[
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_string(),
        ),
        (
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
                WORD_NS, body
            ),
        ),
    ])
}

/// 纯文本行构造 docx
pub fn docx_lines(lines: &[&str]) -> Vec<u8> {
    let paragraphs: Vec<Para<'_>> = lines.iter().map(|l| Para::Plain(l)).collect();
    docx(&paragraphs)
}

/// 把图片字节当作识别结果返回；以 `FAIL` 开头的图片模拟引擎失败
#[derive(Default)]
pub struct TextImageEngine {
    pub calls: usize,
}

impl OcrEngine for TextImageEngine {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrError> {
        self.calls += 1;
        if image.starts_with(b"FAIL") {
            return Err(OcrError::EngineFailed {
                status: "exit status: 1".to_string(),
                stderr: "Error in pixReadMem: Unknown format".to_string(),
            });
        }
        String::from_utf8(image.to_vec()).map_err(|_| OcrError::InvalidOutput)
    }
}
