mod common;

use common::{docx, docx_lines, xlsx, Para, TextImageEngine};
use pretty_assertions::assert_eq;
use quiz_ingest::error::{DecodeError, SourceKind, UploadError};
use quiz_ingest::models::{Eligibility, QuizMeta};
use quiz_ingest::{
    parse_spreadsheet, parse_word_document, App, AppError, Config, IngestStats, Quiz, Upload,
    UploadKind,
};
use std::io::Write;

const HEADER: &[&str] = &["Question", "A", "B", "C", "D", "Answer", "Marks", "Negative"];

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn upload(name: &str, mime: &str, bytes: Vec<u8>) -> Upload {
    Upload::from_mime(name, mime, bytes).expect("allowed mime type")
}

#[test]
fn spreadsheet_first_data_row_becomes_a_question() {
    let bytes = xlsx(&[HEADER, &["What is 2+2?", "1", "2", "4", "8", "C", "2", ""]]);
    let questions = parse_spreadsheet(&bytes).unwrap();

    assert_eq!(questions.len(), 1);
    let q = &questions[0];
    assert_eq!(q.text(), "What is 2+2?");
    assert_eq!(q.options(), &["1", "2", "4", "8"].map(String::from));
    assert_eq!(q.correct_option_index(), 2);
    assert_eq!(q.marks(), 2);
    assert_eq!(q.negative_marks(), 0.0);
}

#[test]
fn spreadsheet_with_only_a_header_fails() {
    let err = parse_spreadsheet(&xlsx(&[HEADER])).unwrap_err();
    assert!(matches!(
        err,
        AppError::NoQuestions {
            source_kind: SourceKind::Spreadsheet
        }
    ));
}

#[test]
fn word_document_with_marked_answer() {
    let bytes = docx_lines(&[
        "Q1. What is 5*5? (2 marks)",
        "A) 20",
        "B) 25*",
        "C) 30",
        "D) 35",
    ]);
    let questions = parse_word_document(&bytes).unwrap();

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].text(), "What is 5*5?");
    assert_eq!(questions[0].correct_option_index(), 1);
    assert_eq!(questions[0].marks(), 2);
}

#[test]
fn word_document_keeps_code_indentation_and_drops_bold_tags() {
    let bytes = docx(&[
        Para::WithBold("Q1. ", "What is printed?"),
        Para::Plain("for i in range(2):"),
        Para::Plain("  print(i)"),
        Para::WithBold("A) ", "0 1*"),
        Para::Plain("B) 1 2"),
        Para::Plain("C) 0"),
        Para::Plain("D) Error"),
        Para::Plain("Q2. Is 3 < 4 & 4 > 3? [Negative: 0.5]"),
        Para::Plain("A) Yes*"),
        Para::Plain("B) No"),
        Para::Plain("C) Sometimes"),
        Para::Plain("D) Never"),
    ]);
    let questions = parse_word_document(&bytes).unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(
        questions[0].text(),
        "<pre><code>What is printed?\nfor i in range(2):\n  print(i)</code></pre>"
    );
    assert_eq!(questions[0].options()[0], "0 1");
    assert_eq!(questions[0].correct_option_index(), 0);

    assert_eq!(questions[1].text(), "Is 3 < 4 & 4 > 3?");
    assert_eq!(questions[1].negative_marks(), 0.5);
}

#[tokio::test]
async fn legacy_word_file_is_reported_as_unsupported() {
    let mut bytes = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    bytes.resize(512, 0);
    let app = App::new(Config::default());

    let err = app
        .ingest_upload(&upload("old.doc", "application/msword", bytes))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Decode(DecodeError::UnsupportedLegacyFormat)
    ));
}

#[test]
fn unsupported_mime_type_is_rejected() {
    let err = Upload::from_mime("notes.txt", "text/plain", b"Q1. hi".to_vec()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Upload(UploadError::UnsupportedMimeType { .. })
    ));
}

#[test]
fn image_batch_skips_failed_ocr() {
    let app = App::new(Config::default());
    let mut engine = TextImageEngine::default();
    let uploads = vec![
        upload("a.png", "image/png", b"FAIL: corrupt".to_vec()),
        upload(
            "b.jpg",
            "image/jpeg",
            b"Q1. Which is prime?\nA) 4\nB) 6\nC) 7 *\nD) 9".to_vec(),
        ),
    ];

    let questions =
        tokio_test::block_on(app.ingest_images_with(&mut engine, &uploads)).unwrap();
    assert_eq!(engine.calls, 2);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_option_index(), 2);
}

#[test]
fn image_batch_keeps_object_method_calls_in_code_questions() {
    let app = App::new(Config::default());
    let mut engine = TextImageEngine::default();
    let uploads = vec![upload(
        "code.png",
        "image/png",
        b"Q1. What does this print?\nd = {}\nd.get(1)\nc.close()\nprint(len(d))\nA) 0 *\nB) 1\nC) None\n0) Error"
            .to_vec(),
    )];

    let questions =
        tokio_test::block_on(app.ingest_images_with(&mut engine, &uploads)).unwrap();
    assert_eq!(questions.len(), 1);
    assert!(questions[0].text().contains("d.get(1)\nc.close()"));
    assert_eq!(questions[0].options(), &["0", "1", "None", "Error"].map(String::from));
    assert_eq!(questions[0].correct_option_index(), 0);
}

#[test]
fn image_batch_with_nothing_parseable_fails() {
    let app = App::new(Config::default());
    let mut engine = TextImageEngine::default();
    let uploads = vec![
        upload("a.png", "image/png", b"FAIL".to_vec()),
        upload("b.gif", "image/gif", b"just a photo of a cat".to_vec()),
    ];

    let err = tokio_test::block_on(app.ingest_images_with(&mut engine, &uploads)).unwrap_err();
    assert!(err.to_string().contains("no valid questions"));
}

#[tokio::test]
async fn mixed_uploads_are_counted_per_file() {
    let app = App::new(Config::default());
    let mut engine = TextImageEngine::default();
    let uploads = vec![
        upload(
            "sheet.xlsx",
            XLSX_MIME,
            xlsx(&[
                HEADER,
                &["Largest ocean?", "Atlantic", "Pacific", "Indian", "Arctic", "B", "1", ""],
                &["Smallest prime?", "0", "1", "2", "3", "C", "1", "0.25"],
            ]),
        ),
        upload("empty.docx", DOCX_MIME, docx_lines(&["No questions here"])),
        upload(
            "scan.png",
            "image/png",
            b"3. Boiling point of water?\nA) 90\nB) 100 x\nC) 110\nD) 120".to_vec(),
        ),
    ];

    let report = app.ingest_all_with(&mut engine, uploads).await;

    assert_eq!(
        report.stats,
        IngestStats {
            success: 2,
            failed: 1,
            total: 3,
            questions: 3,
        }
    );
    let texts: Vec<&str> = report.questions.iter().map(|q| q.text()).collect();
    assert_eq!(
        texts,
        vec!["Largest ocean?", "Smallest prime?", "Boiling point of water?"]
    );
}

#[tokio::test]
async fn file_upload_is_typed_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("midterm.xlsx");
    std::fs::write(
        &path,
        xlsx(&[HEADER, &["Capital of Japan?", "Kyoto", "Osaka", "Tokyo", "Nara", "C"]]),
    )
    .unwrap();

    let upload = Upload::from_file(&path).unwrap();
    assert_eq!(upload.kind, UploadKind::Spreadsheet);
    assert_eq!(upload.file_name, "midterm.xlsx");

    let questions = App::new(Config::default())
        .ingest_upload(&upload)
        .await
        .unwrap();
    assert_eq!(questions[0].marks(), 1);
}

#[test]
fn config_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_upload_bytes = 1024").unwrap();
    writeln!(file, "ocr_page_seg_mode = 4").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.max_upload_bytes, 1024);
    assert_eq!(config.ocr_page_seg_mode, 4);
    assert_eq!(config.ocr_language, "eng");
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_upload_bytes = \"lots\"").unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn quiz_applies_default_penalty_to_unpenalised_questions() {
    let bytes = xlsx(&[
        HEADER,
        &["Q one?", "a", "b", "c", "d", "A", "2", ""],
        &["Q two?", "a", "b", "c", "d", "B", "1", "1"],
    ]);
    let questions = parse_spreadsheet(&bytes).unwrap();

    let starts_at = chrono::Utc::now();
    let meta = QuizMeta {
        title: "Unit test quiz".to_string(),
        duration_minutes: 20,
        starts_at,
        ends_at: starts_at + chrono::Duration::minutes(20),
        eligibility: Eligibility::default(),
        negative_marking: Some(0.25),
    };
    let quiz = Quiz::assemble(meta, questions).unwrap();

    assert_eq!(quiz.total_marks, 3);
    assert_eq!(quiz.questions[0].negative_marks(), 0.25);
    assert_eq!(quiz.questions[1].negative_marks(), 1.0);
}

#[tokio::test]
#[ignore] // 需要本机安装 tesseract：cargo test -- --ignored
async fn real_tesseract_batch_of_unreadable_images_fails_cleanly() {
    let app = App::new(Config::from_env());
    let uploads = vec![upload("noise.png", "image/png", vec![0x89, b'P', b'N', b'G'])];

    let err = app.ingest_images(&uploads).await.unwrap_err();
    assert!(matches!(err, AppError::NoQuestions { .. }));
}
