//! Round-trip tests for Office text extraction using generated documents.

use docx_rs::{Docx, Paragraph, Run};
use spyglass_protocol::{FileContent, OfficeKind};
use spyglass_vfs::preview::extract_docx_text;
use spyglass_vfs::{Explorer, TargetList};

fn write_docx(path: &std::path::Path, paragraphs: &[&str]) {
    let file = std::fs::File::create(path).unwrap();
    let mut docx = Docx::new();
    for p in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
    }
    docx.build().pack(file).unwrap();
}

#[test]
fn docx_paragraphs_come_back_as_text_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.docx");
    write_docx(&path, &["Quarterly memo", "Second paragraph"]);

    let text = extract_docx_text(&path).unwrap();
    assert!(text.contains("Quarterly memo"));
    assert!(text.contains("Second paragraph"));
}

#[tokio::test]
async fn explorer_classifies_docx_as_office_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    write_docx(&path, &["Findings"]);

    let explorer = Explorer::new(None, TargetList::default());
    let (content, message) = explorer.read_file(&path.to_string_lossy()).await;

    assert!(message.contains("Word document"), "message: {message}");
    match content {
        FileContent::Text {
            content,
            is_office,
            office_type,
            ..
        } => {
            assert!(content.contains("Findings"));
            assert!(is_office);
            assert_eq!(office_type, Some(OfficeKind::Word));
        }
        other => panic!("expected office text, got {other:?}"),
    }
}
