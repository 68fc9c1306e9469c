//! Integration tests for the PDF reorder library

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdf_reorder::board::{Board, Point};
use pdf_reorder::pdf::{merge_pdfs, run_merge, MergeOptions};
use pdf_reorder::session::{NoticeKind, Session};
use pdf_reorder::thumbnail::{OutlineRenderer, PageRenderer};
use pdf_reorder::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with one blank page per entry of `widths`
///
/// Each page's MediaBox width identifies it after a merge. When
/// `inherit_box` is set the MediaBox sits on the page tree node instead of
/// the pages (all pages then share `widths[0]`).
fn write_pdf(path: &Path, widths: &[i64], inherit_box: bool) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            if !inherit_box {
                page.set("MediaBox", media_box(width));
            }
            Object::Reference(doc.add_object(Object::Dictionary(page)))
        })
        .collect();

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(widths.len() as i64));
    pages.set("Kids", Object::Array(kids));
    if inherit_box {
        pages.set("MediaBox", media_box(widths[0]));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("Failed to write test PDF");
}

fn media_box(width: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(842),
    ])
}

fn own_media_box_width(doc: &Document, page_id: ObjectId) -> Option<i64> {
    let page = doc.get_dictionary(page_id).ok()?;
    match page.get(b"MediaBox").ok()? {
        Object::Array(values) => match values.get(2)? {
            Object::Integer(width) => Some(*width),
            _ => None,
        },
        _ => None,
    }
}

/// MediaBox widths of the merged document's pages, in page order
fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .values()
        .map(|&id| own_media_box_width(&doc, id).expect("page has its own MediaBox"))
        .collect()
}

fn fixture(dir: &TempDir, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.path().join(name);
    write_pdf(&path, widths, false);
    path
}

#[test]
fn test_merge_preserves_input_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let a = fixture(&temp_dir, "a.pdf", &[101, 102]);
    let b = fixture(&temp_dir, "b.pdf", &[201]);
    let c = fixture(&temp_dir, "c.pdf", &[301, 302, 303]);
    let output_path = temp_dir.path().join("merged.pdf");

    let options = MergeOptions {
        input_paths: vec![c, a, b],
        output_path: output_path.clone(),
    };
    let summary = merge_pdfs(&options).expect("Failed to merge PDFs");

    assert_eq!(summary.input_count, 3);
    assert_eq!(summary.page_count, 6);
    assert!(output_path.exists(), "Merged PDF was not created");
    assert_eq!(page_widths(&output_path), vec![301, 302, 303, 101, 102, 201]);
}

#[test]
fn test_merge_keeps_inherited_media_box() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let inherited = temp_dir.path().join("inherited.pdf");
    write_pdf(&inherited, &[400, 400], true);
    let plain = fixture(&temp_dir, "plain.pdf", &[500]);
    let output_path = temp_dir.path().join("merged.pdf");

    let options = MergeOptions {
        input_paths: vec![inherited, plain],
        output_path: output_path.clone(),
    };
    merge_pdfs(&options).expect("Failed to merge PDFs");

    assert_eq!(page_widths(&output_path), vec![400, 400, 500]);
}

#[test]
fn test_merge_empty_input_list() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("empty.pdf");

    let options = MergeOptions {
        input_paths: vec![],
        output_path: output_path.clone(),
    };

    let result = merge_pdfs(&options);
    assert!(matches!(result, Err(Error::NoInputs)));
    assert!(!output_path.exists());
}

#[test]
fn test_merge_missing_second_file_names_it() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let a = fixture(&temp_dir, "a.pdf", &[101]);
    let b = temp_dir.path().join("b.pdf");
    let output_path = temp_dir.path().join("output.pdf");

    let report = run_merge(&[a, b], &output_path);
    assert!(!report.success, "Should fail with a missing input");
    assert!(
        report.message.contains("b.pdf"),
        "Error should name the missing file: {}",
        report.message
    );
}

#[test]
fn test_merge_unreadable_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let garbage = temp_dir.path().join("garbage.pdf");
    std::fs::write(&garbage, b"this is not a pdf").unwrap();

    let options = MergeOptions {
        input_paths: vec![garbage],
        output_path: temp_dir.path().join("output.pdf"),
    };

    match merge_pdfs(&options) {
        Err(Error::Unreadable { path, .. }) => assert!(path.ends_with("garbage.pdf")),
        other => panic!("expected Unreadable, got {:?}", other.map(|s| s.page_count)),
    }
}

#[test]
fn test_merge_unwritable_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let a = fixture(&temp_dir, "a.pdf", &[101]);
    let output_path = temp_dir.path().join("no-such-dir").join("out.pdf");

    let report = run_merge(&[a], &output_path);
    assert!(!report.success);
    assert!(report.message.contains("out.pdf"), "{}", report.message);
}

#[test]
fn test_outline_renderer_uses_page_aspect() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let wide = temp_dir.path().join("wide.pdf");
    write_pdf(&wide, &[1684], true);

    let thumb = OutlineRenderer
        .render_first_page(&wide)
        .expect("Failed to render outline");
    assert_eq!((thumb.width, thumb.height), (100, 50));
    assert_eq!(thumb.rgba.len(), 100 * 50 * 4);
}

#[test]
fn test_outline_renderer_rejects_garbage() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let garbage = temp_dir.path().join("garbage.pdf");
    std::fs::write(&garbage, b"%PDF-1.5 truncated").unwrap();

    let mut board = Board::default();
    let added = board.add_items([&garbage], &OutlineRenderer);
    assert!(added.is_empty());
    assert!(board.is_empty());
}

#[test]
fn test_reordered_board_drives_merge_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let a = fixture(&temp_dir, "a.pdf", &[101]);
    let b = fixture(&temp_dir, "b.pdf", &[201]);
    let c = fixture(&temp_dir, "c.pdf", &[301]);

    let mut session = Session::new(Board::default(), temp_dir.path().to_path_buf());
    let ids = session.board_mut().add_items([&a, &b, &c], &OutlineRenderer);
    assert_eq!(ids.len(), 3);

    // Drag c onto the first cell
    let outcome = session.board_mut().drop_item(ids[2], Point::new(60.0, 70.0));
    assert_eq!(outcome, pdf_reorder::board::DropOutcome::Swapped { from: 2, to: 0 });
    assert_eq!(session.board().ordered_paths(), vec![c.clone(), b.clone(), a.clone()]);

    session.set_output_name("result");
    let feedback = session.merge();
    assert_eq!(feedback.notice.kind, NoticeKind::Info);
    assert_eq!(feedback.reveal.as_deref(), Some(temp_dir.path()));
    assert_eq!(session.progress(), 1.0);

    let output = temp_dir.path().join("result.pdf");
    assert_eq!(
        feedback.notice.message,
        format!("Merged PDF saved as {}", output.display())
    );
    assert_eq!(page_widths(&output), vec![301, 201, 101]);
}

#[test]
fn test_auto_named_merges_do_not_overwrite() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let a = fixture(&temp_dir, "a.pdf", &[101]);

    let mut session = Session::new(Board::default(), temp_dir.path().to_path_buf());
    session.board_mut().add_items([&a], &OutlineRenderer);
    session.set_auto_name(true);
    assert_eq!(session.output_name(), "Merged_Output.pdf");

    assert_eq!(session.merge().notice.kind, NoticeKind::Info);
    assert_eq!(session.output_name(), "Merged_Output_001.pdf");

    assert_eq!(session.merge().notice.kind, NoticeKind::Info);
    assert_eq!(session.output_name(), "Merged_Output_002.pdf");

    assert!(temp_dir.path().join("Merged_Output.pdf").exists());
    assert!(temp_dir.path().join("Merged_Output_001.pdf").exists());
}
