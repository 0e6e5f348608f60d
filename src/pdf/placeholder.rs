//! Fixed single-page document emitted when a target size is out of reach.

use std::io::Cursor;

use lopdf::{Dictionary, Document, Object, Stream};

/// US Letter, points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

const FONT_SIZE: f32 = 14.0;
const LINE_SPACING: f32 = 20.0;
const MARGIN: f32 = 72.0;

/// Build the minimal one-page notice document.
///
/// Three lines of text: a compressed-to-minimum notice, the original page
/// count, and a content-may-have-been-removed note. The output has a fixed
/// size regardless of the input that triggered it.
pub fn build_placeholder(original_page_count: usize) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");

    let font_id = {
        let mut font = Dictionary::new();
        font.set("Type", "Font");
        font.set("Subtype", "Type1");
        font.set("BaseFont", "Helvetica");
        doc.add_object(Object::Dictionary(font))
    };

    let content_id = doc.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        notice_stream(original_page_count),
    )));

    let pages_id = doc.new_object_id();

    let page_id = {
        let mut page = Dictionary::new();
        page.set("Type", "Page");
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ]),
        );
        page.set("Contents", Object::Reference(content_id));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        page.set("Resources", Object::Dictionary(resources));

        doc.add_object(Object::Dictionary(page))
    };

    let mut pages = Dictionary::new();
    pages.set("Type", "Pages");
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = {
        let mut catalog = Dictionary::new();
        catalog.set("Type", "Catalog");
        catalog.set("Pages", Object::Reference(pages_id));
        doc.add_object(Object::Dictionary(catalog))
    };
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Cursor::new(Vec::new());
    doc.save_to(&mut buffer)?;
    Ok(buffer.into_inner())
}

fn notice_stream(original_page_count: usize) -> Vec<u8> {
    let lines = [
        "This document was compressed to the minimum possible size.".to_string(),
        format!("Original page count: {original_page_count}"),
        "Some page content may have been removed to meet the size limit.".to_string(),
    ];

    let mut content = Vec::new();
    content.extend_from_slice(
        format!(
            "BT\n/F1 {FONT_SIZE} Tf\n{LINE_SPACING} TL\n{MARGIN} {} Td\n",
            PAGE_HEIGHT - MARGIN
        )
        .as_bytes(),
    );
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.extend_from_slice(b"T*\n");
        }
        content.extend_from_slice(format!("({}) Tj\n", escape_text(line)).as_bytes());
    }
    content.extend_from_slice(b"ET\n");
    content
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_a_single_page_document() {
        let bytes = build_placeholder(42).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_placeholder_reports_original_page_count() {
        let bytes = build_placeholder(42).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();

        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("Original page count: 42"));
        assert!(text.contains("compressed to the minimum possible size"));
    }

    #[test]
    fn test_placeholder_size_does_not_depend_on_input() {
        let small = build_placeholder(1).unwrap();
        let large = build_placeholder(9999).unwrap();
        // Only the digits of the page count differ.
        assert!(small.len().abs_diff(large.len()) < 16);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_text("back\\slash"), "back\\\\slash");
    }
}
