//! Page-level degradation operations used by the reduction loop.
//!
//! Content streams are never interpreted here. Scaling wraps the existing
//! stream in a transform, dimension shrinking rewrites the MediaBox, and the
//! strip operations drop whole dictionary entries.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Info-dictionary fields cleared by [`strip_metadata`].
const INFO_FIELDS: [&[u8]; 6] = [
    b"Title",
    b"Author",
    b"Subject",
    b"Keywords",
    b"Producer",
    b"Creator",
];

/// Page attributes that may be inherited from ancestor page-tree nodes.
const INHERITED_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Wrap a page's content in a uniform scale transform.
///
/// The page's content streams are concatenated, wrapped in `q <s> 0 0 <s>
/// 0 0 cm ... Q`, and written back as a single new stream object. The old
/// stream objects are removed.
pub fn scale_page_contents(
    doc: &mut Document,
    page_id: ObjectId,
    factor: f32,
) -> lopdf::Result<()> {
    let content = doc.get_page_content(page_id)?;

    let mut wrapped = Vec::with_capacity(content.len() + 32);
    wrapped.extend_from_slice(format!("q\n{factor:.2} 0 0 {factor:.2} 0 0 cm\n").as_bytes());
    wrapped.extend_from_slice(&content);
    wrapped.extend_from_slice(b"\nQ");

    replace_page_contents(doc, page_id, wrapped)
}

/// Multiply the page's MediaBox width and height by `factor`, keeping the
/// lower-left corner in place.
pub fn shrink_page_box(doc: &mut Document, page_id: ObjectId, factor: f32) -> lopdf::Result<()> {
    let (llx, lly, urx, ury) = effective_media_box(doc, page_id)?;

    let new_box = vec![
        Object::Real(llx),
        Object::Real(lly),
        Object::Real(llx + (urx - llx) * factor),
        Object::Real(lly + (ury - lly) * factor),
    ];

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("MediaBox", Object::Array(new_box));
    Ok(())
}

/// Drop annotation and form-widget data from a page.
///
/// Pages without /Annots are left untouched; nothing here can fail.
pub fn strip_annotations(doc: &mut Document, page_id: ObjectId) {
    let annot_ids = referenced_ids(doc, page_id, b"Annots");

    if let Ok(page) = doc.get_object_mut(page_id).and_then(|obj| obj.as_dict_mut()) {
        page.remove(b"Annots");
    }
    for id in annot_ids {
        doc.objects.remove(&id);
    }
}

/// Clear the standard Info-dictionary fields at the document level.
///
/// Documents without an Info dictionary are left untouched.
pub fn strip_metadata(doc: &mut Document) {
    let info_id = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => *id,
        _ => return,
    };
    if let Ok(info) = doc.get_dictionary_mut(info_id) {
        for field in INFO_FIELDS {
            info.remove(field);
        }
    }
}

/// Keep the first `keep` pages and drop the rest, pruning orphaned objects.
///
/// No-op when the document already has `keep` pages or fewer, or when
/// `keep` is zero (a document must retain at least one page).
pub fn keep_front_pages(doc: &mut Document, keep: usize) {
    if keep == 0 {
        return;
    }
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.len() <= keep {
        return;
    }
    let doomed: Vec<u32> = page_numbers[keep..].to_vec();
    doc.delete_pages(&doomed);
    doc.prune_objects();
}

/// Copy attributes a page inherits from ancestor page-tree nodes onto the
/// page itself. Must run while the page's original parent chain is intact,
/// before the page is moved under a different page tree.
pub fn materialize_inherited(doc: &mut Document, page_id: ObjectId) {
    let mut found: Vec<(&[u8], Object)> = Vec::new();
    {
        let page = match doc.get_object(page_id).and_then(|obj| obj.as_dict()) {
            Ok(dict) => dict,
            Err(_) => return,
        };
        for key in INHERITED_KEYS {
            if page.get(key).is_ok() {
                continue;
            }
            if let Some(value) = inherited_value(doc, page, key) {
                found.push((key, value));
            }
        }
    }
    if found.is_empty() {
        return;
    }
    if let Ok(page) = doc.get_object_mut(page_id).and_then(|obj| obj.as_dict_mut()) {
        for (key, value) in found {
            page.set(key, value);
        }
    }
}

/// Walk the Parent chain looking for `key`.
fn inherited_value(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut dict = page;
    loop {
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => {
                let parent = doc.get_object(*parent_id).ok()?.as_dict().ok()?;
                if let Ok(value) = parent.get(key) {
                    return Some(value.clone());
                }
                dict = parent;
            }
            _ => return None,
        }
    }
}

/// Resolve the page's MediaBox, following the Parent chain for inherited
/// boxes, as `(llx, lly, urx, ury)`.
fn effective_media_box(doc: &Document, page_id: ObjectId) -> lopdf::Result<(f32, f32, f32, f32)> {
    let mut dict = doc.get_object(page_id)?.as_dict()?;
    loop {
        if let Ok(obj) = dict.get(b"MediaBox") {
            return parse_box(doc, obj);
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => {
                dict = doc.get_object(*parent_id)?.as_dict()?;
            }
            _ => return Err(lopdf::Error::DictKey("MediaBox".to_string())),
        }
    }
}

fn parse_box(doc: &Document, obj: &Object) -> lopdf::Result<(f32, f32, f32, f32)> {
    let resolved = match obj {
        Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    };
    let array = resolved.as_array()?;
    if array.len() != 4 {
        return Err(lopdf::Error::DictKey("MediaBox".to_string()));
    }
    let mut values = [0f32; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = match item {
            Object::Integer(n) => *n as f32,
            Object::Real(r) => *r,
            _ => return Err(lopdf::Error::DictKey("MediaBox".to_string())),
        };
    }
    Ok((values[0], values[1], values[2], values[3]))
}

/// Swap the page's /Contents for a single new stream, deleting the streams
/// it replaces.
fn replace_page_contents(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> lopdf::Result<()> {
    let old_ids = referenced_ids(doc, page_id, b"Contents");

    let stream_id = doc.add_object(Object::Stream(Stream::new(Dictionary::new(), content)));
    {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("Contents", Object::Reference(stream_id));
    }
    for id in old_ids {
        doc.objects.remove(&id);
    }
    Ok(())
}

/// Object ids referenced (directly or through an array) by a page entry.
fn referenced_ids(doc: &Document, page_id: ObjectId, key: &[u8]) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    let page = match doc.get_object(page_id).and_then(|obj| obj.as_dict()) {
        Ok(dict) => dict,
        Err(_) => return ids,
    };
    if let Ok(entry) = page.get(key) {
        match entry {
            Object::Reference(id) => ids.push(*id),
            Object::Array(items) => {
                for item in items {
                    if let Object::Reference(id) = item {
                        ids.push(*id);
                    }
                }
            }
            _ => {}
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::build_placeholder;

    fn single_page_doc() -> (Document, ObjectId) {
        let bytes = build_placeholder(1).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        (doc, page_id)
    }

    #[test]
    fn test_scale_wraps_content() {
        let (mut doc, page_id) = single_page_doc();
        let before = doc.get_page_content(page_id).unwrap();

        scale_page_contents(&mut doc, page_id, 0.85).unwrap();

        let after = doc.get_page_content(page_id).unwrap();
        assert!(after.starts_with(b"q\n0.85 0 0 0.85 0 0 cm\n"));
        assert!(after.ends_with(b"\nQ"));
        assert!(after.len() > before.len());
    }

    #[test]
    fn test_scale_twice_compounds() {
        let (mut doc, page_id) = single_page_doc();

        scale_page_contents(&mut doc, page_id, 0.95).unwrap();
        scale_page_contents(&mut doc, page_id, 0.75).unwrap();

        let content = doc.get_page_content(page_id).unwrap();
        assert!(content.starts_with(b"q\n0.75 0 0 0.75 0 0 cm\nq\n0.95 0 0 0.95 0 0 cm\n"));
    }

    #[test]
    fn test_shrink_page_box() {
        let (mut doc, page_id) = single_page_doc();

        shrink_page_box(&mut doc, page_id, 0.9).unwrap();

        let (llx, lly, urx, ury) = effective_media_box(&doc, page_id).unwrap();
        assert_eq!(llx, 0.0);
        assert_eq!(lly, 0.0);
        assert!((urx - 612.0 * 0.9).abs() < 0.01);
        assert!((ury - 792.0 * 0.9).abs() < 0.01);
    }

    #[test]
    fn test_strip_annotations_is_harmless_without_annots() {
        let (mut doc, page_id) = single_page_doc();
        strip_annotations(&mut doc, page_id);
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_strip_metadata_clears_info_fields() {
        let (mut doc, _) = single_page_doc();

        let mut info = Dictionary::new();
        info.set("Title", Object::string_literal("A title"));
        info.set("Author", Object::string_literal("An author"));
        info.set("CustomField", Object::string_literal("kept"));
        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));

        strip_metadata(&mut doc);

        let info = doc.get_dictionary_mut(info_id).unwrap();
        assert!(info.get(b"Title").is_err());
        assert!(info.get(b"Author").is_err());
        assert!(info.get(b"CustomField").is_ok());
    }

    #[test]
    fn test_keep_front_pages_never_empties_document() {
        let (mut doc, _) = single_page_doc();
        keep_front_pages(&mut doc, 0);
        assert_eq!(doc.get_pages().len(), 1);
        keep_front_pages(&mut doc, 1);
        assert_eq!(doc.get_pages().len(), 1);
    }
}
