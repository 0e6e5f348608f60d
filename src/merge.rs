//! Concatenate documents page-by-page into a single output.

use std::io::Cursor;

use lopdf::{Document, Object, ObjectId};

use crate::error::MergeError;
use crate::pdf::transform;

/// Merge `buffers` in order into one serialized document.
///
/// Runs on the blocking pool; the future resolves with the merged bytes.
pub async fn merge(buffers: Vec<Vec<u8>>) -> Result<Vec<u8>, MergeError> {
    tokio::task::spawn_blocking(move || merge_documents(buffers))
        .await
        .map_err(|err| MergeError::Task(err.to_string()))?
}

/// Synchronous body of [`merge`].
///
/// The first document donates the catalog and the page tree root. Every
/// other document is renumbered past the current id range, its objects are
/// moved across, and its pages are reparented onto the surviving root. The
/// root's /Kids and /Count are then rebuilt from the full ordered page list.
pub(crate) fn merge_documents(buffers: Vec<Vec<u8>>) -> Result<Vec<u8>, MergeError> {
    let (first, rest) = match buffers.split_first() {
        Some(split) => split,
        None => return Err(MergeError::Empty),
    };

    let mut doc =
        Document::load_mem(first).map_err(|source| MergeError::Parse { index: 0, source })?;
    let pages_root = pages_root(&doc)?;

    let mut page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for &page_id in &page_ids {
        transform::materialize_inherited(&mut doc, page_id);
    }

    let mut max_id = doc.max_id + 1;
    for (offset, buffer) in rest.iter().enumerate() {
        let index = offset + 1;
        let mut other =
            Document::load_mem(buffer).map_err(|source| MergeError::Parse { index, source })?;

        other.renumber_objects_with(max_id);
        max_id = other.max_id + 1;

        // Pages inherit attributes from their old tree; pin them down while
        // that tree is still reachable.
        let other_pages: Vec<ObjectId> = other.get_pages().values().copied().collect();
        for &page_id in &other_pages {
            transform::materialize_inherited(&mut other, page_id);
        }

        doc.objects.append(&mut other.objects);
        page_ids.extend(other_pages);
    }

    let mut kids: Vec<Object> = Vec::with_capacity(page_ids.len());
    for &page_id in &page_ids {
        if let Ok(page) = doc.get_object_mut(page_id).and_then(|obj| obj.as_dict_mut()) {
            page.set("Parent", Object::Reference(pages_root));
        }
        kids.push(Object::Reference(page_id));
    }
    {
        let root = doc
            .get_object_mut(pages_root)
            .and_then(|obj| obj.as_dict_mut())
            .map_err(|_| MergeError::MissingPageTree)?;
        root.set("Kids", Object::Array(kids));
        root.set("Count", Object::Integer(page_ids.len() as i64));
    }

    // Donor catalogs and intermediate page-tree nodes are unreachable now.
    doc.prune_objects();
    doc.renumber_objects();
    doc.adjust_zero_pages();
    doc.compress();

    let mut buffer = Cursor::new(Vec::new());
    doc.save_to(&mut buffer)
        .map_err(|e| MergeError::Serialize(e.into()))?;

    log::info!(
        "Merged {} documents into {} pages",
        buffers.len(),
        page_ids.len()
    );
    Ok(buffer.into_inner())
}

fn pages_root(doc: &Document) -> Result<ObjectId, MergeError> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|obj| obj.as_reference())
        .map_err(|_| MergeError::MissingPageTree)
}
