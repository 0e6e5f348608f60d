//! Serialization with tunable structural compactness.
//!
//! Streams are always deflated before writing. What varies per profile is the
//! cross-reference layout (plain table vs. xref/object streams), how many
//! objects share one object stream, and whether viewers are asked to rebuild
//! form-widget appearances.

use std::io::Cursor;

use lopdf::{Document, Object, SaveOptions};

/// Objects packed into one object stream when no tighter limit is requested.
pub const DEFAULT_OBJECTS_PER_STREAM: usize = 50;

/// Serializer knobs for one save pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveProfile {
    /// Group objects into shared object streams with an xref stream
    /// (the PDF 1.5 compact layout) instead of a classic xref table.
    pub object_streams: bool,
    /// Cap on how many objects land in each object stream.
    pub objects_per_stream: usize,
    /// Set /NeedAppearances on the AcroForm so viewers regenerate
    /// form-field appearance streams.
    pub refresh_field_appearances: bool,
}

impl Default for SaveProfile {
    fn default() -> Self {
        Self {
            object_streams: true,
            objects_per_stream: DEFAULT_OBJECTS_PER_STREAM,
            refresh_field_appearances: true,
        }
    }
}

/// Serialize `doc` to an in-memory buffer using the given profile.
pub fn serialize_with_profile(
    doc: &mut Document,
    profile: &SaveProfile,
) -> Result<Vec<u8>, lopdf::Error> {
    doc.compress();

    if profile.refresh_field_appearances {
        request_appearance_refresh(doc);
    }

    let options = SaveOptions::builder()
        .use_object_streams(profile.object_streams)
        .use_xref_streams(profile.object_streams)
        .max_objects_per_stream(profile.objects_per_stream)
        .build();

    let mut buffer = Cursor::new(Vec::new());
    doc.save_with_options(&mut buffer, options)?;
    Ok(buffer.into_inner())
}

/// Flag the document's AcroForm (if any) so viewers rebuild widget
/// appearances on open. Documents without forms are left untouched.
fn request_appearance_refresh(doc: &mut Document) {
    let root_id = match doc.trailer.get(b"Root").and_then(|obj| obj.as_reference()) {
        Ok(id) => id,
        Err(_) => return,
    };

    let acro_form = doc
        .get_object(root_id)
        .and_then(|obj| obj.as_dict())
        .ok()
        .and_then(|catalog| catalog.get(b"AcroForm").ok().cloned());

    match acro_form {
        Some(Object::Reference(form_id)) => {
            if let Ok(form) = doc.get_dictionary_mut(form_id) {
                form.set("NeedAppearances", true);
            }
        }
        Some(Object::Dictionary(mut form)) => {
            form.set("NeedAppearances", true);
            if let Ok(catalog) = doc.get_dictionary_mut(root_id) {
                catalog.set("AcroForm", Object::Dictionary(form));
            }
        }
        _ => {}
    }
}
