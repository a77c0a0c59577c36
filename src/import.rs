//! Parsing of uploaded PDF files whose pages are copied into the packet

use lopdf::{Document, Object, ObjectId};

use crate::errors::RecoverableInputError;
use crate::graphics::Rect;
use crate::units::Pt;

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Parent chains deeper than this are treated as broken
const MAX_TREE_DEPTH: usize = 10;

/// US Letter, used when neither the page nor its ancestors declare a media box
const DEFAULT_MEDIA_BOX: Rect = Rect {
    x: Pt(0.0),
    y: Pt(0.0),
    width: Pt(612.0),
    height: Pt(792.0),
};

/// A parsed foreign PDF. Every page carries its inherited attributes itself,
/// so pages can be detached from their page tree.
#[derive(Debug, Clone)]
pub struct ForeignDocument {
    pub(crate) doc: Document,
    pub(crate) media_boxes: Vec<Rect>,
}

impl ForeignDocument {
    pub fn page_count(&self) -> usize {
        self.media_boxes.len()
    }

    /// Media boxes of the pages, in page order
    pub fn media_boxes(&self) -> &[Rect] {
        &self.media_boxes
    }
}

fn unreadable(reason: impl ToString) -> RecoverableInputError {
    RecoverableInputError::ForeignDocumentUnreadable {
        reason: reason.to_string(),
    }
}

/// Parses an uploaded PDF
pub fn parse_foreign_document(bytes: &[u8]) -> Result<ForeignDocument, RecoverableInputError> {
    if bytes.is_empty() {
        return Err(RecoverableInputError::EmptySource);
    }
    if bytes.windows(b"/Encrypt".len()).any(|window| window == b"/Encrypt") {
        return Err(unreadable("encrypted documents are not supported"));
    }

    let mut doc = Document::load_mem(bytes).map_err(unreadable)?;
    if doc.trailer.has(b"Encrypt") {
        return Err(unreadable("encrypted documents are not supported"));
    }

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if page_ids.is_empty() {
        return Err(RecoverableInputError::EmptyForeignDocument);
    }

    let mut media_boxes = Vec::with_capacity(page_ids.len());
    for id in page_ids {
        media_boxes.push(materialize_inherited(&mut doc, id)?);
    }

    Ok(ForeignDocument { doc, media_boxes })
}

/// Copies inherited attributes onto the page and returns its media box
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<Rect, RecoverableInputError> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| unreadable(format!("page {page_id:?}: {e}")))?;

    let mut inherited = Vec::new();
    for key in INHERITABLE {
        if page.has(key) {
            continue;
        }
        if let Some(value) = find_inherited(doc, page, key) {
            inherited.push((key, value));
        }
    }

    let media_box = match page.get(b"MediaBox") {
        Ok(obj) => Some(obj.clone()),
        Err(_) => inherited.iter().find(|(k, _)| *k == b"MediaBox").map(|(_, v)| v.clone()),
    };
    let media_box = media_box
        .and_then(|obj| rect_from_object(doc, &obj))
        .unwrap_or(DEFAULT_MEDIA_BOX);

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| unreadable(format!("page {page_id:?}: {e}")))?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    page.set("MediaBox", lopdf::Object::Array(media_box.to_array()));

    Ok(media_box)
}

fn find_inherited(doc: &Document, page: &lopdf::Dictionary, key: &[u8]) -> Option<Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

fn rect_from_object(doc: &Document, obj: &Object) -> Option<Rect> {
    let (_, obj) = doc.dereference(obj).ok()?;
    let array = obj.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut v = [0.0_f32; 4];
    for (slot, item) in v.iter_mut().zip(array) {
        let (_, item) = doc.dereference(item).ok()?;
        *slot = item.as_float().ok()?;
    }
    let rect = Rect::from_corners(v[0], v[1], v[2], v[3]);
    if rect.width.0 <= 0.0 || rect.height.0 <= 0.0 {
        return None;
    }
    Some(rect)
}
