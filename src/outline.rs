//! Bookmark tree of the packet.
//!
//! The tree is flat: a single root with one item per entry. All sibling and
//! parent links are derived from the entry order, never threaded by hand.

use lopdf::Object::{Array, Integer, Name, Reference};
use lopdf::{Dictionary as LoDictionary, Document, ObjectId};

use crate::assembler::{PageAssembler, Phase};
use crate::document::DocumentRecord;
use crate::errors::InvariantViolation;
use crate::page::{PageHandle, StartPageTable};

pub const COVER_LETTER_TITLE: &str = "Cover Letter";
pub const DOCUMENT_INDEX_TITLE: &str = "Document Index";

/// A `(title, target)` pair, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub target: PageHandle,
}

impl OutlineEntry {
    pub fn new(title: impl Into<String>, target: PageHandle) -> Self {
        Self {
            title: title.into(),
            target,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutlineParent {
    /// The outline's root container
    Root,
}

/// One bookmark. `prev` / `next` are positions in [`Outline::items`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub title: String,
    pub target: PageHandle,
    pub parent: OutlineParent,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// Root container and its items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    items: Vec<OutlineItem>,
}

impl Outline {
    /// Links the entries into a sibling list. No entries, no outline.
    pub fn build(entries: Vec<OutlineEntry>) -> Option<Outline> {
        if entries.is_empty() {
            return None;
        }
        let last = entries.len() - 1;
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| OutlineItem {
                title: entry.title,
                target: entry.target,
                parent: OutlineParent::Root,
                prev: i.checked_sub(1),
                next: if i < last { Some(i + 1) } else { None },
            })
            .collect();
        Some(Outline { items })
    }

    pub fn items(&self) -> &[OutlineItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&OutlineItem> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&OutlineItem> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collects the bookmarks of a packet: the cover letter, the index, then every
/// document that has at least one page of its own, in record order.
pub fn build_outline(
    assembler: &PageAssembler,
    cover_letter: PageHandle,
    index: PageHandle,
    records: &[DocumentRecord],
    table: &StartPageTable,
) -> Result<Option<Outline>, InvariantViolation> {
    if assembler.phase() == Phase::Content {
        return Err(InvariantViolation::LinkingBeforeAssembly);
    }

    let mut entries = vec![
        OutlineEntry::new(COVER_LETTER_TITLE, cover_letter),
        OutlineEntry::new(DOCUMENT_INDEX_TITLE, index),
    ];
    for record in records {
        if let Some(page) = table.require(&record.id)?.content_page() {
            entries.push(OutlineEntry::new(record.display_name.trim(), page));
        }
    }

    for entry in &entries {
        assembler.media_box(entry.target)?;
    }

    Ok(Outline::build(entries))
}

/// Writes the `/Outlines` dictionary and its items, returns the root object
pub(crate) fn write_outline(
    doc: &mut Document,
    outline: &Outline,
    page_ids: &[ObjectId],
) -> Result<ObjectId, InvariantViolation> {
    let root_id = doc.new_object_id();
    let item_ids = outline.items.iter().map(|_| doc.new_object_id()).collect::<Vec<_>>();

    for (item, self_id) in outline.items.iter().zip(&item_ids) {
        let page_id = page_ids
            .get(item.target.index())
            .copied()
            .ok_or(InvariantViolation::UnknownPage(item.target))?;
        let parent = match item.parent {
            OutlineParent::Root => root_id,
        };
        let mut dict = LoDictionary::from_iter(vec![
            ("Parent", Reference(parent)),
            ("Title", crate::utils::text_string(&item.title)),
            ("Dest", Array(vec![Reference(page_id), Name("Fit".into())])),
        ]);
        if let Some(prev) = item.prev {
            dict.set("Prev", Reference(item_ids[prev]));
        }
        if let Some(next) = item.next {
            dict.set("Next", Reference(item_ids[next]));
        }
        doc.set_object(*self_id, dict);
    }

    let mut root = LoDictionary::from_iter(vec![
        ("Type", Name("Outlines".into())),
        ("Count", Integer(outline.items.len() as i64)),
    ]);
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        root.set("First", Reference(*first));
        root.set("Last", Reference(*last));
    }
    doc.set_object(root_id, root);

    Ok(root_id)
}
