//! Page arena of the packet and the table of first pages per document

use lopdf::ObjectId;

use crate::annotation::LinkAnnotation;
use crate::errors::InvariantViolation;
use crate::graphics::Rect;
use crate::ops::Op;

/// Stable reference to a page of the packet. Handles are issued in insertion
/// order and stay valid for the whole assembly run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageHandle(pub(crate) usize);

impl PageHandle {
    /// Zero based position in the packet
    pub fn index(&self) -> usize {
        self.0
    }

    /// One based page number, as printed in the footer
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

#[derive(Debug, Clone)]
pub(crate) enum PageContent {
    /// Page drawn by the packet itself
    Generated {
        ops: Vec<Op>,
        /// `/XObject` resource names and their objects
        xobjects: Vec<(String, ObjectId)>,
    },
    /// Page copied from a foreign document. `id` is the renumbered object id
    /// of the page, so references from inside the foreign document stay valid.
    Imported { id: ObjectId, dict: lopdf::Dictionary },
}

#[derive(Debug, Clone)]
pub(crate) struct PacketPage {
    pub media_box: Rect,
    pub content: PageContent,
    pub links: Vec<LinkAnnotation>,
    /// Drawn after the content, in the band below `content_bottom`
    pub footer: Vec<Op>,
}

impl PacketPage {
    pub fn generated(media_box: Rect) -> Self {
        Self {
            media_box,
            content: PageContent::Generated {
                ops: Vec::new(),
                xobjects: Vec::new(),
            },
            links: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn imported(media_box: Rect, id: ObjectId, dict: lopdf::Dictionary) -> Self {
        Self {
            media_box,
            content: PageContent::Imported { id, dict },
            links: Vec::new(),
            footer: Vec::new(),
        }
    }
}

/// Where the navigation for a document points
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StartPage {
    /// First page that was appended for the document
    Content(PageHandle),
    /// Nothing was appended; the entry points at the index's first page and
    /// never produces a link or an outline entry
    Fallback(PageHandle),
}

impl StartPage {
    pub fn page(&self) -> PageHandle {
        match self {
            StartPage::Content(h) | StartPage::Fallback(h) => *h,
        }
    }

    pub fn content_page(&self) -> Option<PageHandle> {
        match self {
            StartPage::Content(h) => Some(*h),
            StartPage::Fallback(_) => None,
        }
    }
}

/// Document id to start page, in document order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StartPageTable {
    entries: Vec<(String, StartPage)>,
}

impl StartPageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, start: StartPage) -> Result<(), InvariantViolation> {
        if self.get(id).is_some() {
            return Err(InvariantViolation::DuplicateStartPage(id.to_string()));
        }
        self.entries.push((id.to_string(), start));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<StartPage> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| *v)
    }

    /// Like [`get`](Self::get), but a missing entry is a defect
    pub fn require(&self, id: &str) -> Result<StartPage, InvariantViolation> {
        self.get(id).ok_or_else(|| InvariantViolation::MissingStartPage(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, StartPage)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
