//! Append-only page sequence of a packet.
//!
//! The [`PageAssembler`] owns the output document while it grows. Pages are
//! only ever appended, every append returns the [`PageHandle`] of the first
//! page it created, and handles are never invalidated. Once all content is in
//! place the assembler moves to the backfill phase, in which navigation can
//! be attached, and finally to the stamped phase after footers were drawn.

use std::collections::BTreeSet;

use lopdf::{Document, Object, ObjectId};

use crate::annotation::LinkAnnotation;
use crate::errors::{AppendError, InvariantViolation};
use crate::graphics::{Point, Rect};
use crate::image::{centered_transform, decode_raster, DecodedImage, ImageData};
use crate::import::{parse_foreign_document, ForeignDocument};
use crate::ops::Op;
use crate::options::PacketOptions;
use crate::page::{PacketPage, PageContent, PageHandle};
use crate::text_flow::FlowEvent;
use crate::units::Pt;
use crate::xobject::{ColorSpace, ImageFilter, ImageXObject};

/// Lifecycle of an assembly run; phases only move forward
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Pages may be appended
    Content,
    /// All pages exist, navigation may be attached
    Backfill,
    /// Footers were drawn, the page sequence is final
    Stamped,
}

/// A line of a text block as it was drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Index of the originating line in `text.split('\n')`
    pub source_line: usize,
    pub page: PageHandle,
    pub x: Pt,
    pub baseline: Pt,
}

/// Result of [`PageAssembler::append_text_block`]
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub first_page: PageHandle,
    pub last_page: PageHandle,
    pub lines: Vec<PlacedLine>,
}

impl TextBlock {
    /// First drawn row of a source line
    pub fn line(&self, source_line: usize) -> Option<&PlacedLine> {
        self.lines.iter().find(|l| l.source_line == source_line)
    }
}

pub struct PageAssembler {
    options: PacketOptions,
    doc: Document,
    pages: Vec<PacketPage>,
    phase: Phase,
    images: usize,
}

impl PageAssembler {
    pub fn new(options: &PacketOptions) -> Self {
        Self {
            options: options.clone(),
            doc: Document::with_version("1.4"),
            pages: Vec::new(),
            phase: Phase::Content,
            images: 0,
        }
    }

    pub fn options(&self) -> &PacketOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Handles of all pages, in page order
    pub fn page_handles(&self) -> impl Iterator<Item = PageHandle> {
        (0..self.pages.len()).map(PageHandle)
    }

    pub fn media_box(&self, page: PageHandle) -> Result<Rect, InvariantViolation> {
        Ok(self.page(page)?.media_box)
    }

    /// Links attached to a page during the backfill pass
    pub fn links(&self, page: PageHandle) -> Result<&[LinkAnnotation], InvariantViolation> {
        Ok(&self.page(page)?.links)
    }

    /// Footer operations stamped onto a page
    pub fn footer(&self, page: PageHandle) -> Result<&[Op], InvariantViolation> {
        Ok(&self.page(page)?.footer)
    }

    /// `true` when the page was copied from a foreign document
    pub fn is_imported(&self, page: PageHandle) -> Result<bool, InvariantViolation> {
        Ok(matches!(self.page(page)?.content, PageContent::Imported { .. }))
    }

    fn page(&self, page: PageHandle) -> Result<&PacketPage, InvariantViolation> {
        self.pages.get(page.0).ok_or(InvariantViolation::UnknownPage(page))
    }

    fn page_mut(&mut self, page: PageHandle) -> Result<&mut PacketPage, InvariantViolation> {
        self.pages.get_mut(page.0).ok_or(InvariantViolation::UnknownPage(page))
    }

    fn ensure_appending(&self) -> Result<(), InvariantViolation> {
        match self.phase {
            Phase::Content => Ok(()),
            Phase::Backfill | Phase::Stamped => Err(InvariantViolation::AppendAfterBackfill),
        }
    }

    fn push_page(&mut self, page: PacketPage) -> PageHandle {
        self.pages.push(page);
        PageHandle(self.pages.len() - 1)
    }

    fn new_generated_page(&mut self) -> PageHandle {
        self.push_page(PacketPage::generated(self.options.page_rect()))
    }

    /// Draws a laid out text, starting on a new page. Every page break of the
    /// flow starts another page. Always creates at least one page.
    pub fn append_text_block<I>(&mut self, events: I) -> Result<TextBlock, InvariantViolation>
    where
        I: IntoIterator<Item = FlowEvent>,
    {
        self.ensure_appending()?;

        let first_page = self.new_generated_page();
        let mut current = first_page;
        let mut lines = Vec::new();

        for event in events {
            let line = match event {
                FlowEvent::PageBreak => {
                    current = self.new_generated_page();
                    continue;
                }
                FlowEvent::Line(line) => line,
            };

            if line.baseline < self.options.content_bottom {
                return Err(InvariantViolation::PageOutOfBand(current));
            }

            let ops = Op::text_line(&line.text, line.style.font, line.style.size, Point::new(line.x, line.baseline));
            match &mut self.page_mut(current)?.content {
                PageContent::Generated { ops: page_ops, .. } => page_ops.extend(ops),
                PageContent::Imported { .. } => return Err(InvariantViolation::UnknownPage(current)),
            }

            lines.push(PlacedLine {
                text: line.text,
                source_line: line.source_line,
                page: current,
                x: line.x,
                baseline: line.baseline,
            });
        }

        Ok(TextBlock {
            first_page,
            last_page: current,
            lines,
        })
    }

    /// Decodes an image and places it on a page of its own
    pub fn append_raster_image(&mut self, bytes: &[u8]) -> Result<PageHandle, AppendError> {
        self.ensure_appending()?;
        let image = decode_raster(bytes)?;
        Ok(self.insert_raster_image(image)?)
    }

    /// Places an already decoded image centered on a new page, scaled down
    /// uniformly to fit above the footer band
    pub fn insert_raster_image(&mut self, image: DecodedImage) -> Result<PageHandle, InvariantViolation> {
        self.ensure_appending()?;

        let smask = image.alpha.map(|alpha| {
            let mask = ImageXObject {
                width: image.width,
                height: image.height,
                color_space: ColorSpace::Greyscale,
                bits_per_component: 8,
                interpolate: false,
                image_data: alpha,
                image_filter: ImageFilter::Flate,
                smask: None,
            };
            self.doc.add_object(mask.into_stream())
        });

        let (image_filter, image_data) = match image.data {
            ImageData::Dct(bytes) => (ImageFilter::DCT, bytes),
            ImageData::Flate(bytes) => (ImageFilter::Flate, bytes),
        };
        let xobject = ImageXObject {
            width: image.width,
            height: image.height,
            color_space: image.color_space,
            bits_per_component: 8,
            interpolate: true,
            image_data,
            image_filter,
            smask,
        };
        let image_id = self.doc.add_object(xobject.into_stream());

        self.images += 1;
        let name = format!("Im{}", self.images);
        let transform = centered_transform(image.width, image.height, &self.options.image_area());

        let mut page = PacketPage::generated(self.options.page_rect());
        page.content = PageContent::Generated {
            ops: vec![Op::UseXobject {
                id: name.clone(),
                transform,
            }],
            xobjects: vec![(name, image_id)],
        };
        Ok(self.push_page(page))
    }

    /// Parses a foreign PDF and copies all of its pages, in order
    pub fn append_foreign_document(&mut self, bytes: &[u8]) -> Result<PageHandle, AppendError> {
        self.ensure_appending()?;
        let foreign = parse_foreign_document(bytes)?;
        Ok(self.insert_foreign_document(foreign)?)
    }

    /// Moves the objects of a parsed foreign document into the packet.
    ///
    /// The foreign objects are renumbered above the packet's highest object
    /// id, so no reference inside the foreign document changes its target.
    /// The foreign catalog and page tree nodes are dropped.
    pub fn insert_foreign_document(&mut self, foreign: ForeignDocument) -> Result<PageHandle, InvariantViolation> {
        self.ensure_appending()?;

        let ForeignDocument { mut doc, media_boxes } = foreign;
        doc.renumber_objects_with(self.doc.max_id + 1);
        // pages and page tree nodes are taken out below, their ids stay reserved
        let highest = doc.objects.keys().map(|id| id.0).max().unwrap_or(0);
        self.doc.max_id = self.doc.max_id.max(doc.max_id).max(highest);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() || page_ids.len() != media_boxes.len() {
            return Err(InvariantViolation::ForeignPagesLost {
                expected: media_boxes.len(),
                found: page_ids.len(),
            });
        }

        let mut page_dicts = Vec::with_capacity(page_ids.len());
        for id in &page_ids {
            match doc.objects.remove(id) {
                Some(Object::Dictionary(mut dict)) => {
                    dict.remove(b"Parent");
                    page_dicts.push(dict);
                }
                _ => {
                    return Err(InvariantViolation::ForeignPagesLost {
                        expected: page_ids.len(),
                        found: page_dicts.len(),
                    })
                }
            }
        }

        let catalog = doc.trailer.get(b"Root").and_then(Object::as_reference).ok();
        let dropped: BTreeSet<ObjectId> = catalog.into_iter().collect();
        for (id, object) in std::mem::take(&mut doc.objects) {
            if dropped.contains(&id) || is_structural(&object) {
                continue;
            }
            self.doc.objects.insert(id, object);
        }

        let mut first = None;
        for ((id, dict), media_box) in page_ids.into_iter().zip(page_dicts).zip(media_boxes) {
            let handle = self.push_page(PacketPage::imported(media_box, id, dict));
            first.get_or_insert(handle);
        }
        first.ok_or(InvariantViolation::ForeignPagesLost { expected: 1, found: 0 })
    }

    /// Ends the content pass; no page can be appended afterwards
    pub fn begin_backfill(&mut self) -> Result<(), InvariantViolation> {
        match self.phase {
            Phase::Content | Phase::Backfill => {
                self.phase = Phase::Backfill;
                Ok(())
            }
            Phase::Stamped => Err(InvariantViolation::FooterAlreadyStamped),
        }
    }

    /// Attaches a link to `page`; only valid during the backfill pass
    pub fn add_link(&mut self, page: PageHandle, link: LinkAnnotation) -> Result<(), InvariantViolation> {
        match self.phase {
            Phase::Content => return Err(InvariantViolation::LinkingBeforeAssembly),
            Phase::Stamped => return Err(InvariantViolation::FooterAlreadyStamped),
            Phase::Backfill => {}
        }
        let target = link.target();
        self.page(target)?;
        self.page_mut(page)?.links.push(link);
        Ok(())
    }

    /// Draws the footer of every page. `footer` receives the page, its media
    /// box and the final page count. Runs exactly once, after the backfill
    /// pass started.
    pub(crate) fn stamp_footers<F>(&mut self, mut footer: F) -> Result<(), InvariantViolation>
    where
        F: FnMut(PageHandle, Rect, usize) -> Vec<Op>,
    {
        match self.phase {
            Phase::Content => return Err(InvariantViolation::StampingBeforeAssembly),
            Phase::Stamped => return Err(InvariantViolation::FooterAlreadyStamped),
            Phase::Backfill => {}
        }
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.footer = footer(PageHandle(i), page.media_box, total);
        }
        self.phase = Phase::Stamped;
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Document, Vec<PacketPage>) {
        (self.doc, self.pages)
    }
}

/// Page tree nodes, catalogs and cross reference streams of a foreign document
fn is_structural(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(d) => d,
        Object::Stream(s) => &s.dict,
        _ => return false,
    };
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(name) => matches!(name, b"Pages" | b"Catalog" | b"XRef" | b"ObjStm"),
        Err(_) => false,
    }
}
