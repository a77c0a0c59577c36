//! Link annotations: clickable regions that jump to another page of the packet

use lopdf::Object::{Array, Name, Real, Reference};
use lopdf::{Dictionary as LoDictionary, Object, ObjectId};

use crate::errors::InvariantViolation;
use crate::graphics::Rect;
use crate::page::PageHandle;

/// `/Border [0 0 0]`: no visible frame around the region
const NO_BORDER: [f32; 3] = [0.0, 0.0, 0.0];
const LINK_COLOR: [f32; 3] = [0.0, 0.0, 1.0];

/// A borderless region over `rect` that shows `destination` when clicked
#[derive(Debug, PartialEq, Clone)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub destination: Destination,
}

impl LinkAnnotation {
    /// Link jumping to `page`, fitted to the window
    pub fn go_to_page(rect: Rect, page: PageHandle) -> Self {
        Self {
            rect,
            destination: Destination::Fit { page },
        }
    }

    /// Page this link navigates to
    pub fn target(&self) -> PageHandle {
        self.destination.page()
    }

    /// `/Annot` dictionary with a `/GoTo` action; `page_ids` maps page
    /// handles to page objects
    pub(crate) fn to_dictionary(&self, page_ids: &[ObjectId]) -> Result<LoDictionary, InvariantViolation> {
        let action = LoDictionary::from_iter(vec![
            ("Type", Name("Action".into())),
            ("S", Name("GoTo".into())),
            ("D", self.destination.to_array(page_ids)?),
        ]);
        Ok(LoDictionary::from_iter(vec![
            ("Type", Name("Annot".into())),
            ("Subtype", Name("Link".into())),
            ("Rect", Array(self.rect.to_array())),
            ("Border", Array(NO_BORDER.iter().copied().map(Real).collect())),
            ("C", Array(LINK_COLOR.iter().copied().map(Real).collect())),
            // invert the region while it is clicked
            ("H", Name("I".into())),
            ("A", Object::Dictionary(action)),
        ]))
    }
}

#[derive(Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum Destination {
    /// Display `page` with its contents magnified just enough to fit the
    /// entire page within the window both horizontally and vertically.
    Fit { page: PageHandle },
}

impl Destination {
    pub fn page(&self) -> PageHandle {
        match self {
            Destination::Fit { page } => *page,
        }
    }

    /// `[page /Fit]`
    pub(crate) fn to_array(&self, page_ids: &[ObjectId]) -> Result<Object, InvariantViolation> {
        match self {
            Destination::Fit { page } => {
                let id = page_ids
                    .get(page.index())
                    .copied()
                    .ok_or(InvariantViolation::UnknownPage(*page))?;
                Ok(Array(vec![Reference(id), Name("Fit".into())]))
            }
        }
    }
}
