//! Geometry and colour primitives shared by pages, links and content operations

use serde_derive::{Deserialize, Serialize};

use crate::units::Pt;

/// A point on a page, measured from the bottom left corner
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: Pt,
    pub y: Pt,
}

impl Point {
    pub fn new(x: Pt, y: Pt) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in PDF user space (origin at the lower left corner)
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

impl Rect {
    pub fn from_wh(width: Pt, height: Pt) -> Self {
        Self {
            x: Pt(0.0),
            y: Pt(0.0),
            width,
            height,
        }
    }

    /// Builds a rectangle from the `[llx lly urx ury]` corners of a PDF rectangle array.
    /// The corners may be given in any order.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: Pt(x0.min(x1)),
            y: Pt(y0.min(y1)),
            width: Pt((x1 - x0).abs()),
            height: Pt((y1 - y0).abs()),
        }
    }

    pub fn right(&self) -> Pt {
        self.x + self.width
    }

    pub fn top(&self) -> Pt {
        self.y + self.height
    }

    /// `[llx lly urx ury]`
    pub fn to_array(&self) -> Vec<lopdf::Object> {
        vec![self.x.into(), self.y.into(), self.right().into(), self.top().into()]
    }
}

/// DeviceRGB colour, components in `0.0..=1.0`
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn grey(level: f32) -> Self {
        Self::new(level, level, level)
    }
}
