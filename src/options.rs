//! Layout and output settings of a packet

use serde_derive::{Deserialize, Serialize};

use crate::date::DateTime;
use crate::errors::PacketError;
use crate::font::BuiltinFont;
use crate::graphics::Rect;
use crate::text_flow::{FlowLayout, TextStyle};
use crate::units::Pt;

/// Options for assembling a packet.
///
/// All lengths are in points, vertical positions are baselines measured
/// from the bottom of the page. The band below `content_bottom` is reserved
/// for the footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PacketOptions {
    pub page_width: Pt,
    pub page_height: Pt,
    pub margin_left: Pt,
    /// Baseline of the first line on a generated page
    pub margin_top: Pt,
    /// Lowest baseline a content line may use
    pub content_bottom: Pt,
    pub max_line_width: Pt,
    pub line_height: Pt,
    pub paragraph_gap: Pt,
    pub index_line_gap: Pt,
    pub body_font_size: Pt,
    pub heading_font_size: Pt,
    pub index_font_size: Pt,
    pub index_title_font_size: Pt,
    pub footer_font_size: Pt,
    pub footer_baseline: Pt,
    /// Compress content and image streams on save
    pub compress: bool,
    /// Fixed generation time, `None` uses the current time
    pub generated_at: Option<DateTime>,
    pub title: String,
    pub creator: String,
    pub producer: String,
}

impl Default for PacketOptions {
    fn default() -> Self {
        Self {
            page_width: Pt(595.0),
            page_height: Pt(842.0),
            margin_left: Pt(50.0),
            margin_top: Pt(780.0),
            content_bottom: Pt(50.0),
            max_line_width: Pt(495.0),
            line_height: Pt(15.0),
            paragraph_gap: Pt(10.0),
            index_line_gap: Pt(5.0),
            body_font_size: Pt(11.0),
            heading_font_size: Pt(12.0),
            index_font_size: Pt(12.0),
            index_title_font_size: Pt(16.0),
            footer_font_size: Pt(10.0),
            footer_baseline: Pt(30.0),
            compress: true,
            generated_at: None,
            title: "221(g) Document Packet".to_string(),
            creator: "packetpdf".to_string(),
            producer: concat!("packetpdf ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PacketOptions {
    pub fn validate(&self) -> Result<(), PacketError> {
        let invalid = |msg: String| Err(PacketError::InvalidOptions(msg));

        let lengths = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("left margin", self.margin_left),
            ("top margin", self.margin_top),
            ("content bottom", self.content_bottom),
            ("line width", self.max_line_width),
            ("paragraph gap", self.paragraph_gap),
            ("index line gap", self.index_line_gap),
            ("footer baseline", self.footer_baseline),
        ];
        for (name, value) in lengths {
            if !value.0.is_finite() {
                return invalid(format!("{name} must be a finite length, got {}", value.0));
            }
        }
        if self.margin_left.0 < 0.0 {
            return invalid(format!("left margin {} is outside the page", self.margin_left.0));
        }

        if self.page_width.0 <= 0.0 || self.page_height.0 <= 0.0 {
            return invalid(format!(
                "page size must be positive, got {} x {}",
                self.page_width.0, self.page_height.0
            ));
        }
        if self.max_line_width.0 <= 0.0 || self.margin_left + self.max_line_width > self.page_width {
            return invalid(format!(
                "line width {} at left margin {} does not fit a page {} wide",
                self.max_line_width.0, self.margin_left.0, self.page_width.0
            ));
        }
        if self.margin_top > self.page_height {
            return invalid(format!("top margin {} is above the page", self.margin_top.0));
        }
        if self.content_bottom >= self.margin_top {
            return invalid(format!(
                "content bottom {} must be below the top margin {}",
                self.content_bottom.0, self.margin_top.0
            ));
        }
        if self.footer_baseline.0 < 0.0 || self.footer_baseline >= self.content_bottom {
            return invalid(format!(
                "footer baseline {} must lie inside the footer band [0, {})",
                self.footer_baseline.0, self.content_bottom.0
            ));
        }
        let sizes = [
            ("line height", self.line_height),
            ("body font size", self.body_font_size),
            ("heading font size", self.heading_font_size),
            ("index font size", self.index_font_size),
            ("index title font size", self.index_title_font_size),
            ("footer font size", self.footer_font_size),
        ];
        for (name, value) in sizes {
            if value.0 <= 0.0 || !value.0.is_finite() {
                return invalid(format!("{name} must be positive, got {}", value.0));
            }
        }
        if self.paragraph_gap.0 < 0.0 || self.index_line_gap.0 < 0.0 {
            return invalid("gaps must not be negative".to_string());
        }
        Ok(())
    }

    pub(crate) fn page_rect(&self) -> Rect {
        Rect::from_wh(self.page_width, self.page_height)
    }

    pub(crate) fn cover_letter_layout(&self) -> FlowLayout {
        FlowLayout {
            left: self.margin_left,
            top: self.margin_top,
            bottom: self.content_bottom,
            max_width: self.max_line_width,
            paragraph_gap: self.paragraph_gap,
            line_gap: Pt(0.0),
        }
    }

    pub(crate) fn index_layout(&self) -> FlowLayout {
        FlowLayout {
            left: self.margin_left,
            top: self.margin_top,
            bottom: self.content_bottom,
            max_width: self.max_line_width,
            paragraph_gap: self.index_line_gap,
            line_gap: self.index_line_gap,
        }
    }

    pub(crate) fn body_style(&self) -> TextStyle {
        TextStyle::new(BuiltinFont::Helvetica, self.body_font_size, self.line_height)
    }

    pub(crate) fn heading_style(&self) -> TextStyle {
        TextStyle::new(BuiltinFont::HelveticaBold, self.heading_font_size, self.line_height)
    }

    pub(crate) fn index_style(&self) -> TextStyle {
        TextStyle::new(BuiltinFont::Helvetica, self.index_font_size, self.line_height)
    }

    /// Title leading plus the line gap gives the 30pt drop below the index title
    pub(crate) fn index_title_style(&self) -> TextStyle {
        TextStyle::new(
            BuiltinFont::HelveticaBold,
            self.index_title_font_size,
            self.line_height + Pt(10.0),
        )
    }

    /// Area available to a raster image: the page above the footer band
    pub(crate) fn image_area(&self) -> Rect {
        Rect {
            x: Pt(0.0),
            y: self.content_bottom,
            width: self.page_width,
            height: self.page_height - self.content_bottom,
        }
    }
}
