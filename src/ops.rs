//! Content stream operations drawn on generated pages and footers

use lopdf::content::{Content, Operation};
use lopdf::Object::{Name, Real};

use crate::font::{win_ansi_string, BuiltinFont};
use crate::graphics::{Point, Rgb};
use crate::units::Pt;

/// Scale and position of an XObject in page space. Images are painted in a
/// unit square, so the scale equals the drawn size in points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct XObjectTransform {
    pub translate_x: Pt,
    pub translate_y: Pt,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Operations that can occur in a generated page
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `q`
    SaveGraphicsState,
    /// `Q`
    RestoreGraphicsState,
    /// `BT` - Starts a section of text
    StartTextSection,
    /// `ET` - Ends a text section
    EndTextSection,
    /// `Tf` - builtin font and size
    SetFont { font: BuiltinFont, size: Pt },
    /// `Td` from the text origin, i.e. directly after `BT`
    SetTextCursor { pos: Point },
    /// `Tj`
    ShowText { text: String },
    /// `rg`
    SetFillColor { col: Rgb },
    /// `q cm /Name Do Q`
    UseXobject { id: String, transform: XObjectTransform },
}

impl Op {
    /// Draws a single line of text with its baseline starting at `pos`
    pub fn text_line(text: &str, font: BuiltinFont, size: Pt, pos: Point) -> Vec<Op> {
        vec![
            Op::StartTextSection,
            Op::SetFont { font, size },
            Op::SetTextCursor { pos },
            Op::ShowText { text: text.to_string() },
            Op::EndTextSection,
        ]
    }

    /// Appends the low-level operations for this op.
    ///
    /// `font_prefix` is prepended to the font resource names, so pages that
    /// already own an `/F5` resource (imported pages) can use a private name.
    fn push_operations(&self, font_prefix: &str, out: &mut Vec<Operation>) {
        match self {
            Op::SaveGraphicsState => out.push(Operation::new("q", vec![])),
            Op::RestoreGraphicsState => out.push(Operation::new("Q", vec![])),
            Op::StartTextSection => out.push(Operation::new("BT", vec![])),
            Op::EndTextSection => out.push(Operation::new("ET", vec![])),
            Op::SetFont { font, size } => out.push(Operation::new(
                "Tf",
                vec![Name(format!("{font_prefix}{}", font.get_pdf_id()).into_bytes()), (*size).into()],
            )),
            Op::SetTextCursor { pos } => {
                out.push(Operation::new("Td", vec![pos.x.into(), pos.y.into()]))
            }
            Op::ShowText { text } => out.push(Operation::new("Tj", vec![win_ansi_string(text)])),
            Op::SetFillColor { col } => out.push(Operation::new(
                "rg",
                vec![Real(col.r), Real(col.g), Real(col.b)],
            )),
            Op::UseXobject { id, transform } => {
                out.push(Operation::new("q", vec![]));
                out.push(Operation::new(
                    "cm",
                    vec![
                        Real(transform.scale_x),
                        Real(0.0),
                        Real(0.0),
                        Real(transform.scale_y),
                        transform.translate_x.into(),
                        transform.translate_y.into(),
                    ],
                ));
                out.push(Operation::new("Do", vec![Name(id.clone().into_bytes())]));
                out.push(Operation::new("Q", vec![]));
            }
        }
    }
}

/// Fonts referenced by a list of ops, in `BuiltinFont` order
pub(crate) fn fonts_used(ops: &[Op]) -> Vec<BuiltinFont> {
    let mut fonts = ops
        .iter()
        .filter_map(|op| match op {
            Op::SetFont { font, .. } => Some(*font),
            _ => None,
        })
        .collect::<Vec<_>>();
    fonts.sort();
    fonts.dedup();
    fonts
}

pub(crate) fn ops_to_content(ops: &[Op], font_prefix: &str) -> Content {
    let mut operations = Vec::with_capacity(ops.len());
    for op in ops {
        op.push_operations(font_prefix, &mut operations);
    }
    Content { operations }
}
