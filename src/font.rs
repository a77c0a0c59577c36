//! Builtin (standard 14) fonts used by the packet and their advance widths.
//!
//! Only the two Helvetica faces are needed. They are referenced, not embedded,
//! and encoded with `WinAnsiEncoding`, so measuring text only requires the
//! glyph widths from the Adobe font metrics (in 1/1000 em).

use lopdf::Object::Name;
use lopdf::{Dictionary as LoDictionary, Object, StringFormat};
use serde_derive::{Deserialize, Serialize};

use crate::text_flow::{TextMeasure, TextStyle};
use crate::units::Pt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl Default for BuiltinFont {
    fn default() -> Self {
        BuiltinFont::Helvetica
    }
}

/// Widths for `' '..='~'` (0x20 - 0x7E), Helvetica.afm
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Widths for `' '..='~'` (0x20 - 0x7E), Helvetica-Bold.afm
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// U+00A0 to U+00FF, from the Helvetica AFM
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

impl BuiltinFont {
    /// Resource name of the font inside a page's `/Font` dictionary
    pub fn get_pdf_id(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F5",
            BuiltinFont::HelveticaBold => "F6",
        }
    }

    /// PostScript name (`/BaseFont`)
    pub fn get_id(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn all_ids() -> [BuiltinFont; 2] {
        [BuiltinFont::Helvetica, BuiltinFont::HelveticaBold]
    }

    /// Advance width of a single character in 1/1000 em.
    ///
    /// Characters that are not in `WinAnsiEncoding` are drawn as `?`, so they
    /// are measured as `?` as well.
    pub fn glyph_width(&self, ch: char) -> u16 {
        let (table, latin1) = match self {
            BuiltinFont::Helvetica => (&HELVETICA_WIDTHS, &HELVETICA_LATIN1_WIDTHS),
            BuiltinFont::HelveticaBold => (&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_LATIN1_WIDTHS),
        };
        let bold = *self == BuiltinFont::HelveticaBold;
        match ch {
            ' '..='~' => table[ch as usize - 0x20],
            '\u{2018}' | '\u{2019}' | '\u{201A}' => if bold { 278 } else { 222 },
            '\u{201C}' | '\u{201D}' | '\u{201E}' => 500,
            '\u{2013}' | '\u{20AC}' => 556,
            '\u{2014}' | '\u{2026}' | '\u{2030}' => 1000,
            '\u{2022}' => 350,
            '\u{A0}'..='\u{FF}' => latin1[ch as usize - 0xA0],
            _ => table['?' as usize - 0x20],
        }
    }

    /// Width of `text` set at `size`
    pub fn text_width(&self, text: &str, size: Pt) -> Pt {
        let units: u32 = text.chars().map(|c| u32::from(self.glyph_width(c))).sum();
        Pt(units as f32 * size.0 / 1000.0)
    }

    /// Font dictionary for a non-embedded standard font
    pub(crate) fn to_dictionary(&self) -> LoDictionary {
        LoDictionary::from_iter(vec![
            ("Type", Name("Font".into())),
            ("Subtype", Name("Type1".into())),
            ("BaseFont", Name(self.get_id().into())),
            ("Encoding", Name("WinAnsiEncoding".into())),
        ])
    }
}

/// Measures text with the builtin font metrics of the style's font
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BuiltinFontMetrics;

impl TextMeasure for BuiltinFontMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> Pt {
        style.font.text_width(text, style.size)
    }
}

/// Encodes a string as a `WinAnsiEncoding` literal string object
pub(crate) fn win_ansi_string(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

/// Maps `text` to `WinAnsiEncoding` (CP-1252) bytes, replacing unmappable characters with `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' | '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2030}' => 0x89,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_widths() {
        let f = BuiltinFont::Helvetica;
        assert_eq!(f.glyph_width(' '), 278);
        assert_eq!(f.glyph_width('A'), 667);
        assert_eq!(f.glyph_width('i'), 222);
        assert_eq!(f.glyph_width('~'), 584);
        // "Page" = 667 + 556 + 556 + 556
        assert_eq!(f.text_width("Page", Pt(10.0)), Pt(23.35));
    }

    #[test]
    fn latin1_widths() {
        let f = BuiltinFont::Helvetica;
        assert_eq!(f.glyph_width('Ä'), 667);
        assert_eq!(f.glyph_width('í'), 278);
        assert_eq!(f.glyph_width('Æ'), 1000);
        assert_eq!(f.glyph_width('ç'), 500);
        assert_eq!(f.glyph_width('ÿ'), 500);
        let b = BuiltinFont::HelveticaBold;
        assert_eq!(b.glyph_width('Ä'), 722);
        assert_eq!(b.glyph_width('ö'), 611);
        assert_eq!(b.glyph_width('\u{A0}'), 278);
        // 500 + 556 + 500 + 556
        assert_eq!(f.text_width("José", Pt(10.0)), Pt(21.12));
    }

    #[test]
    fn bold_is_wider() {
        let text = "DOCUMENTS SUBMITTED:";
        let regular = BuiltinFont::Helvetica.text_width(text, Pt(12.0));
        let bold = BuiltinFont::HelveticaBold.text_width(text, Pt(12.0));
        assert!(bold > regular);
    }

    #[test]
    fn win_ansi_replaces_unmappable() {
        assert_eq!(encode_win_ansi("Café – ok"), b"Caf\xe9 \x96 ok".to_vec());
        assert_eq!(encode_win_ansi("Ali 李"), b"Ali ?".to_vec());
        assert_eq!(BuiltinFont::Helvetica.glyph_width('李'), BuiltinFont::Helvetica.glyph_width('?'));
    }

    #[test]
    fn font_dictionary_names_base_font() {
        let dict = BuiltinFont::HelveticaBold.to_dictionary();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
        assert_eq!(dict.get(b"Encoding").unwrap().as_name().unwrap(), b"WinAnsiEncoding");
    }
}
