//! Cover letter text of a 221(g) submission

use serde_derive::{Deserialize, Serialize};

use crate::assembler::{PageAssembler, TextBlock};
use crate::date::DateTime;
use crate::document::DocumentRecord;
use crate::errors::InvariantViolation;
use crate::font::BuiltinFontMetrics;
use crate::text_flow::TextFlow;

/// Applicant data printed in the cover letter and the index
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetterMetadata {
    pub applicant_name: String,
    pub case_number: String,
    pub interview_date: String,
    /// Embassy code, e.g. `islamabad`
    pub embassy: String,
    pub additional_notes: String,
}

/// Source of the cover letter text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverLetter {
    /// Render the standard letter from the packet metadata
    FromMetadata,
    /// Text rendered by the caller; paragraphs are separated by blank lines
    Rendered(String),
}

impl Default for CoverLetter {
    fn default() -> Self {
        CoverLetter::FromMetadata
    }
}

const HEADING_PREFIXES: [&str; 6] = [
    "U.S. Embassy",
    "RE:",
    "Dear",
    "Respectfully",
    "DOCUMENTS SUBMITTED:",
    "ADDITIONAL INFORMATION:",
];

/// Lines drawn in the bold heading style
pub fn is_heading_line(line: &str) -> bool {
    HEADING_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the standard cover letter
pub fn render_cover_letter(meta: &CoverLetterMetadata, records: &[DocumentRecord], date: &DateTime) -> String {
    let docs_list = records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{}. {}", i + 1, record.display_name.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    let courier = if meta.embassy.eq_ignore_ascii_case("islamabad") {
        "For submission in Islamabad: I am using the designated courier service as specified in the \
         221(g) letter and have retained the tracking receipt for my records."
    } else {
        ""
    };

    let notes = if meta.additional_notes.is_empty() {
        String::new()
    } else {
        format!("\nADDITIONAL INFORMATION:\n{}\n", meta.additional_notes)
    };

    let letter = format!(
        "\
U.S. Embassy {embassy}
Immigrant Visa Unit

RE: Additional Documents for Case {case}
Applicant: {name}
Interview Date: {interview}

Dear Consular Officer,

I am respectfully submitting the additional documents as requested in my 221(g) letter received after my immigrant visa interview on {interview}.

DOCUMENTS SUBMITTED:
{docs_list}

I have carefully reviewed each document to ensure completeness, proper certification, and translation where required. All documents are originals or certified copies as specified in your 221(g) letter.

{courier}

{notes}

I appreciate your time and consideration of my case. Please contact me at the email or phone number provided in my original application if you require any additional information.

Thank you for your attention to this matter.

Respectfully submitted,
{name}
Case Number: {case}
Date: {date}",
        embassy = capitalize(&meta.embassy),
        case = meta.case_number,
        name = meta.applicant_name,
        interview = meta.interview_date,
        date = date.long_date(),
    );

    letter.trim().to_string()
}

/// Draws the letter starting on a new page; headings are set bold
pub fn append_cover_letter(assembler: &mut PageAssembler, text: &str) -> Result<TextBlock, InvariantViolation> {
    let options = assembler.options().clone();
    let (heading, body) = (options.heading_style(), options.body_style());
    let flow = TextFlow::new(text, options.cover_letter_layout(), &BuiltinFontMetrics, |line: &str| {
        if is_heading_line(line) {
            heading
        } else {
            body
        }
    });
    assembler.append_text_block(flow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(embassy: &str, notes: &str) -> CoverLetterMetadata {
        CoverLetterMetadata {
            applicant_name: "Ali Raza".into(),
            case_number: "ISL2024001".into(),
            interview_date: "2026-09-01".into(),
            embassy: embassy.into(),
            additional_notes: notes.into(),
        }
    }

    fn date() -> DateTime {
        DateTime::new(2026, 10, 18, 0, 0, 0).unwrap()
    }

    #[test]
    fn headings() {
        assert!(is_heading_line("U.S. Embassy Islamabad"));
        assert!(is_heading_line("RE: Additional Documents for Case X"));
        assert!(is_heading_line("Respectfully submitted,"));
        assert!(!is_heading_line("Immigrant Visa Unit"));
        assert!(!is_heading_line("  RE: indented"));
    }

    #[test]
    fn islamabad_letter() {
        let records = vec![DocumentRecord::new("passport", " Passport ")];
        let text = render_cover_letter(&meta("islamabad", ""), &records, &date());
        assert!(text.starts_with("U.S. Embassy Islamabad\nImmigrant Visa Unit\n\nRE:"));
        assert!(text.contains("DOCUMENTS SUBMITTED:\n1. Passport\n\n"));
        assert!(text.contains("For submission in Islamabad:"));
        assert!(!text.contains("ADDITIONAL INFORMATION:"));
        assert!(text.ends_with("Case Number: ISL2024001\nDate: October 18, 2026"));
    }

    #[test]
    fn notes_block_and_other_embassy() {
        let text = render_cover_letter(&meta("karachi", "Courier receipt attached."), &[], &date());
        assert!(text.starts_with("U.S. Embassy Karachi"));
        assert!(!text.contains("For submission in Islamabad"));
        assert!(text.contains("\nADDITIONAL INFORMATION:\nCourier receipt attached.\n"));
    }

    #[test]
    fn letter_is_drawn_from_the_top_margin() {
        use crate::options::PacketOptions;
        use crate::units::Pt;

        let mut asm = PageAssembler::new(&PacketOptions::default());
        let text = render_cover_letter(&meta("islamabad", "Receipt attached."), &[], &date());
        let block = append_cover_letter(&mut asm, &text).unwrap();
        let first = &block.lines[0];
        assert_eq!(first.text, "U.S. Embassy Islamabad");
        assert_eq!(first.baseline, Pt(780.0));
        assert_eq!(block.lines[1].baseline, Pt(765.0));
        // "Immigrant Visa Unit" ends the paragraph
        assert_eq!(block.lines[2].baseline, Pt(740.0));
        assert!(block.lines.iter().all(|l| l.baseline >= Pt(50.0)));
    }

    #[test]
    fn empty_letter_still_gets_a_page() {
        use crate::options::PacketOptions;

        let mut asm = PageAssembler::new(&PacketOptions::default());
        let block = append_cover_letter(&mut asm, "").unwrap();
        assert!(block.lines.is_empty());
        assert_eq!(asm.page_count(), 1);
    }
}
