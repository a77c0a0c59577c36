//! The document index: one numbered line per document record, each linked to
//! the first page of its document once all pages exist.

use crate::annotation::LinkAnnotation;
use crate::assembler::{PageAssembler, TextBlock};
use crate::cover_letter::CoverLetterMetadata;
use crate::date::DateTime;
use crate::document::DocumentRecord;
use crate::errors::InvariantViolation;
use crate::font::BuiltinFontMetrics;
use crate::graphics::Rect;
use crate::page::{PageHandle, StartPage, StartPageTable};
use crate::text_flow::TextFlow;
use crate::units::Pt;

/// Bold title line above the index body
pub const INDEX_TITLE: &str = "Document Index";

/// Rendered index text and the positions of its numbered lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexText {
    pub text: String,
    /// `(source line, document id)` in record order
    entries: Vec<(usize, String)>,
}

impl IndexText {
    /// Numbered lines as `(source line, document id)`
    pub fn entries(&self) -> &[(usize, String)] {
        &self.entries
    }
}

/// Renders the index for `records`, in record order
pub fn render_index_text(meta: &CoverLetterMetadata, records: &[DocumentRecord], date: &DateTime) -> IndexText {
    let mut lines = vec![
        INDEX_TITLE.to_string(),
        "DOCUMENT INDEX".to_string(),
        String::new(),
        "The following documents are included in this submission:".to_string(),
        String::new(),
    ];

    let mut entries = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        // a line break inside a name would shift every following source line
        let name = record.display_name.split_whitespace().collect::<Vec<_>>().join(" ");
        entries.push((lines.len(), record.id.clone()));
        lines.push(format!("{}. {}", i + 1, name));
    }

    lines.push(String::new());
    lines.push(format!("Total Documents: {}", records.len()));
    lines.push(format!("Submitted by: {}", meta.applicant_name));
    lines.push(format!("Case Number: {}", meta.case_number));
    lines.push(format!("Date: {}", date.long_date()));

    IndexText {
        text: lines.join("\n"),
        entries,
    }
}

/// A numbered index line as drawn, tagged with its document
#[derive(Debug, Clone, PartialEq)]
pub struct IndexLineRecord {
    pub document_id: String,
    pub text: String,
    pub page: PageHandle,
    pub x: Pt,
    pub baseline: Pt,
}

impl IndexLineRecord {
    /// Clickable region over the line: 5pt below the baseline to 10pt above
    pub fn link_rect(&self, max_width: Pt) -> Rect {
        Rect {
            x: self.x,
            y: self.baseline - Pt(5.0),
            width: max_width,
            height: Pt(15.0),
        }
    }
}

/// Draws the index on new pages and records where every numbered line went
pub fn append_index(
    assembler: &mut PageAssembler,
    index: &IndexText,
) -> Result<(TextBlock, Vec<IndexLineRecord>), InvariantViolation> {
    let options = assembler.options().clone();
    let (title, body) = (options.index_title_style(), options.index_style());
    let flow = TextFlow::new(&index.text, options.index_layout(), &BuiltinFontMetrics, |line: &str| {
        if line == INDEX_TITLE {
            title
        } else {
            body
        }
    });

    let block = assembler.append_text_block(flow)?;
    let lines = capture_index_lines(index, &block)?;
    Ok((block, lines))
}

/// Matches the numbered lines of `index` with the rows drawn for them. A
/// wrapped line is represented by its first row.
pub fn capture_index_lines(index: &IndexText, block: &TextBlock) -> Result<Vec<IndexLineRecord>, InvariantViolation> {
    index
        .entries
        .iter()
        .map(|(source_line, id)| {
            let placed = block
                .line(*source_line)
                .ok_or_else(|| InvariantViolation::IndexLineNotPlaced(id.clone()))?;
            Ok(IndexLineRecord {
                document_id: id.clone(),
                text: placed.text.clone(),
                page: placed.page,
                x: placed.x,
                baseline: placed.baseline,
            })
        })
        .collect()
}

/// Attaches a link from every index line to the first page of its document.
///
/// Lines of documents without content pages stay plain text. Returns the
/// number of links created.
pub fn link_index(
    assembler: &mut PageAssembler,
    lines: &[IndexLineRecord],
    table: &StartPageTable,
) -> Result<usize, InvariantViolation> {
    let max_width = assembler.options().max_line_width;
    let mut linked = 0;
    for line in lines {
        match table.require(&line.document_id)? {
            StartPage::Content(target) => {
                let link = LinkAnnotation::go_to_page(line.link_rect(max_width), target);
                assembler.add_link(line.page, link)?;
                linked += 1;
            }
            StartPage::Fallback(_) => {}
        }
    }
    Ok(linked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PacketOptions;
    use crate::text_flow::FlowEvent;
    use pretty_assertions::assert_eq;

    fn meta() -> CoverLetterMetadata {
        CoverLetterMetadata {
            applicant_name: "Ali Raza".into(),
            case_number: "ISL2024001".into(),
            ..Default::default()
        }
    }

    fn date() -> DateTime {
        DateTime::new(2026, 10, 18, 9, 30, 0).unwrap()
    }

    fn records(n: usize) -> Vec<DocumentRecord> {
        (0..n).map(|i| DocumentRecord::new(format!("doc-{i}"), format!("Document {i}"))).collect()
    }

    #[test]
    fn empty_index_text() {
        let index = render_index_text(&meta(), &[], &date());
        assert_eq!(
            index.text,
            "Document Index\nDOCUMENT INDEX\n\nThe following documents are included in this submission:\n\n\n\
             Total Documents: 0\nSubmitted by: Ali Raza\nCase Number: ISL2024001\nDate: October 18, 2026"
        );
        assert!(index.entries().is_empty());
    }

    #[test]
    fn entries_point_at_numbered_lines() {
        let mut recs = records(2);
        recs[1].display_name = "Police\nCertificate ".into();
        let index = render_index_text(&meta(), &recs, &date());
        let lines: Vec<&str> = index.text.split('\n').collect();
        for (n, (source_line, id)) in index.entries().iter().enumerate() {
            assert!(lines[*source_line].starts_with(&format!("{}. ", n + 1)));
            assert_eq!(id, &format!("doc-{n}"));
        }
        assert_eq!(lines[index.entries()[1].0], "2. Police Certificate");
    }

    #[test]
    fn title_then_body_spacing() {
        let mut asm = PageAssembler::new(&PacketOptions::default());
        let index = render_index_text(&meta(), &records(1), &date());
        let (block, lines) = append_index(&mut asm, &index).unwrap();
        let first = &block.lines[0];
        assert_eq!(first.text, INDEX_TITLE);
        assert_eq!(first.baseline, Pt(780.0));
        assert_eq!(block.lines[1].baseline, Pt(750.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "1. Document 0");
    }

    #[test]
    fn long_index_spans_pages() {
        let mut asm = PageAssembler::new(&PacketOptions::default());
        let index = render_index_text(&meta(), &records(80), &date());
        let (block, lines) = append_index(&mut asm, &index).unwrap();
        assert!(block.last_page > block.first_page);
        assert_eq!(lines.len(), 80);
        assert_eq!(lines[0].page, block.first_page);
        assert!(lines[79].page > block.first_page);
        assert!(lines.iter().all(|l| l.baseline >= Pt(50.0)));
    }

    #[test]
    fn missing_rows_are_a_defect() {
        let index = render_index_text(&meta(), &records(1), &date());
        let block = TextBlock {
            first_page: PageHandle(0),
            last_page: PageHandle(0),
            lines: Vec::new(),
        };
        assert_eq!(
            capture_index_lines(&index, &block),
            Err(InvariantViolation::IndexLineNotPlaced("doc-0".into()))
        );
    }

    #[test]
    fn only_documents_with_content_are_linked() {
        let mut asm = PageAssembler::new(&PacketOptions::default());
        let index = render_index_text(&meta(), &records(2), &date());
        let (block, lines) = append_index(&mut asm, &index).unwrap();
        let content = asm.append_text_block(Vec::<FlowEvent>::new()).unwrap().first_page;

        let mut table = StartPageTable::new();
        table.insert("doc-0", StartPage::Content(content)).unwrap();
        table.insert("doc-1", StartPage::Fallback(block.first_page)).unwrap();

        assert_eq!(
            link_index(&mut asm, &lines, &table),
            Err(InvariantViolation::LinkingBeforeAssembly)
        );
        asm.begin_backfill().unwrap();
        assert_eq!(link_index(&mut asm, &lines, &table).unwrap(), 1);

        let links = asm.links(block.first_page).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target(), content);
        let rect = links[0].rect;
        assert_eq!(rect.y, lines[0].baseline - Pt(5.0));
        assert_eq!(rect.top(), lines[0].baseline + Pt(10.0));
        assert_eq!(rect.right(), Pt(545.0));
    }

    #[test]
    fn unknown_document_is_a_defect() {
        let mut asm = PageAssembler::new(&PacketOptions::default());
        let index = render_index_text(&meta(), &records(1), &date());
        let (_, lines) = append_index(&mut asm, &index).unwrap();
        asm.begin_backfill().unwrap();
        assert_eq!(
            link_index(&mut asm, &lines, &StartPageTable::new()),
            Err(InvariantViolation::MissingStartPage("doc-0".into()))
        );
    }
}
