//! One assembly run: cover letter, index, uploaded files, navigation,
//! footers, bytes.
//!
//! Files that cannot be used are skipped and reported as [`Diagnostic`]s.
//! Every other failure aborts the run without producing output.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assembler::PageAssembler;
use crate::cover_letter::{append_cover_letter, render_cover_letter, CoverLetter, CoverLetterMetadata};
use crate::date::DateTime;
use crate::document::{DocumentRecord, SourceFile, SourceKind};
use crate::errors::{Diagnostic, PacketError, RecoverableInputError};
use crate::footer::stamp_footers;
use crate::image::{decode_raster, DecodedImage};
use crate::import::{parse_foreign_document, ForeignDocument};
use crate::index::{append_index, link_index, render_index_text};
use crate::options::PacketOptions;
use crate::outline::build_outline;
use crate::page::{PageHandle, StartPage, StartPageTable};
use crate::serialize::{serialize_packet, PacketInfo};

/// Everything a packet is built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketInput {
    pub cover_letter: CoverLetter,
    pub metadata: CoverLetterMetadata,
    /// Documents in index order; ids must be unique
    pub records: Vec<DocumentRecord>,
}

impl PacketInput {
    pub fn new(metadata: CoverLetterMetadata, records: Vec<DocumentRecord>) -> Self {
        Self {
            cover_letter: CoverLetter::FromMetadata,
            metadata,
            records,
        }
    }

    pub fn with_cover_letter(mut self, text: impl Into<String>) -> Self {
        self.cover_letter = CoverLetter::Rendered(text.into());
        self
    }
}

/// A finished packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOutput {
    pub bytes: Vec<u8>,
    /// Skipped source files, in input order
    pub diagnostics: Vec<Diagnostic>,
    pub page_count: usize,
    /// Zero based page each document starts on, in record order. Documents
    /// without pages point at the first page of the index.
    pub start_pages: Vec<(String, usize)>,
}

impl PacketOutput {
    pub fn start_page(&self, document_id: &str) -> Option<usize> {
        self.start_pages.iter().find(|(id, _)| id == document_id).map(|(_, page)| *page)
    }
}

/// Source file decoded or parsed, ready to be inserted
enum PreparedSource {
    Image(DecodedImage),
    ForeignDocument(ForeignDocument),
}

fn prepare(file: &SourceFile) -> Result<PreparedSource, RecoverableInputError> {
    match file.kind {
        SourceKind::Image => decode_raster(&file.bytes).map(PreparedSource::Image),
        SourceKind::ForeignDocument => parse_foreign_document(&file.bytes).map(PreparedSource::ForeignDocument),
    }
}

/// Decoding is pure, so the files of a document may be prepared in parallel.
/// Results keep the order of `files`.
#[cfg(feature = "rayon")]
fn prepare_files(files: &[SourceFile]) -> Vec<Result<PreparedSource, RecoverableInputError>> {
    use rayon::prelude::*;
    files.par_iter().map(prepare).collect()
}

#[cfg(not(feature = "rayon"))]
fn prepare_files(files: &[SourceFile]) -> Vec<Result<PreparedSource, RecoverableInputError>> {
    files.iter().map(prepare).collect()
}

/// Assembles a packet
pub fn assemble(input: &PacketInput, options: &PacketOptions) -> Result<PacketOutput, PacketError> {
    assemble_with_cancel(input, options, &AtomicBool::new(false))
}

/// Assembles a packet, checking `cancel` before every document.
///
/// Once `cancel` is set the remaining documents are treated as if no file was
/// uploaded for them. The packet is still finished and returned.
pub fn assemble_with_cancel(
    input: &PacketInput,
    options: &PacketOptions,
    cancel: &AtomicBool,
) -> Result<PacketOutput, PacketError> {
    options.validate()?;
    check_unique_ids(&input.records)?;

    let date = options.generated_at.unwrap_or_else(DateTime::now);
    let meta = &input.metadata;
    log::info!(
        "assembling packet for case {:?}: {} documents, {} files",
        meta.case_number,
        input.records.len(),
        input.records.iter().map(|r| r.files.len()).sum::<usize>()
    );

    let mut assembler = PageAssembler::new(options);

    let cover_text = match &input.cover_letter {
        CoverLetter::FromMetadata => render_cover_letter(meta, &input.records, &date),
        CoverLetter::Rendered(text) => text.clone(),
    };
    let cover = append_cover_letter(&mut assembler, &cover_text)?;

    let index_text = render_index_text(meta, &input.records, &date);
    let (index, index_lines) = append_index(&mut assembler, &index_text)?;
    log::debug!(
        "cover letter on {} page(s), index on {} page(s)",
        cover.last_page.index() - cover.first_page.index() + 1,
        index.last_page.index() - index.first_page.index() + 1
    );

    let mut table = StartPageTable::new();
    let mut diagnostics = Vec::new();
    let mut cancelled = false;

    for record in &input.records {
        if !cancelled && cancel.load(Ordering::Relaxed) {
            log::warn!("assembly cancelled before document '{}', remaining documents are left empty", record.id);
            cancelled = true;
        }
        let first_page = if cancelled {
            None
        } else {
            append_record(&mut assembler, record, &mut diagnostics)?
        };

        let start = match first_page {
            Some(page) => StartPage::Content(page),
            None => StartPage::Fallback(index.first_page),
        };
        table.insert(&record.id, start)?;
    }

    assembler.begin_backfill()?;
    let links = link_index(&mut assembler, &index_lines, &table)?;
    let outline = build_outline(&assembler, cover.first_page, index.first_page, &input.records, &table)?;
    let page_count = stamp_footers(&mut assembler, &date)?;

    let start_pages = table
        .iter()
        .map(|(id, start)| (id.to_string(), start.page().index()))
        .collect();

    let info = PacketInfo {
        title: options.title.clone(),
        author: meta.applicant_name.clone(),
        subject: meta.case_number.clone(),
        creator: options.creator.clone(),
        producer: options.producer.clone(),
        creation_date: date,
    };
    let bytes = serialize_packet(assembler, outline.as_ref(), &info)?;

    log::info!(
        "packet assembled: {} pages, {} links, {} bookmarks, {} skipped files, {} bytes",
        page_count,
        links,
        outline.as_ref().map_or(0, |o| o.len()),
        diagnostics.len(),
        bytes.len()
    );

    Ok(PacketOutput {
        bytes,
        diagnostics,
        page_count,
        start_pages,
    })
}

fn check_unique_ids(records: &[DocumentRecord]) -> Result<(), PacketError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(PacketError::DuplicateRecordId(record.id.clone()));
        }
    }
    Ok(())
}

/// Inserts the files of one document in order and returns the first page that
/// was created. Unusable files become diagnostics.
fn append_record(
    assembler: &mut PageAssembler,
    record: &DocumentRecord,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<PageHandle>, PacketError> {
    let mut first_page = None;

    for (file, prepared) in record.files.iter().zip(prepare_files(&record.files)) {
        let before = assembler.page_count();
        let page = match prepared {
            Ok(PreparedSource::Image(image)) => assembler.insert_raster_image(image)?,
            Ok(PreparedSource::ForeignDocument(doc)) => assembler.insert_foreign_document(doc)?,
            Err(e) => {
                log::warn!("skipping '{}' of document '{}': {}", file.file_name, record.id, e);
                diagnostics.push(Diagnostic::new(&record.id, &file.file_name, &e));
                continue;
            }
        };
        log::debug!(
            "'{}' of document '{}' added {} page(s) at page {}",
            file.file_name,
            record.id,
            assembler.page_count() - before,
            page.number()
        );
        first_page.get_or_insert(page);
    }

    Ok(first_page)
}
