//! Error taxonomy of a packet assembly run.
//!
//! * [`RecoverableInputError`]: one source file could not be used. Never escapes
//!   [`crate::assemble`]; it becomes a [`Diagnostic`].
//! * [`InvariantViolation`]: a defect in the assembly pipeline itself.
//! * [`PacketError`]: what callers of [`crate::assemble`] receive.

use serde_derive::Serialize;

use crate::page::PageHandle;

/// A single source file is unreadable, corrupt or of an unsupported kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecoverableInputError {
    #[error("source file is empty")]
    EmptySource,
    #[error("foreign document is unreadable: {reason}")]
    ForeignDocumentUnreadable { reason: String },
    #[error("foreign document has no pages")]
    EmptyForeignDocument,
    #[error("image could not be decoded: {reason}")]
    ImageUndecodable { reason: String },
    #[error("unsupported image format: {format}")]
    UnsupportedImageFormat { format: String },
}

/// Internal defect: the pipeline broke one of its own ordering or reference rules
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("page handle {0:?} does not refer to an existing page")]
    UnknownPage(PageHandle),
    #[error("no start page was recorded for document '{0}'")]
    MissingStartPage(String),
    #[error("start page for document '{0}' was recorded twice")]
    DuplicateStartPage(String),
    #[error("index line for document '{0}' was never placed on a page")]
    IndexLineNotPlaced(String),
    #[error("pages were appended after the backfill pass started")]
    AppendAfterBackfill,
    #[error("navigation was resolved before all pages were appended")]
    LinkingBeforeAssembly,
    #[error("footers were stamped before all pages were appended")]
    StampingBeforeAssembly,
    #[error("foreign document had {expected} pages when parsed but {found} when imported")]
    ForeignPagesLost { expected: usize, found: usize },
    #[error("footers were already stamped")]
    FooterAlreadyStamped,
    #[error("content on page {0:?} reaches into the footer band")]
    PageOutOfBand(PageHandle),
}

/// Failure of one `append_*` call on the page assembler
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppendError {
    #[error(transparent)]
    Input(#[from] RecoverableInputError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Hard failure of an assembly run; no output is produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    #[error("invalid packet options: {0}")]
    InvalidOptions(String),
    #[error("document id '{0}' appears more than once")]
    DuplicateRecordId(String),
    #[error("assembly invariant violated (this is a bug): {0}")]
    AssemblyInvariantViolation(#[from] InvariantViolation),
    #[error("failed to serialize packet: {0}")]
    Serialization(String),
}

impl PacketError {
    /// `true` when the error is a defect in this crate rather than bad input
    pub fn is_defect(&self) -> bool {
        matches!(self, PacketError::AssemblyInvariantViolation(_))
    }
}

/// One skipped source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub document_id: String,
    pub file_name: String,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(document_id: &str, file_name: &str, error: &RecoverableInputError) -> Self {
        Self {
            document_id: document_id.to_string(),
            file_name: file_name.to_string(),
            reason: error.to_string(),
        }
    }
}
