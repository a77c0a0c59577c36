//! Logical documents of a packet and the files uploaded for them

use serde_derive::{Deserialize, Serialize};

/// Declared kind of an uploaded file, decided once at ingestion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Raster image (JPEG, PNG, ...), placed on a page of its own
    Image,
    /// Multi-page PDF whose pages are copied into the packet
    ForeignDocument,
}

impl SourceKind {
    /// `application/pdf` is a foreign document, everything else an image,
    /// matching how uploads are dispatched by MIME type
    pub fn from_mime_type(mime: &str) -> Self {
        if mime.trim().eq_ignore_ascii_case("application/pdf") {
            SourceKind::ForeignDocument
        } else {
            SourceKind::Image
        }
    }
}

/// One uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub kind: SourceKind,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, kind: SourceKind, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            bytes,
        }
    }

    pub fn image(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, SourceKind::Image, bytes)
    }

    pub fn foreign_document(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, SourceKind::ForeignDocument, bytes)
    }
}

/// A required document, e.g. "Passport", and the files supplied for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: String,
    pub display_name: String,
    pub files: Vec<SourceFile>,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.files.push(file);
        self
    }

    /// Derives records from the stages of an action plan.
    ///
    /// Empty names are skipped, names are trimmed and the id of a record is
    /// `step-<stage>-doc-<position>`, where the position counts only the
    /// non-empty names of that stage.
    pub fn from_action_plan<S, D>(stages: S) -> Vec<DocumentRecord>
    where
        S: IntoIterator<Item = D>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        stages
            .into_iter()
            .enumerate()
            .flat_map(|(stage, documents)| {
                documents
                    .into_iter()
                    .filter(|name| !name.as_ref().is_empty())
                    .enumerate()
                    .map(move |(position, name)| {
                        DocumentRecord::new(format!("step-{stage}-doc-{position}"), name.as_ref().trim())
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_dispatch() {
        assert_eq!(SourceKind::from_mime_type("application/pdf"), SourceKind::ForeignDocument);
        assert_eq!(SourceKind::from_mime_type("image/png"), SourceKind::Image);
        assert_eq!(SourceKind::from_mime_type("image/jpeg"), SourceKind::Image);
    }

    #[test]
    fn action_plan_ids() {
        let stages = vec![
            vec!["Passport ", "", "Birth Certificate"],
            vec![],
            vec!["  Police Certificate"],
        ];
        let records = DocumentRecord::from_action_plan(stages);
        let got: Vec<_> = records.iter().map(|r| (r.id.as_str(), r.display_name.as_str())).collect();
        assert_eq!(
            got,
            vec![
                ("step-0-doc-0", "Passport"),
                ("step-0-doc-1", "Birth Certificate"),
                ("step-2-doc-0", "Police Certificate"),
            ]
        );
        assert!(records.iter().all(|r| r.files.is_empty()));
    }
}
