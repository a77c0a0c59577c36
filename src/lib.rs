//! # packetpdf
//!
//! packetpdf assembles a single navigable PDF "packet" out of a cover letter,
//! a list of required documents and the files uploaded for each of them.
//!
//! The packet consists of
//!
//! - the cover letter (rendered from [`CoverLetterMetadata`] or supplied as text),
//! - a document index with one numbered line per document, linked to the first
//!   page of that document,
//! - every uploaded file, in order: raster images on a page of their own,
//!   PDFs with all of their pages,
//! - a bookmark outline, and a footer with the generation date and
//!   `Page i of N` on every page.
//!
//! Files that cannot be read are skipped and reported as [`Diagnostic`]s.
//!
//! ```rust,no_run
//! use packetpdf::*;
//!
//! let metadata = CoverLetterMetadata {
//!     applicant_name: "Ali Raza".into(),
//!     case_number: "ISL2024001".into(),
//!     embassy: "islamabad".into(),
//!     ..Default::default()
//! };
//!
//! let passport = std::fs::read("passport.jpg").unwrap();
//! let records = vec![
//!     DocumentRecord::new("passport", "Passport")
//!         .with_file(SourceFile::image("passport.jpg", passport)),
//! ];
//!
//! let packet = assemble(&PacketInput::new(metadata, records), &PacketOptions::default()).unwrap();
//! for diagnostic in &packet.diagnostics {
//!     eprintln!("skipped {}: {}", diagnostic.file_name, diagnostic.reason);
//! }
//! std::fs::write("packet.pdf", &packet.bytes).unwrap();
//! ```
//!
//! ## Building blocks
//!
//! The run in [`assemble`] is a fixed pipeline over a [`PageAssembler`]:
//! content pass (cover letter, index, uploads), then the backfill pass
//! ([`link_index`], [`build_outline`]), then [`stamp_footers`], then
//! serialization. The steps are public so they can be driven individually.

pub mod annotation;
pub mod assembler;
pub mod cover_letter;
pub mod date;
pub mod document;
pub mod errors;
pub mod font;
pub mod footer;
pub mod graphics;
pub mod image;
pub mod import;
pub mod index;
pub mod ops;
pub mod options;
pub mod outline;
pub mod packet;
pub mod page;
pub mod text_flow;
pub mod units;
pub mod xobject;

mod serialize;
mod utils;

pub use crate::annotation::*;
pub use crate::assembler::*;
pub use crate::cover_letter::*;
pub use crate::date::*;
pub use crate::document::*;
pub use crate::errors::*;
pub use crate::font::*;
pub use crate::footer::*;
pub use crate::graphics::*;
pub use crate::image::*;
pub use crate::import::*;
pub use crate::index::*;
pub use crate::ops::*;
pub use crate::options::*;
pub use crate::outline::*;
pub use crate::packet::*;
pub use crate::page::*;
pub use crate::text_flow::*;
pub use crate::units::*;
pub use crate::xobject::*;
