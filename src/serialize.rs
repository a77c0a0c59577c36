use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::Dictionary as LoDictionary;
use lopdf::Object::{Array, Dictionary, Integer, Name, Reference};
use lopdf::StringFormat::Literal;
use lopdf::Stream as LoStream;
use lopdf::{Document, Object, ObjectId};

use crate::assembler::PageAssembler;
use crate::date::DateTime;
use crate::errors::PacketError;
use crate::font::BuiltinFont;
use crate::ops::{fonts_used, ops_to_content};
use crate::outline::{write_outline, Outline};
use crate::page::{PacketPage, PageContent};

/// Font resource prefix for footers drawn on imported pages, so the footer
/// never collides with a font name of the imported page
const IMPORTED_FONT_PREFIX: &str = "Pkt";

/// Entries of the `/Info` dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PacketInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: DateTime,
}

fn serialization_error(e: impl ToString) -> PacketError {
    PacketError::Serialization(e.to_string())
}

/// Writes the assembled packet as PDF bytes
pub(crate) fn serialize_packet(
    assembler: PageAssembler,
    outline: Option<&Outline>,
    info: &PacketInfo,
) -> Result<Vec<u8>, PacketError> {
    let compress = assembler.options().compress;
    let (mut doc, pages) = assembler.into_parts();

    let pages_id = doc.new_object_id();

    // fonts are shared by all pages
    let font_ids = BuiltinFont::all_ids()
        .into_iter()
        .map(|font| (font, doc.add_object(font.to_dictionary())))
        .collect::<BTreeMap<_, _>>();

    // Pre-allocated IDs of the pages, imported pages keep theirs
    let page_ids = pages
        .iter()
        .map(|page| match &page.content {
            PageContent::Generated { .. } => doc.new_object_id(),
            PageContent::Imported { id, .. } => *id,
        })
        .collect::<Vec<_>>();

    for (page, page_id) in pages.into_iter().zip(page_ids.iter().copied()) {
        let annots = page
            .links
            .iter()
            .map(|link| Ok(Reference(doc.add_object(link.to_dictionary(&page_ids)?))))
            .collect::<Result<Vec<_>, PacketError>>()?;

        let mut dict = match page.content {
            PageContent::Generated { .. } => generated_page(&mut doc, page, &font_ids, annots)?,
            PageContent::Imported { .. } => imported_page(&mut doc, page, &font_ids, annots)?,
        };
        dict.set("Parent", Reference(pages_id));
        doc.objects.insert(page_id, Dictionary(dict));
    }

    let pages = LoDictionary::from_iter(vec![
        ("Type", Name("Pages".into())),
        ("Count", Integer(page_ids.len() as i64)),
        ("Kids", Array(page_ids.iter().map(|id| Reference(*id)).collect::<Vec<_>>())),
    ]);
    doc.objects.insert(pages_id, Dictionary(pages));

    let mut catalog = LoDictionary::from_iter(vec![
        ("Type", Name("Catalog".into())),
        ("PageLayout", Name("OneColumn".into())),
        ("PageMode", Name("UseNone".into())),
        ("Pages", Reference(pages_id)),
    ]);

    if let Some(outline) = outline {
        let outline_id = write_outline(&mut doc, outline, &page_ids)?;
        catalog.set("Outlines", Reference(outline_id));
        catalog.set("PageMode", Name("UseOutlines".into()));
    }

    let catalog_id = doc.add_object(catalog);
    let instance_id = crate::utils::random_character_string_32();
    let document_id = crate::utils::random_character_string_32();
    let document_info_id = doc.add_object(Dictionary(info_to_dict(info)));

    doc.trailer.set("Root", Reference(catalog_id));
    doc.trailer.set("Info", Reference(document_info_id));
    doc.trailer.set(
        "ID",
        Array(vec![
            Object::String(document_id.into_bytes(), Literal),
            Object::String(instance_id.into_bytes(), Literal),
        ]),
    );

    if compress {
        doc.compress();
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(serialization_error)?;
    Ok(bytes)
}

fn font_resources(fonts: &[BuiltinFont], font_ids: &BTreeMap<BuiltinFont, ObjectId>, prefix: &str) -> LoDictionary {
    let mut dict = LoDictionary::new();
    for font in fonts {
        if let Some(id) = font_ids.get(font) {
            dict.set(format!("{prefix}{}", font.get_pdf_id()), Reference(*id));
        }
    }
    dict
}

fn encode(content: &Content) -> Result<Vec<u8>, PacketError> {
    content.encode().map_err(serialization_error)
}

/// Page drawn by the packet: content and footer share one stream
fn generated_page(
    doc: &mut Document,
    page: PacketPage,
    font_ids: &BTreeMap<BuiltinFont, ObjectId>,
    annots: Vec<Object>,
) -> Result<LoDictionary, PacketError> {
    let (mut ops, xobjects) = match page.content {
        PageContent::Generated { ops, xobjects } => (ops, xobjects),
        PageContent::Imported { .. } => (Vec::new(), Vec::new()),
    };
    ops.extend(page.footer);

    let content = encode(&ops_to_content(&ops, ""))?;
    let content_id = doc.add_object(LoStream::new(LoDictionary::new(), content));

    let mut resources = LoDictionary::new();
    let fonts = font_resources(&fonts_used(&ops), font_ids, "");
    if !fonts.is_empty() {
        resources.set("Font", Dictionary(fonts));
    }
    if !xobjects.is_empty() {
        let xobject_dict = LoDictionary::from_iter(xobjects.into_iter().map(|(name, id)| (name, Reference(id))));
        resources.set("XObject", Dictionary(xobject_dict));
    }

    let mut dict = LoDictionary::from_iter(vec![
        ("Type", Name("Page".into())),
        ("MediaBox", Array(page.media_box.to_array())),
        ("Contents", Reference(content_id)),
        ("Resources", Dictionary(resources)),
    ]);
    if !annots.is_empty() {
        dict.set("Annots", Array(annots));
    }
    Ok(dict)
}

/// Page copied from a foreign document.
///
/// The original content streams are wrapped in `q ... Q`, so a graphics state
/// left open by the foreign page cannot affect the footer, which is drawn in
/// an extra stream after them.
fn imported_page(
    doc: &mut Document,
    page: PacketPage,
    font_ids: &BTreeMap<BuiltinFont, ObjectId>,
    annots: Vec<Object>,
) -> Result<LoDictionary, PacketError> {
    let mut dict = match page.content {
        PageContent::Imported { dict, .. } => dict,
        PageContent::Generated { .. } => LoDictionary::new(),
    };

    let mut contents = content_references(doc, dict.get(b"Contents").ok());
    if !page.footer.is_empty() {
        let save = Content {
            operations: vec![Operation::new("q", vec![])],
        };
        let save_id = doc.add_object(LoStream::new(LoDictionary::new(), encode(&save)?));

        let mut footer = ops_to_content(&page.footer, IMPORTED_FONT_PREFIX);
        footer.operations.insert(0, Operation::new("Q", vec![]));
        let footer_id = doc.add_object(LoStream::new(LoDictionary::new(), encode(&footer)?));

        contents.insert(0, Reference(save_id));
        contents.push(Reference(footer_id));

        let mut resources = resolved_dictionary(doc, dict.get(b"Resources").ok());
        let mut fonts = resolved_dictionary(doc, resources.get(b"Font").ok());
        let footer_fonts = font_resources(&fonts_used(&page.footer), font_ids, IMPORTED_FONT_PREFIX);
        for (key, value) in footer_fonts.iter() {
            fonts.set(key.clone(), value.clone());
        }
        resources.set("Font", Dictionary(fonts));
        dict.set("Resources", Dictionary(resources));
    }
    dict.set("Contents", Array(contents));

    if !annots.is_empty() {
        let mut all = match dict.get(b"Annots") {
            Ok(existing) => resolved_array(doc, existing),
            Err(_) => Vec::new(),
        };
        all.extend(annots);
        dict.set("Annots", Array(all));
    }

    Ok(dict)
}

/// `/Contents` as a list of stream references
fn content_references(doc: &Document, contents: Option<&Object>) -> Vec<Object> {
    match contents {
        Some(Reference(id)) => match doc.get_object(*id) {
            Ok(Array(items)) => items.clone(),
            _ => vec![Reference(*id)],
        },
        Some(Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn resolved_array(doc: &Document, obj: &Object) -> Vec<Object> {
    match doc.dereference(obj) {
        Ok((_, Array(items))) => items.clone(),
        _ => Vec::new(),
    }
}

/// Copy of a direct or indirect dictionary; missing or broken entries are
/// treated as empty
fn resolved_dictionary(doc: &Document, obj: Option<&Object>) -> LoDictionary {
    let Some(obj) = obj else {
        return LoDictionary::new();
    };
    match doc.dereference(obj) {
        Ok((_, Dictionary(dict))) => dict.clone(),
        _ => {
            log::warn!("imported page has an unreadable resource dictionary, replacing it");
            LoDictionary::new()
        }
    }
}

fn info_to_dict(info: &PacketInfo) -> LoDictionary {
    let creation_date = Object::String(info.creation_date.to_pdf_timestamp().into_bytes(), Literal);

    LoDictionary::from_iter(vec![
        ("Title", crate::utils::text_string(&info.title)),
        ("Author", crate::utils::text_string(&info.author)),
        ("Subject", crate::utils::text_string(&info.subject)),
        ("Creator", crate::utils::text_string(&info.creator)),
        ("Producer", crate::utils::text_string(&info.producer)),
        ("CreationDate", creation_date.clone()),
        ("ModDate", creation_date),
    ])
}
