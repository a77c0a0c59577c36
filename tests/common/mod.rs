// tests/common/mod.rs
//
// Fixtures generated in code and helpers to look into a finished packet.

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use packetpdf::{CoverLetterMetadata, DateTime, PacketOptions};

pub fn options() -> PacketOptions {
    PacketOptions {
        compress: false,
        generated_at: Some(generation_date()),
        ..Default::default()
    }
}

pub fn generation_date() -> DateTime {
    DateTime::new(2026, 10, 18, 9, 15, 0).unwrap()
}

pub fn metadata() -> CoverLetterMetadata {
    CoverLetterMetadata {
        applicant_name: "Ali Raza".into(),
        case_number: "ISL2024001".into(),
        interview_date: "September 1, 2026".into(),
        embassy: "islamabad".into(),
        additional_notes: String::new(),
    }
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::new_rgb8(width, height), ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::new_rgb8(width, height), ImageFormat::Png)
}

/// Left half opaque red, right half fully transparent
pub fn translucent_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbaImage::new(width, height);
    for (x, _, px) in img.enumerate_pixels_mut() {
        *px = if x < width / 2 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 0, 0]) };
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// PDF whose pages read "page 1", "page 2", ... and inherit a 300 x 400
/// media box and their font from the page tree
pub fn foreign_pdf(pages: usize) -> Vec<u8> {
    ForeignPdf::new(pages).build()
}

/// Shape of a generated foreign PDF
pub struct ForeignPdf {
    pages: usize,
    catalog_first: bool,
    nested: bool,
}

impl ForeignPdf {
    pub fn new(pages: usize) -> Self {
        Self { pages, catalog_first: false, nested: false }
    }

    /// Catalog and page tree get the lowest ids, the last page the highest
    pub fn catalog_first(mut self) -> Self {
        self.catalog_first = true;
        self
    }

    /// Pages hang below an intermediate `/Pages` node that carries a
    /// 200 x 250 media box and the font; the root carries neither
    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let catalog_id = self.catalog_first.then(|| doc.new_object_id());
        let root_id = doc.new_object_id();
        let mid_id = self.nested.then(|| doc.new_object_id());
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let parent_id = mid_id.unwrap_or(root_id);
        let mut kids: Vec<Object> = Vec::new();
        for i in 0..self.pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![40.into(), 200.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("page {}", i + 1))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => parent_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = self.pages as i64;
        let font = dictionary! { "Font" => dictionary! { "F1" => font_id } };
        let root = match mid_id {
            Some(mid_id) => {
                doc.objects.insert(
                    mid_id,
                    Object::Dictionary(dictionary! {
                        "Type" => "Pages",
                        "Parent" => root_id,
                        "Kids" => kids,
                        "Count" => count,
                        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(200), Object::Integer(250)],
                        "Resources" => font,
                    }),
                );
                dictionary! {
                    "Type" => "Pages",
                    "Kids" => vec![Object::Reference(mid_id)],
                    "Count" => count,
                }
            }
            None => dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(300), Object::Integer(400)],
                "Resources" => font,
            },
        };
        doc.objects.insert(root_id, Object::Dictionary(root));

        let catalog = dictionary! { "Type" => "Catalog", "Pages" => root_id };
        let catalog_id = match catalog_id {
            Some(id) => {
                doc.objects.insert(id, Object::Dictionary(catalog));
                id
            }
            None => doc.add_object(catalog),
        };
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

/// Highest object number used by the pages of a PDF and by anything else
pub fn highest_ids(bytes: &[u8]) -> (u32, u32) {
    let doc = Document::load_mem(bytes).unwrap();
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let highest_page = pages.iter().map(|id| id.0).max().unwrap();
    let highest_other = doc.objects.keys().filter(|id| !pages.contains(id)).map(|id| id.0).max().unwrap();
    (highest_page, highest_other)
}

/// A packet parsed back with lopdf
pub struct Inspected {
    pub doc: Document,
    pub pages: Vec<ObjectId>,
}

impl Inspected {
    pub fn load(bytes: &[u8]) -> Self {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_index(&self, id: ObjectId) -> usize {
        self.pages.iter().position(|p| *p == id).unwrap()
    }

    fn operations(&self, page: usize) -> Vec<Operation> {
        let content = self.doc.get_page_content(self.pages[page]).unwrap();
        Content::decode(&content).unwrap().operations
    }

    /// Every string shown with `Tj`, Latin-1 decoded
    pub fn texts(&self, page: usize) -> Vec<String> {
        self.operations(page)
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.iter().map(|b| *b as char).collect()),
                _ => None,
            })
            .collect()
    }

    /// Operands of every `cm` on the page
    pub fn transforms(&self, page: usize) -> Vec<Vec<f32>> {
        self.operations(page)
            .into_iter()
            .filter(|op| op.operator == "cm")
            .map(|op| op.operands.iter().map(|o| o.as_float().unwrap()).collect())
            .collect()
    }

    pub fn page_dict(&self, page: usize) -> &lopdf::Dictionary {
        self.doc.get_dictionary(self.pages[page]).unwrap()
    }

    pub fn media_box(&self, page: usize) -> Vec<f32> {
        let array = self.page_dict(page).get(b"MediaBox").unwrap().as_array().unwrap();
        array.iter().map(|o| o.as_float().unwrap()).collect()
    }

    /// `(target page, rect)` of every link annotation on the page
    pub fn links(&self, page: usize) -> Vec<(usize, Vec<f32>)> {
        let annots = match self.page_dict(page).get(b"Annots") {
            Ok(annots) => annots.as_array().unwrap().clone(),
            Err(_) => return Vec::new(),
        };
        annots
            .iter()
            .map(|annot| {
                let annot = self.doc.get_dictionary(annot.as_reference().unwrap()).unwrap();
                let rect = annot
                    .get(b"Rect")
                    .unwrap()
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|o| o.as_float().unwrap())
                    .collect();
                let action = annot.get(b"A").unwrap().as_dict().unwrap();
                let dest = action.get(b"D").unwrap().as_array().unwrap();
                assert_eq!(dest[1].as_name().unwrap(), b"Fit");
                (self.page_index(dest[0].as_reference().unwrap()), rect)
            })
            .collect()
    }

    pub fn all_links(&self) -> Vec<(usize, usize)> {
        (0..self.page_count())
            .flat_map(|page| self.links(page).into_iter().map(move |(target, _)| (page, target)))
            .collect()
    }

    /// `(title, target page)` of the bookmarks, following `First` / `Next`
    pub fn outline(&self) -> Vec<(String, usize)> {
        let catalog = self.doc.catalog().unwrap();
        let root_id = match catalog.get(b"Outlines") {
            Ok(root) => root.as_reference().unwrap(),
            Err(_) => return Vec::new(),
        };
        let root = self.doc.get_dictionary(root_id).unwrap();
        let mut items = Vec::new();
        let mut prev: Option<ObjectId> = None;
        let mut next = root.get(b"First").ok().map(|o| o.as_reference().unwrap());
        while let Some(id) = next {
            let item = self.doc.get_dictionary(id).unwrap();
            assert_eq!(item.get(b"Parent").unwrap().as_reference().unwrap(), root_id);
            assert_eq!(item.get(b"Prev").ok().map(|o| o.as_reference().unwrap()), prev);
            let title = match item.get(b"Title").unwrap() {
                Object::String(bytes, _) => String::from_utf8(bytes.clone()).unwrap(),
                other => panic!("unexpected title {other:?}"),
            };
            let dest = item.get(b"Dest").unwrap().as_array().unwrap();
            items.push((title, self.page_index(dest[0].as_reference().unwrap())));
            prev = Some(id);
            next = item.get(b"Next").ok().map(|o| o.as_reference().unwrap());
        }
        assert_eq!(root.get(b"Last").unwrap().as_reference().unwrap(), prev.unwrap());
        assert_eq!(root.get(b"Count").unwrap().as_i64().unwrap(), items.len() as i64);
        items
    }

    pub fn outline_titles(&self) -> Vec<String> {
        self.outline().into_iter().map(|(title, _)| title).collect()
    }
}
