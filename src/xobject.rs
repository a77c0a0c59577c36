use lopdf::Object::{Boolean, Integer, Name, Reference};
use lopdf::ObjectId;

/// Color space of image samples
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Greyscale,
}

impl ColorSpace {
    pub fn as_string(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "DeviceRGB",
            ColorSpace::Greyscale => "DeviceGray",
        }
    }
}

/// Describes the format the image bytes are compressed with.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ImageFilter {
    /// zlib / deflate compressed raw samples
    Flate,
    /// Discrete Cosinus Transform, JPEG Baseline.
    DCT,
}

impl ImageFilter {
    pub fn get_id(&self) -> &'static str {
        match self {
            ImageFilter::Flate => "FlateDecode",
            ImageFilter::DCT => "DCTDecode",
        }
    }
}

/// Image XObject, painted in the unit square and scaled with `cm`
#[derive(Debug, PartialEq, Clone)]
pub struct ImageXObject {
    /// Width of the image (original width, not scaled width)
    pub width: u32,
    /// Height of the image (original height, not scaled height)
    pub height: u32,
    pub color_space: ColorSpace,
    /// Bits per color component, always 8 for packet images
    pub bits_per_component: u8,
    /// Should the image be interpolated when scaled?
    pub interpolate: bool,
    /// The encoded image data, see `image_filter`
    pub image_data: Vec<u8>,
    pub image_filter: ImageFilter,
    /// SoftMask for transparency, see page 444 of the adobe pdf 1.4 reference
    pub smask: Option<ObjectId>,
}

impl ImageXObject {
    pub(crate) fn into_stream(self) -> lopdf::Stream {
        let mut dict = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("XObject".into())),
            ("Subtype", Name("Image".into())),
            ("Width", Integer(i64::from(self.width))),
            ("Height", Integer(i64::from(self.height))),
            ("Interpolate", Boolean(self.interpolate)),
            ("BitsPerComponent", Integer(i64::from(self.bits_per_component))),
            ("ColorSpace", Name(self.color_space.as_string().into())),
            ("Filter", Name(self.image_filter.get_id().into())),
        ]);

        if let Some(smask) = self.smask {
            dict.set("SMask", Reference(smask));
        }

        // the samples are already encoded, `Document::compress` must not touch them
        lopdf::Stream::new(dict, self.image_data).with_compression(false)
    }
}
