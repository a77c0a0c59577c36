//! Decoding of uploaded raster images into PDF image samples.
//!
//! Baseline JPEGs with one or three components are embedded unchanged
//! (`/DCTDecode`); every other image is decoded with the `image` crate and
//! stored as deflated 8-bit samples, with an alpha channel split off into a
//! soft mask. Decoding is pure and may run on any thread.

use image::{ColorType, DynamicImage, ImageError, ImageFormat};

use crate::errors::RecoverableInputError;
use crate::graphics::Rect;
use crate::ops::XObjectTransform;
use crate::xobject::ColorSpace;

/// Encoded samples of a decoded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
    /// The original JPEG file
    Dct(Vec<u8>),
    /// zlib compressed 8-bit samples, row by row
    Flate(Vec<u8>),
}

/// Raster image ready to be placed on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub data: ImageData,
    /// zlib compressed 8-bit alpha channel, one byte per pixel
    pub alpha: Option<Vec<u8>>,
}

fn undecodable(e: impl ToString) -> RecoverableInputError {
    RecoverableInputError::ImageUndecodable { reason: e.to_string() }
}

/// Decodes an uploaded image file
pub fn decode_raster(bytes: &[u8]) -> Result<DecodedImage, RecoverableInputError> {
    if bytes.is_empty() {
        return Err(RecoverableInputError::EmptySource);
    }

    let format = image::guess_format(bytes).map_err(undecodable)?;
    let dynamic = image::load_from_memory_with_format(bytes, format).map_err(|e| match e {
        ImageError::Unsupported(_) => RecoverableInputError::UnsupportedImageFormat {
            format: format!("{format:?}"),
        },
        other => undecodable(other),
    })?;

    let (width, height) = (dynamic.width(), dynamic.height());
    if width == 0 || height == 0 {
        return Err(undecodable("image has no pixels"));
    }

    if format == ImageFormat::Jpeg {
        let passthrough = match (dynamic.color(), jpeg_component_count(bytes)) {
            (ColorType::L8, Some(1)) => Some(ColorSpace::Greyscale),
            (ColorType::Rgb8, Some(3)) => Some(ColorSpace::Rgb),
            _ => None,
        };
        if let Some(color_space) = passthrough {
            return Ok(DecodedImage {
                width,
                height,
                color_space,
                data: ImageData::Dct(bytes.to_vec()),
                alpha: None,
            });
        }
    }

    to_flate_samples(dynamic)
}

fn to_flate_samples(dynamic: DynamicImage) -> Result<DecodedImage, RecoverableInputError> {
    let (width, height) = (dynamic.width(), dynamic.height());
    let color = dynamic.color();

    let (color_space, samples, alpha) = match (color.has_color(), color.has_alpha()) {
        (true, true) => {
            let (rgb, alpha) = crate::utils::rgba_to_rgb(dynamic.to_rgba8().as_raw());
            (ColorSpace::Rgb, rgb, Some(alpha))
        }
        (true, false) => (ColorSpace::Rgb, dynamic.into_rgb8().into_raw(), None),
        (false, true) => {
            let (luma, alpha) = crate::utils::la_to_luma(dynamic.to_luma_alpha8().as_raw());
            (ColorSpace::Greyscale, luma, Some(alpha))
        }
        (false, false) => (ColorSpace::Greyscale, dynamic.into_luma8().into_raw(), None),
    };

    // fully opaque masks are dropped
    let alpha = match alpha.filter(|a| a.iter().any(|v| *v != u8::MAX)) {
        Some(a) => Some(crate::utils::compress(&a).map_err(undecodable)?),
        None => None,
    };

    Ok(DecodedImage {
        width,
        height,
        color_space,
        data: ImageData::Flate(crate::utils::compress(&samples).map_err(undecodable)?),
        alpha,
    })
}

/// Uniform scale that fits `width` x `height` pixels into `area` without
/// enlarging the image (1 px = 1 pt at scale 1)
pub fn fit_scale(width: u32, height: u32, area: &Rect) -> f32 {
    let sx = area.width.0 / width as f32;
    let sy = area.height.0 / height as f32;
    sx.min(sy).min(1.0)
}

/// Places the image in the center of `area`, scaled with [`fit_scale`]
pub fn centered_transform(width: u32, height: u32, area: &Rect) -> XObjectTransform {
    let scale = fit_scale(width, height, area);
    let (w, h) = (width as f32 * scale, height as f32 * scale);
    XObjectTransform {
        translate_x: area.x + crate::units::Pt((area.width.0 - w) / 2.0),
        translate_y: area.y + crate::units::Pt((area.height.0 - h) / 2.0),
        scale_x: w,
        scale_y: h,
    }
}

/// Number of color components declared in the first SOF segment of a JPEG
pub(crate) fn jpeg_component_count(bytes: &[u8]) -> Option<u8> {
    if bytes.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(pos + 1)?;
        match marker {
            // fill bytes
            0xFF => {
                pos += 1;
                continue;
            }
            // markers without a length
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let len = u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]) as usize;
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        if len < 2 {
            return None;
        }
        pos += 2 + len;
    }
}
