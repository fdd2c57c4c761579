//! Image decoding and sampling.
//!
//! Turns an arbitrary decodable image into a flat set of RGB pixels that the
//! extractor can cluster. Resizing is only a speed knob: a 200px thumbnail
//! gives the same dominant colors as the full photo.

use image::{self, DynamicImage, GenericImageView, ImageFormat, imageops::FilterType};
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::color::Pixel;
use crate::error::{PaletteError, Result};

/// How the image is shrunk before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResizeTarget {
    /// Longest side capped at `max_dimension`, aspect ratio kept, never upscaled.
    Thumbnail { max_dimension: u32 },
    /// Fixed output resolution.
    Exact { width: u32, height: u32 },
    /// Sample every pixel of the decoded image.
    Original,
}

impl Default for ResizeTarget {
    fn default() -> Self {
        ResizeTarget::Thumbnail { max_dimension: 200 }
    }
}

/// Resampling filter, mirrored from `image::imageops::FilterType` so it can
/// live in config files.
///
/// Defaults to `Nearest`: every sampled pixel is a color that exists in the
/// source, so flat regions keep their exact hex value. Use `CatmullRom` for
/// bicubic thumbnails that blend neighbouring pixels the way PIL's
/// `thumbnail` does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Flattened RGB samples of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSet {
    pub pixels: Vec<Pixel>,
    pub width: u32,
    pub height: u32,
}

impl PixelSet {
    /// Wrap an existing pixel list, e.g. one not coming from an image.
    pub fn from_pixels(pixels: Vec<Pixel>) -> Self {
        let width = pixels.len() as u32;
        PixelSet {
            pixels,
            width,
            height: if width == 0 { 0 } else { 1 },
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

const ACCEPTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Decode raw upload bytes. The format is sniffed when not declared.
pub fn decode(input: &[u8], format: Option<ImageFormat>) -> Result<DynamicImage> {
    let format = match format {
        Some(f) => f,
        None => image::guess_format(input)
            .map_err(|e| PaletteError::unsupported("Unable to detect image format", e))?,
    };
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(PaletteError::unsupported_msg(format!(
            "{format:?} images are not accepted"
        )));
    }

    image::load_from_memory_with_format(input, format)
        .map_err(|e| PaletteError::unsupported(format!("Unable to decode image: {e}"), e))
}

/// Drop alpha, resize, and flatten into a [`PixelSet`].
pub fn preprocess(img: &DynamicImage, resize: ResizeTarget, filter: ResizeFilter) -> Result<PixelSet> {
    let (orig_w, orig_h) = img.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(PaletteError::unsupported_msg("Image has no pixels"));
    }

    // Alpha is discarded, not used as a mask: transparent pixels still count.
    let rgb = img.to_rgb8();

    let (w, h) = target_dimensions(orig_w, orig_h, resize)?;
    let working = if (w, h) == (orig_w, orig_h) {
        rgb
    } else {
        image::imageops::resize(&rgb, w, h, filter.into())
    };
    log::debug!("sampling {orig_w}x{orig_h} image at {w}x{h}");

    let raw = working.into_raw();
    if raw.is_empty() || raw.len() != (w as usize) * (h as usize) * 3 {
        return Err(PaletteError::unsupported_msg(
            "Image does not resolve to three color channels",
        ));
    }

    let pixels = raw
        .chunks_exact(3)
        .map(|chunk| Srgb::new(chunk[0], chunk[1], chunk[2]))
        .collect();

    Ok(PixelSet {
        pixels,
        width: w,
        height: h,
    })
}

/// Output size for a given input size and target.
pub fn target_dimensions(orig_w: u32, orig_h: u32, resize: ResizeTarget) -> Result<(u32, u32)> {
    match resize {
        ResizeTarget::Original => Ok((orig_w, orig_h)),
        ResizeTarget::Exact { width, height } => {
            if width == 0 || height == 0 {
                return Err(PaletteError::invalid_parameter(
                    "resize",
                    format!("{width}x{height}"),
                ));
            }
            Ok((width, height))
        }
        ResizeTarget::Thumbnail { max_dimension } => {
            if max_dimension == 0 {
                return Err(PaletteError::invalid_parameter("max_dimension", 0));
            }
            let max_side = orig_w.max(orig_h);
            if max_side <= max_dimension {
                return Ok((orig_w, orig_h));
            }
            let ratio = max_dimension as f64 / max_side as f64;
            let w = ((orig_w as f64) * ratio).round().max(1.0) as u32;
            let h = ((orig_h as f64) * ratio).round().max(1.0) as u32;
            Ok((w.min(max_dimension), h.min(max_dimension)))
        }
    }
}
