//! Dominant color extraction for uploaded images.
//!
//! An image is decoded, shrunk, flattened to RGB samples, and clustered with
//! k-means. The clusters come back ranked by how many pixels they hold, each
//! with hex/RGB values and, optionally, the nearest CSS color name.
//!
//! ```rust,no_run
//! use dominant_colors_wasm::{extract_palette_bytes, PaletteConfig};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let summary = extract_palette_bytes(&bytes, &PaletteConfig::named())?;
//! for swatch in &summary.swatches {
//!     println!("{} {:?} {:.1}%", swatch.hex, swatch.name, swatch.share * 100.0);
//! }
//! # Ok::<(), dominant_colors_wasm::PaletteError>(())
//! ```

use std::panic::{self, AssertUnwindSafe};

use image::DynamicImage;
use js_sys::{Array, Object, Reflect};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod names;
pub mod preprocess;

pub use color::{Pixel, from_hex, rgb_string, to_hex};
pub use config::PaletteConfig;
pub use error::{PaletteError, Result};
pub use extract::{Cluster, ClusterParams, Palette, extract, extract_with};
pub use names::{NamedColor, name, named_color};
pub use preprocess::{PixelSet, ResizeFilter, ResizeTarget, decode, preprocess};

/// One ranked palette entry, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: Pixel,
    pub hex: String,
    pub count: usize,
    /// `count / total_pixels`
    pub share: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Everything the host needs to render a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteSummary {
    pub swatches: Vec<Swatch>,
    pub total_pixels: usize,
    /// Dimensions the image was sampled at.
    pub width: u32,
    pub height: u32,
}

/// Decode `input` and extract its palette.
///
/// Any panic raised while processing is caught and reported as
/// [`PaletteError::Processing`], so a bad upload never takes the host down.
pub fn extract_palette_bytes(input: &[u8], config: &PaletteConfig) -> Result<PaletteSummary> {
    guarded(|| {
        let img = decode(input, None)?;
        run_pipeline(&img, config)
    })
}

/// Extract the palette of an already decoded image.
pub fn extract_palette_image(img: &DynamicImage, config: &PaletteConfig) -> Result<PaletteSummary> {
    guarded(|| run_pipeline(img, config))
}

fn run_pipeline(img: &DynamicImage, config: &PaletteConfig) -> Result<PaletteSummary> {
    let pixels = preprocess(img, config.resize, config.filter)?;
    let palette = extract_with(&pixels, &config.cluster_params())?;

    let swatches = palette
        .clusters
        .iter()
        .map(|cluster| Swatch {
            color: cluster.centroid,
            hex: to_hex(cluster.centroid),
            count: cluster.count,
            share: palette.share(cluster),
            name: config
                .enable_naming
                .then(|| name(cluster.centroid).to_string()),
        })
        .collect::<Vec<_>>();

    log::info!(
        "extracted {} colors from {} pixels ({}x{})",
        swatches.len(),
        palette.total_pixels,
        pixels.width,
        pixels.height
    );

    Ok(PaletteSummary {
        swatches,
        total_pixels: palette.total_pixels,
        width: pixels.width,
        height: pixels.height,
    })
}

fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        log::warn!("palette extraction panicked: {message}");
        Err(PaletteError::Processing { message })
    })
}

/// Extract the dominant colors of an uploaded image.
///
/// Returns `{ width, height, total, colors }` where every entry of `colors`
/// is `{ hex, rgb: [r, g, b], count, share, name? }`, most prevalent first.
/// `max_dimension` defaults to a 200px thumbnail and `seed` to 42.
#[wasm_bindgen]
pub fn extract_palette(
    input: Vec<u8>,
    palette_size: usize,
    max_dimension: Option<u32>,
    seed: Option<u32>,
    with_names: bool,
) -> std::result::Result<Object, JsValue> {
    let mut config = PaletteConfig {
        palette_size,
        enable_naming: with_names,
        ..PaletteConfig::default()
    };
    if let Some(max_dimension) = max_dimension {
        config.resize = ResizeTarget::Thumbnail { max_dimension };
    }
    if let Some(seed) = seed {
        config.seed = seed as u64;
    }

    let summary =
        extract_palette_bytes(&input, &config).map_err(|e| JsValue::from_str(&e.user_message()))?;

    let colors = Array::new();
    for swatch in &summary.swatches {
        let rgb = Array::new();
        rgb.push(&JsValue::from(swatch.color.red));
        rgb.push(&JsValue::from(swatch.color.green));
        rgb.push(&JsValue::from(swatch.color.blue));

        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(&swatch.hex))?;
        Reflect::set(&entry, &JsValue::from_str("rgb"), &rgb)?;
        Reflect::set(&entry, &JsValue::from_str("count"), &JsValue::from(swatch.count as f64))?;
        Reflect::set(&entry, &JsValue::from_str("share"), &JsValue::from(swatch.share))?;
        if let Some(name) = &swatch.name {
            Reflect::set(&entry, &JsValue::from_str("name"), &JsValue::from_str(name))?;
        }
        colors.push(&entry);
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("width"), &JsValue::from(summary.width))?;
    Reflect::set(&result, &JsValue::from_str("height"), &JsValue::from(summary.height))?;
    Reflect::set(
        &result,
        &JsValue::from_str("total"),
        &JsValue::from(summary.total_pixels as f64),
    )?;
    Reflect::set(&result, &JsValue::from_str("colors"), &colors)?;

    Ok(result)
}
