//! End-to-end tests: encoded image bytes in, ranked palette out.

use dominant_colors_wasm::{
    PaletteConfig, PaletteError, ResizeTarget, extract_palette_bytes, extract_palette_image,
    from_hex,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

/// Left 60% red, next 30% blue, last 10% white.
fn striped(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, _| {
        let pos = x * 10 / width;
        if pos < 6 {
            Rgb([220, 20, 30])
        } else if pos < 9 {
            Rgb([20, 40, 200])
        } else {
            Rgb([250, 250, 250])
        }
    });
    DynamicImage::ImageRgb8(img)
}

#[test]
fn test_two_by_two_scenario() {
    let mut img = RgbImage::new(2, 2);
    img.put_pixel(0, 0, Rgb([255, 0, 0]));
    img.put_pixel(1, 0, Rgb([255, 0, 0]));
    img.put_pixel(0, 1, Rgb([0, 255, 0]));
    img.put_pixel(1, 1, Rgb([0, 0, 255]));
    let bytes = encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png);

    let config = PaletteConfig {
        palette_size: 3,
        ..PaletteConfig::default()
    };
    let summary = extract_palette_bytes(&bytes, &config).unwrap();

    let got: Vec<(&str, usize)> = summary
        .swatches
        .iter()
        .map(|s| (s.hex.as_str(), s.count))
        .collect();
    assert_eq!(got, vec![("#ff0000", 2), ("#00ff00", 1), ("#0000ff", 1)]);
}

#[test]
fn test_solid_image_does_not_fail() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([30, 60, 90])));
    let summary = extract_palette_bytes(&encode(&img, ImageFormat::Png), &PaletteConfig::default())
        .unwrap();

    assert_eq!(summary.swatches.len(), 5);
    assert_eq!(summary.total_pixels, 100);
    assert_eq!(summary.swatches.iter().map(|s| s.count).sum::<usize>(), 100);
    assert!(summary.swatches.iter().all(|s| s.hex == "#1e3c5a"));
}

#[test]
fn test_striped_image_ranking() {
    let img = striped(400, 100);
    let config = PaletteConfig {
        palette_size: 3,
        ..PaletteConfig::default()
    };
    let summary = extract_palette_bytes(&encode(&img, ImageFormat::Png), &config).unwrap();

    assert_eq!((summary.width, summary.height), (200, 50));
    assert_eq!(summary.total_pixels, 200 * 50);

    let hexes: Vec<&str> = summary.swatches.iter().map(|s| s.hex.as_str()).collect();
    assert_eq!(hexes, vec!["#dc141e", "#1428c8", "#fafafa"]);
    assert!((summary.swatches[0].share - 0.6).abs() < 0.02);
}

#[test]
fn test_properties_on_noisy_image() {
    let img = RgbImage::from_fn(64, 48, |x, y| {
        Rgb([
            (x * 4) as u8,
            (y * 5) as u8,
            ((x * 7 + y * 3) % 256) as u8,
        ])
    });
    let bytes = encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png);
    let config = PaletteConfig {
        palette_size: 6,
        seed: 99,
        ..PaletteConfig::default()
    };

    let first = extract_palette_bytes(&bytes, &config).unwrap();
    let second = extract_palette_bytes(&bytes, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.swatches.len(), 6);
    assert_eq!(
        first.swatches.iter().map(|s| s.count).sum::<usize>(),
        64 * 48
    );
    assert!(first.swatches.windows(2).all(|w| w[0].count >= w[1].count));
    for swatch in &first.swatches {
        assert_eq!(from_hex(&swatch.hex).unwrap(), swatch.color);
    }
}

#[test]
fn test_naming_enabled() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])));
    let config = PaletteConfig {
        palette_size: 1,
        enable_naming: true,
        resize: ResizeTarget::Original,
        ..PaletteConfig::default()
    };
    let summary = extract_palette_image(&img, &config).unwrap();

    assert_eq!(summary.swatches[0].name.as_deref(), Some("red"));
}

#[test]
fn test_naming_disabled_by_default() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])));
    let summary = extract_palette_image(&img, &PaletteConfig::default()).unwrap();
    assert!(summary.swatches.iter().all(|s| s.name.is_none()));
}

#[test]
fn test_named_preset_resamples_to_fixed_size() {
    let img = striped(120, 80);
    let summary = extract_palette_image(&img, &PaletteConfig::named()).unwrap();

    assert_eq!((summary.width, summary.height), (600, 400));
    assert_eq!(summary.total_pixels, 240_000);
    assert!(summary.swatches.iter().all(|s| s.name.is_some()));
}

#[test]
fn test_png_alpha_is_ignored() {
    let img = RgbaImage::from_pixel(6, 6, Rgba([0, 128, 0, 10]));
    let bytes = encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png);
    let config = PaletteConfig {
        palette_size: 2,
        enable_naming: true,
        ..PaletteConfig::default()
    };

    let summary = extract_palette_bytes(&bytes, &config).unwrap();
    assert_eq!(summary.swatches[0].hex, "#008000");
    assert_eq!(summary.swatches[0].count, 36);
    assert_eq!(summary.swatches[0].name.as_deref(), Some("green"));
}

#[test]
fn test_invalid_bytes_are_reported() {
    let err = extract_palette_bytes(b"GIF89a but not really", &PaletteConfig::default())
        .unwrap_err();
    assert!(matches!(err, PaletteError::UnsupportedFormat { .. }));
    assert!(err.user_message().contains("Invalid image"));
}

#[test]
fn test_palette_larger_than_image() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([1, 1, 1])));
    let config = PaletteConfig {
        palette_size: 5,
        ..PaletteConfig::default()
    };
    let err = extract_palette_image(&img, &config).unwrap_err();

    assert!(matches!(
        err,
        PaletteError::InvalidClusterCount { requested: 5, available: 2 }
    ));
}

#[test]
fn test_failure_does_not_poison_next_call() {
    assert!(extract_palette_bytes(&[], &PaletteConfig::default()).is_err());

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])));
    let bytes = encode(&img, ImageFormat::Png);
    assert!(extract_palette_bytes(&bytes, &PaletteConfig::default()).is_ok());
}

#[test]
fn test_jpeg_input() {
    let bytes = encode(&striped(100, 40), ImageFormat::Jpeg);
    let config = PaletteConfig {
        palette_size: 3,
        ..PaletteConfig::default()
    };
    let summary = extract_palette_bytes(&bytes, &config).unwrap();

    assert_eq!(summary.swatches.len(), 3);
    let top = summary.swatches[0].color;
    assert!(top.red > 180 && top.green < 70 && top.blue < 80);
}

#[test]
fn test_webp_input() {
    let img = RgbaImage::from_pixel(5, 5, Rgba([10, 200, 30, 255]));
    let bytes = encode(&DynamicImage::ImageRgba8(img), ImageFormat::WebP);
    let config = PaletteConfig {
        palette_size: 2,
        ..PaletteConfig::default()
    };

    let summary = extract_palette_bytes(&bytes, &config).unwrap();
    assert_eq!(summary.total_pixels, 25);
    assert_eq!(summary.swatches[0].hex, "#0ac81e");
    assert_eq!(summary.swatches[0].count, 25);
}
