use palette::Srgb;

use crate::error::{PaletteError, Result};

/// A single sampled image location: 8-bit sRGB channels.
pub type Pixel = Srgb<u8>;

/// Format a color as `#rrggbb`.
pub fn to_hex(color: Pixel) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parse `#rrggbb` / `rrggbb` in either case.
pub fn from_hex(s: &str) -> Result<Pixel> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PaletteError::invalid_parameter("hex", s));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| PaletteError::invalid_parameter("hex", s))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Render a color the way the palette details list shows it: `(r, g, b)`.
pub fn rgb_string(color: Pixel) -> String {
    format!("({}, {}, {})", color.red, color.green, color.blue)
}

/// Squared Euclidean distance in plain RGB space, channels unweighted.
#[inline(always)]
pub(crate) fn distance_squared(a: Pixel, b: Pixel) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Round a real-valued 0-255 channel to the nearest integer, clamped.
#[inline(always)]
pub(crate) fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_format() {
        assert_eq!(to_hex(Srgb::new(255, 0, 128)), "#ff0080");
        assert_eq!(to_hex(Srgb::new(0, 0, 0)), "#000000");
    }

    #[test]
    fn test_hex_round_trip() {
        let colors = [
            Srgb::new(0u8, 0, 0),
            Srgb::new(255, 255, 255),
            Srgb::new(18, 52, 86),
            Srgb::new(171, 205, 239),
        ];
        for color in colors {
            assert_eq!(from_hex(&to_hex(color)).unwrap(), color);
        }
    }

    #[test]
    fn test_from_hex_accepts_upper_and_bare() {
        assert_eq!(from_hex("ABCDEF").unwrap(), Srgb::new(0xab, 0xcd, 0xef));
        assert_eq!(from_hex("#abcdef").unwrap(), Srgb::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(from_hex("#abc").is_err());
        assert!(from_hex("#gg0000").is_err());
        assert!(from_hex("#ééé").is_err());
        assert!(from_hex("+1+2+3").is_err());
        assert!(from_hex("#+f+f+f").is_err());
        assert!(matches!(
            from_hex("12345"),
            Err(PaletteError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rgb_string() {
        assert_eq!(rgb_string(Srgb::new(1, 22, 255)), "(1, 22, 255)");
    }

    #[test]
    fn test_clamp_channel() {
        assert_eq!(clamp_channel(-3.2), 0);
        assert_eq!(clamp_channel(254.5), 255);
        assert_eq!(clamp_channel(300.0), 255);
        assert_eq!(clamp_channel(127.49), 127);
    }

    #[test]
    fn test_distance_squared() {
        let a = Srgb::new(0, 0, 0);
        let b = Srgb::new(255, 255, 255);
        assert_eq!(distance_squared(a, b), 3 * 255 * 255);
        assert_eq!(distance_squared(b, b), 0);
    }
}
