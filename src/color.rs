//! Hex color handling for the settings file
//!
//! Popup colors are stored as `#RRGGBB` / `#AARRGGBB` strings so the config
//! stays hand-editable. Invalid strings never fail a popup; they fall back
//! to the compiled-in default with a log line.

use egui::Color32;
use tracing::error;

/// Parse a hex color string - supports both #RRGGBB and #AARRGGBB formats.
/// 6-digit hex is treated as full-opacity RGB.
pub fn parse_hex_color(hex: &str) -> Result<Color32, ()> {
    let hex = hex.trim_start_matches('#');

    match hex.len() {
        6 => {
            let rr = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ())?;
            let gg = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ())?;
            let bb = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ())?;
            Ok(Color32::from_rgba_unmultiplied(rr, gg, bb, 255))
        }
        8 => {
            let aa = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ())?;
            let rr = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ())?;
            let gg = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ())?;
            let bb = u8::from_str_radix(&hex[6..8], 16).map_err(|_| ())?;
            Ok(Color32::from_rgba_unmultiplied(rr, gg, bb, aa))
        }
        _ => Err(()),
    }
}

/// Format an egui Color32 to a hex string (#RRGGBB, or #AARRGGBB when the
/// color carries transparency)
pub fn format_hex_color(color: Color32) -> String {
    if color.a() == 255 {
        format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
    } else {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            color.a(),
            color.r(),
            color.g(),
            color.b()
        )
    }
}

/// Parse a stored color, falling back when the string is not valid hex
pub fn color_or(hex: &str, fallback: Color32) -> Color32 {
    parse_hex_color(hex).unwrap_or_else(|()| {
        error!(color = %hex, "Invalid color in settings, using default");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        assert_eq!(
            parse_hex_color("#4F8CFF"),
            Ok(Color32::from_rgba_unmultiplied(0x4F, 0x8C, 0xFF, 255))
        );
        assert_eq!(
            parse_hex_color("000000"),
            Ok(Color32::from_rgba_unmultiplied(0, 0, 0, 255))
        );
    }

    #[test]
    fn test_parse_eight_digit() {
        assert_eq!(
            parse_hex_color("#80FF0000"),
            Ok(Color32::from_rgba_unmultiplied(0xFF, 0, 0, 0x80))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_hex_color("black"), Err(()));
        assert_eq!(parse_hex_color(""), Err(()));
        assert_eq!(parse_hex_color("#12345"), Err(()));
        assert_eq!(parse_hex_color("#GGGGGG"), Err(()));
    }

    #[test]
    fn test_format_round_trip() {
        for hex in ["#000000", "#FFFFFF", "#4F8CFF"] {
            let color = parse_hex_color(hex).unwrap();
            assert_eq!(format_hex_color(color), hex);
        }

        let translucent = Color32::from_rgba_unmultiplied(0x10, 0x20, 0x30, 0x40);
        assert_eq!(
            parse_hex_color(&format_hex_color(translucent)),
            Ok(translucent)
        );
    }

    #[test]
    fn test_color_or_falls_back() {
        assert_eq!(color_or("not-a-color", Color32::WHITE), Color32::WHITE);
        assert_eq!(
            color_or("#FF0000", Color32::WHITE),
            Color32::from_rgba_unmultiplied(255, 0, 0, 255)
        );
    }
}
