//! Colour conversion for the subtitle renderer.

/// Token used when the input is not a valid `#RRGGBB` colour.
pub const FALLBACK_COLOR: &str = "&H00FFFFFF";

/// Convert `#RRGGBB` to the renderer's `&HAABBGGRR` token.
///
/// The alpha byte is always `00` (opaque). Malformed input yields white.
pub fn hex_to_native_color(hex: &str) -> String {
    parse_rgb(hex)
        .map(|(r, g, b)| format!("&H00{b:02X}{g:02X}{r:02X}"))
        .unwrap_or_else(|| FALLBACK_COLOR.to_string())
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_is_byte_swapped() {
        assert_eq!(hex_to_native_color("#FF0000"), "&H000000FF");
        assert_eq!(hex_to_native_color("#0000FF"), "&H00FF0000");
    }

    #[test]
    fn test_mixed_case_and_missing_hash() {
        assert_eq!(hex_to_native_color("12ab9C"), "&H009CAB12");
    }

    #[test]
    fn test_malformed_falls_back_to_white() {
        for bad in ["", "#FFF", "#GG0000", "#FF00000", "#ÿÿÿ"] {
            assert_eq!(hex_to_native_color(bad), FALLBACK_COLOR, "{bad:?}");
        }
    }
}
