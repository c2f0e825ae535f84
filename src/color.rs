//! Hex color strings to normalized RGB for shader consumption.

/// Converts `#RRGGBB` into `[r, g, b]` in `[0, 1]`.
///
/// Each channel is read from its fixed two-character slot after the leading
/// character. A slot that is missing or not valid hex yields `NaN` for that
/// channel; no clamping or validation happens here, so malformed input ends
/// up as undefined (but harmless) shader output.
pub fn hex_to_rgb(hex: &str) -> [f32; 3] {
    [channel(hex, 1), channel(hex, 3), channel(hex, 5)]
}

fn channel(hex: &str, start: usize) -> f32 {
    hex.get(start..start + 2)
        .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        .map(|value| value as f32 / 255.0)
        .unwrap_or(f32::NAN)
}

/// True when `hex` is a `#` followed by exactly six hex digits.
pub fn is_well_formed(hex: &str) -> bool {
    hex.len() == 7
        && hex.starts_with('#')
        && hex[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn white_and_black() {
        assert_eq!(hex_to_rgb("#FFFFFF"), [1.0, 1.0, 1.0]);
        assert_eq!(hex_to_rgb("#000000"), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn lavender_default() {
        let rgb = hex_to_rgb("#DCD7F4");
        assert!(approx(rgb, [220.0 / 255.0, 215.0 / 255.0, 244.0 / 255.0]), "{:?}", rgb);
    }

    #[test]
    fn lowercase_digits_parse() {
        assert!(approx(hex_to_rgb("#dcd7f4"), hex_to_rgb("#DCD7F4")));
    }

    #[test]
    fn truncated_input_yields_nan_channels() {
        let rgb = hex_to_rgb("#DCD");
        assert!((rgb[0] - 220.0 / 255.0).abs() < 1e-6);
        assert!(rgb[1].is_nan());
        assert!(rgb[2].is_nan());
    }

    #[test]
    fn garbage_digits_yield_nan() {
        assert!(hex_to_rgb("#ZZ0000")[0].is_nan());
        // A slot is read whole; a valid leading digit is not enough.
        assert_eq!(hex_to_rgb("#1G0000")[1..], [0.0, 0.0]);
        assert!(hex_to_rgb("#1G0000")[0].is_nan());
        assert!(hex_to_rgb("").iter().all(|c| c.is_nan()));
    }

    #[test]
    fn well_formed_check() {
        assert!(is_well_formed("#DCD7F4"));
        assert!(!is_well_formed("DCD7F4"));
        assert!(!is_well_formed("#DCD7F"));
        assert!(!is_well_formed("#DCD7FG"));
    }
}
