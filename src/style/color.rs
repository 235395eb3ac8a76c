//! Conversion between hex strings and normalized RGB triples.
//!
//! The conversion is lossy: channels are stored as `0..=1` floats and map back to the nearest
//! 8-bit value.

use serde::{Deserialize, Serialize};

/// Normalized color triple, each channel nominally in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a triple from normalized channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Parse exactly 3 or 6 hex digits (no leading `#`) into a normalized triple.
///
/// Returns `None` for anything else; callers treat that as "no color requested".
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f64::from(v) / 255.0);

    match hex.len() {
        3 => {
            let mut expanded = String::with_capacity(6);
            for c in hex.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            hex_to_rgb(&expanded)
        }
        6 => Some(Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}

/// Format a normalized triple as 6 lowercase hex digits.
///
/// Returns `None` when a channel falls outside `0..=255` after scaling (or is not finite).
pub fn rgb_to_hex(rgb: Rgb) -> Option<String> {
    fn to_byte(c: f64) -> Option<u8> {
        let v = (c * 255.0).round();
        if !v.is_finite() || !(0.0..=255.0).contains(&v) {
            return None;
        }
        Some(v as u8)
    }

    let r = to_byte(rgb.r)?;
    let g = to_byte(rgb.g)?;
    let b = to_byte(rgb.b)?;
    Some(format!("{r:02x}{g:02x}{b:02x}"))
}

/// Parse user input that may carry surrounding whitespace or a leading `#`.
pub fn parse_hex_input(input: &str) -> Option<Rgb> {
    let s = input.trim();
    hex_to_rgb(s.strip_prefix('#').unwrap_or(s))
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
