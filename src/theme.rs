//! Readable text color for a themed background.
//!
//! Uses WCAG 2.x relative luminance and contrast ratio to pick black or
//! white text for an arbitrary brand color.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// White.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        let invalid = || Error::InvalidColor(hex.to_string());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Foreground color choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    /// Black text
    Black,
    /// White text
    White,
}

impl TextColor {
    /// The color as `#rrggbb`.
    pub fn hex(&self) -> &'static str {
        match self {
            TextColor::Black => "#000000",
            TextColor::White => "#ffffff",
        }
    }

    /// The color as RGB.
    pub fn rgb(&self) -> Rgb {
        match self {
            TextColor::Black => Rgb::BLACK,
            TextColor::White => Rgb::WHITE,
        }
    }
}

/// Relative luminance in `[0, 1]`.
pub fn relative_luminance(color: Rgb) -> f64 {
    fn linear(channel: u8) -> f64 {
        let c = f64::from(channel) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(color.r) + 0.7152 * linear(color.g) + 0.0722 * linear(color.b)
}

/// Contrast ratio between two colors, from 1 to 21.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Pick black or white text for a background hex color.
///
/// # Example
///
/// ```
/// use helpdoc::theme::{text_color_for, TextColor};
///
/// assert_eq!(text_color_for("#1e3a8a").unwrap(), TextColor::White);
/// assert_eq!(text_color_for("fde68a").unwrap(), TextColor::Black);
/// ```
pub fn text_color_for(background: &str) -> Result<TextColor> {
    let background = Rgb::from_hex(background)?;
    let on_black = contrast_ratio(background, Rgb::BLACK);
    let on_white = contrast_ratio(background, Rgb::WHITE);
    Ok(if on_black >= on_white {
        TextColor::Black
    } else {
        TextColor::White
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#ff8800").unwrap(), Rgb::new(255, 136, 0));
        assert_eq!(Rgb::from_hex("f80").unwrap(), Rgb::new(255, 136, 0));
        assert!(Rgb::from_hex("#ff88").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#ñ12").is_err());
    }

    #[test]
    fn test_luminance_bounds() {
        assert_eq!(relative_luminance(Rgb::BLACK), 0.0);
        assert!((relative_luminance(Rgb::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_ratio() {
        assert!((contrast_ratio(Rgb::BLACK, Rgb::WHITE) - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(Rgb::WHITE, Rgb::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_color_for() {
        assert_eq!(text_color_for("#000000").unwrap(), TextColor::White);
        assert_eq!(text_color_for("#ffffff").unwrap(), TextColor::Black);
        assert_eq!(text_color_for("#ffff00").unwrap(), TextColor::Black);
        assert_eq!(text_color_for("#0000ff").unwrap(), TextColor::White);
        assert_eq!(TextColor::White.hex(), "#ffffff");
    }
}
