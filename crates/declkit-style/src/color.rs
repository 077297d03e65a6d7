#![forbid(unsafe_code)]

//! Packed RGBA colors and the hex-number convenience conversion.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An sRGB color with straight alpha, packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const CLEAR: Self = Self(0x0000_0000);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 59, 48);
    pub const GREEN: Self = Self::rgb(52, 199, 89);
    pub const BLUE: Self = Self::rgb(0, 122, 255);
    pub const GRAY: Self = Self::rgb(142, 142, 147);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    /// Opaque color from a `0xRRGGBB` number. Bits above 24 are ignored.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self(((hex & 0x00FF_FFFF) << 8) | 0xFF)
    }

    /// Color from a `0xRRGGBBAA` number.
    #[must_use]
    pub const fn from_hex_rgba(hex: u32) -> Self {
        Self(hex)
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0xFFFF_FF00) | a as u32)
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn alpha(self) -> f64 {
        f64::from(self.a()) / 255.0
    }

    /// Rec. 709 weighted luma in `0..=255`.
    #[must_use]
    pub fn luma(self) -> u8 {
        let luma =
            u32::from(self.r()) * 2126 + u32::from(self.g()) * 7152 + u32::from(self.b()) * 722;
        (luma / 10000) as u8
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self.luma() < 128
    }

    /// `#RRGGBBAA` string form.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        format!("#{:08X}", self.0)
    }
}

/// `0xRRGGBB` numbers convert to opaque colors.
impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_number_is_opaque() {
        let c = Color::from_hex(0x33_66_99);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x33, 0x66, 0x99, 0xFF));
    }

    #[test]
    fn hex_ignores_high_bits() {
        assert_eq!(Color::from_hex(0xFF_00_00_00), Color::BLACK);
    }

    #[test]
    fn from_u32_matches_from_hex() {
        assert_eq!(Color::from(0xABCDEF), Color::from_hex(0xABCDEF));
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let c = Color::rgb(1, 2, 3).with_alpha(4);
        assert_eq!(c, Color::rgba(1, 2, 3, 4));
    }

    #[test]
    fn luma_threshold() {
        assert!(Color::BLACK.is_dark());
        assert!(!Color::WHITE.is_dark());
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#FF0010FF");
    }

    #[test]
    fn clear_is_transparent() {
        assert_eq!(Color::CLEAR.alpha(), 0.0);
    }
}
