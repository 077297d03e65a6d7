//! Property tests for packed color construction.

use declkit_style::Color;
use proptest::prelude::*;

proptest! {
    #[test]
    fn from_hex_ignores_high_byte(hex in any::<u32>()) {
        let color = Color::from_hex(hex);
        prop_assert_eq!(color, Color::from_hex(hex & 0x00FF_FFFF));
        prop_assert_eq!(color.a(), 255);
        prop_assert_eq!(color.alpha(), 1.0);
    }

    #[test]
    fn channels_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
        let color = Color::rgba(r, g, b, a);
        prop_assert_eq!((color.r(), color.g(), color.b(), color.a()), (r, g, b, a));
        prop_assert_eq!(Color::from_hex_rgba(color.0), color);
        prop_assert_eq!(color.with_alpha(255), Color::rgb(r, g, b));
    }

    #[test]
    fn grays_are_dark_below_midpoint(level in any::<u8>()) {
        let gray = Color::rgb(level, level, level);
        prop_assert_eq!(gray.luma(), level);
        prop_assert_eq!(gray.is_dark(), level < 128);
    }
}
