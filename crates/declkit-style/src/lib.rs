#![forbid(unsafe_code)]

//! Style value types for declkit.
//!
//! This crate provides:
//! - [`Color`], a packed RGBA value with hex-number conversion
//! - [`Font`] and [`FontIdentifier`] for named font lookup
//!
//! These are pure lookups. They never touch the binding engine.

pub mod color;
pub mod font;

pub use color::Color;
pub use font::{Font, FontIdentifier, FontWeight};
