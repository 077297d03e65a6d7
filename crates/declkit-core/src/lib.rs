#![forbid(unsafe_code)]

//! Geometry value types shared by the declkit crates.
//!
//! Everything here is plain `Copy` data measured in points. Nothing in this
//! crate computes layout; the hosting toolkit owns that and reports results
//! through these types.

pub mod geometry;

pub use geometry::{Axis, EdgeInsets, LayoutDirection, Point, Rect, Size};
