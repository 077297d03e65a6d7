#![forbid(unsafe_code)]

//! Declarative view variants for declkit.
//!
//! Views are built with chained builder calls through the [`Declarative`]
//! capability and driven by [`declkit_runtime`] bindings. The native toolkit
//! the views configure is modelled in [`native`].

pub mod button;
pub mod collection_view;
pub mod config;
pub mod declarative;
pub mod native;

pub use button::Button;
pub use collection_view::{CollectionView, FlowLayout};
pub use config::{ButtonDefaults, ConfigError, FlowLayoutConfig, ViewDefaults};
pub use declarative::{Declarative, GeometryStates, Lifecycle};
pub use native::{
    ContentInsetAdjustment, ContentMode, ControlState, Image, Native, NativeButton,
    NativeScrollView, NativeView, WeakNative,
};
