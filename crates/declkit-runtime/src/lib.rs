#![forbid(unsafe_code)]

//! State-binding engine for declkit.
//!
//! Application code owns [`ObservableCell`]s and hands [`Binding`]s to views.
//! A view keeps one [`PropertyRegistry`] that subscribes each bound property
//! and applies every new value to the native toolkit property. Properties
//! that the user can also drive (scroll offsets, toggles) go through a
//! [`TwoWayBinding`], which guards against feedback between the two
//! directions.
//!
//! Everything runs on a single thread. `write` is synchronous and returns
//! only after every subscriber has run.
//!
//! # Example
//!
//! ```
//! use declkit_runtime::{ObservableCell, PropertyRegistry};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let width = ObservableCell::new(0.0_f64);
//! let native_width = Rc::new(Cell::new(-1.0));
//!
//! let registry = PropertyRegistry::new();
//! let sink = Rc::clone(&native_width);
//! registry.bind("width", &width.binding(), move |w: &f64| sink.set(*w));
//! assert_eq!(native_width.get(), 0.0);
//!
//! width.write(42.0);
//! assert_eq!(native_width.get(), 42.0);
//! assert_eq!(registry.current_value::<f64>("width"), Some(42.0));
//! ```

pub mod reactive;

pub use reactive::{
    BindOutcome, Binding, CellId, EventSource, ObservableCell, PropagationState,
    PropertyKey, PropertyRegistry, StateField, Subscription, SubscriptionToken, TwoWayBinding,
};
