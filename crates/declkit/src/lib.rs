#![forbid(unsafe_code)]

//! declkit public facade.
//!
//! Re-exports the binding engine, value types and view variants under one
//! crate. Most applications only need the [`prelude`].
//!
//! ```
//! use declkit::prelude::*;
//!
//! let offset = ObservableCell::new(Point::ZERO);
//! let tint = ObservableCell::new(Some(Color::BLUE));
//!
//! let mut grid = CollectionView::new()
//!     .bind_background(&tint.binding())
//!     .scroll_position(&offset.binding())
//!     .hide_all_indicators();
//!
//! grid.scroll_to(Point::new(0.0, 64.0));
//! assert_eq!(offset.read(), Point::new(0.0, 64.0));
//!
//! tint.write(None);
//! assert_eq!(grid.native().background(), None);
//! ```

pub use declkit_core as core;
pub use declkit_runtime as runtime;
pub use declkit_style as style;
pub use declkit_widgets as widgets;

pub use declkit_runtime::{bind, bind_map};

pub mod prelude {
    pub use declkit_core::{Axis, EdgeInsets, LayoutDirection, Point, Rect, Size};
    pub use declkit_runtime::{
        BindOutcome, Binding, EventSource, ObservableCell, PropertyRegistry, StateField,
        Subscription, SubscriptionToken, TwoWayBinding,
    };
    pub use declkit_style::{Color, Font, FontIdentifier, FontWeight};
    pub use declkit_widgets::{
        Button, CollectionView, ContentInsetAdjustment, ContentMode, ControlState, Declarative,
        FlowLayout, ViewDefaults,
    };
}
