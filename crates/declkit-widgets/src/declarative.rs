#![forbid(unsafe_code)]

//! The declarative capability shared by every view variant.
//!
//! A variant implements the required hooks of [`Declarative`] and gets the
//! common builder methods for free. Every builder method takes the view by
//! value, performs exactly one native mutation or registers exactly one
//! binding, and hands the same concrete view back:
//!
//! ```
//! use declkit_runtime::ObservableCell;
//! use declkit_style::Color;
//! use declkit_widgets::{Button, Declarative};
//!
//! let visible = ObservableCell::new(true);
//! let button: Button = Button::new("Save")
//!     .background(Color::BLUE)
//!     .corner_radius(8.0)
//!     .bind_hidden(&visible.binding().map(|v| !v));
//!
//! assert!(!button.native().read(|p| p.hidden));
//! visible.write(false);
//! assert!(button.native().read(|p| p.hidden));
//! ```
//!
//! Properties that can be bound go through the view's [`PropertyRegistry`];
//! the plain-value form binds a constant, so a later plain value replaces an
//! earlier binding instead of racing it.

use std::cell::{Cell, RefCell};
use std::fmt;

use declkit_core::{LayoutDirection, Rect};
use declkit_runtime::{Binding, PropertyKey, PropertyRegistry, StateField};
use declkit_style::Color;

use crate::native::NativeView;

/// Property names registered by the shared builder methods.
pub mod keys {
    use declkit_runtime::PropertyKey;

    pub const BACKGROUND: PropertyKey = "background";
    pub const ALPHA: PropertyKey = "alpha";
    pub const HIDDEN: PropertyKey = "hidden";
}

type Deferred = Box<dyn FnOnce(&NativeView)>;

/// Attach and layout bookkeeping for one view.
#[derive(Default)]
pub struct Lifecycle {
    attached: Cell<bool>,
    layout_passes: Cell<u64>,
    deferred: RefCell<Vec<Deferred>>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    #[must_use]
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes.get()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.deferred.borrow().len()
    }

    /// Run `apply` once the view has a parent; immediately if it already has.
    pub fn defer_until_attached(
        &self,
        native: &NativeView,
        apply: impl FnOnce(&NativeView) + 'static,
    ) {
        if self.attached.get() {
            apply(native);
        } else {
            self.deferred.borrow_mut().push(Box::new(apply));
        }
    }

    /// Mark the view attached and drain deferred applications in the order
    /// they were queued. Returns `false` (and does nothing) on repeat calls.
    pub fn mark_attached(&self, native: &NativeView) -> bool {
        if self.attached.replace(true) {
            #[cfg(feature = "tracing")]
            tracing::debug!("attach to parent repeated; ignored");
            return false;
        }
        let queued = std::mem::take(&mut *self.deferred.borrow_mut());
        for apply in queued {
            apply(native);
        }
        true
    }

    /// Count a layout pass and return the new total.
    pub fn record_layout_pass(&self) -> u64 {
        let passes = self.layout_passes.get() + 1;
        self.layout_passes.set(passes);
        passes
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("attached", &self.is_attached())
            .field("layout_passes", &self.layout_passes())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Computed geometry, readable directly or observable through bindings.
///
/// `leading`/`trailing` follow the layout direction: in right-to-left
/// layouts leading is the right edge.
#[derive(Debug, Default)]
pub struct GeometryStates {
    pub width: StateField<f64>,
    pub height: StateField<f64>,
    pub top: StateField<f64>,
    pub leading: StateField<f64>,
    pub left: StateField<f64>,
    pub trailing: StateField<f64>,
    pub right: StateField<f64>,
    pub bottom: StateField<f64>,
    pub center_x: StateField<f64>,
    pub center_y: StateField<f64>,
}

impl GeometryStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `frame` into the fields. Only fields whose value changed
    /// notify. Returns how many changed.
    pub fn refresh(&mut self, frame: Rect, direction: LayoutDirection) -> usize {
        let (leading, trailing) = if direction.is_rtl() {
            (frame.max_x(), frame.min_x())
        } else {
            (frame.min_x(), frame.max_x())
        };
        [
            self.width.set_if_changed(frame.width()),
            self.height.set_if_changed(frame.height()),
            self.top.set_if_changed(frame.min_y()),
            self.leading.set_if_changed(leading),
            self.left.set_if_changed(frame.min_x()),
            self.trailing.set_if_changed(trailing),
            self.right.set_if_changed(frame.max_x()),
            self.bottom.set_if_changed(frame.max_y()),
            self.center_x.set_if_changed(frame.mid_x()),
            self.center_y.set_if_changed(frame.mid_y()),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }
}

/// Capability every declarative view variant implements.
///
/// The required methods are the hooks the hosting toolkit and the builder
/// layer need; a type missing any of them does not compile.
pub trait Declarative: Sized {
    /// The concrete view builder calls chain on.
    fn declarative_view(&self) -> &Self;

    fn properties(&self) -> &PropertyRegistry;

    fn native(&self) -> &NativeView;

    fn lifecycle(&self) -> &Lifecycle;

    /// Called by the toolkit after it lays the view out. Write computed
    /// geometry back into observable state here.
    fn on_layout_pass(&mut self);

    /// Called by the toolkit once the view is inserted into a parent.
    fn on_attach_to_parent(&mut self);

    /// Drive property `name` from `binding`.
    #[must_use]
    fn bind<T: Clone + 'static>(
        self,
        name: PropertyKey,
        binding: &Binding<T>,
        apply: impl Fn(&T) + 'static,
    ) -> Self {
        self.properties().bind(name, binding, apply);
        self
    }

    #[must_use]
    fn bind_background(self, color: &Binding<Option<Color>>) -> Self {
        let native = self.native().downgrade();
        self.bind(keys::BACKGROUND, color, move |c: &Option<Color>| {
            native.write(|p| p.background = *c);
        })
    }

    #[must_use]
    fn background(self, color: impl Into<Color>) -> Self {
        self.bind_background(&Binding::constant(Some(color.into())))
    }

    /// Opaque background from `0xRRGGBB`.
    #[must_use]
    fn background_hex(self, hex: u32) -> Self {
        self.background(Color::from_hex(hex))
    }

    #[must_use]
    fn bind_alpha(self, alpha: &Binding<f64>) -> Self {
        let native = self.native().downgrade();
        self.bind(keys::ALPHA, alpha, move |a: &f64| {
            native.write(|p| p.alpha = a.clamp(0.0, 1.0));
        })
    }

    #[must_use]
    fn alpha(self, alpha: f64) -> Self {
        self.bind_alpha(&Binding::constant(alpha))
    }

    #[must_use]
    fn bind_hidden(self, hidden: &Binding<bool>) -> Self {
        let native = self.native().downgrade();
        self.bind(keys::HIDDEN, hidden, move |h: &bool| {
            native.write(|p| p.hidden = *h);
        })
    }

    #[must_use]
    fn hidden(self, hidden: bool) -> Self {
        self.bind_hidden(&Binding::constant(hidden))
    }

    #[must_use]
    fn corner_radius(self, radius: f64) -> Self {
        self.native().write(|p| p.corner_radius = radius);
        self
    }

    #[must_use]
    fn tag(self, tag: i64) -> Self {
        self.native().write(|p| p.tag = tag);
        self
    }

    #[must_use]
    fn direction(self, direction: LayoutDirection) -> Self {
        self.native().write(|p| p.direction = direction);
        self
    }

    /// Width as a percentage of the parent's width. Applied once the view
    /// is attached, since there is no parent to measure before that.
    #[must_use]
    fn width_percent(self, percent: f64) -> Self {
        self.lifecycle().defer_until_attached(self.native(), move |native| {
            if let Some(bounds) = native.superview_bounds() {
                native.write(|p| p.frame.size.width = bounds.width * percent / 100.0);
            }
        });
        self
    }

    /// Height as a percentage of the parent's height. See
    /// [`width_percent`](Self::width_percent).
    #[must_use]
    fn height_percent(self, percent: f64) -> Self {
        self.lifecycle().defer_until_attached(self.native(), move |native| {
            if let Some(bounds) = native.superview_bounds() {
                native.write(|p| p.frame.size.height = bounds.height * percent / 100.0);
            }
        });
        self
    }
}
