#![forbid(unsafe_code)]

//! Collection view variant.
//!
//! A scrolling grid described by a [`FlowLayout`]. Its scroll position can be
//! bound two-way: state drives the content offset, and user scrolling writes
//! the offset back into the same cell without echoing.
//!
//! ```
//! use declkit_core::Point;
//! use declkit_runtime::ObservableCell;
//! use declkit_widgets::CollectionView;
//!
//! let position = ObservableCell::new(Point::ZERO);
//! let mut grid = CollectionView::new().scroll_position(&position.binding());
//!
//! grid.scroll_to(Point::new(0.0, 120.0));
//! assert_eq!(position.read(), Point::new(0.0, 120.0));
//!
//! position.write(Point::new(0.0, 40.0));
//! assert_eq!(grid.scroll_view().content_offset(), Point::new(0.0, 40.0));
//! ```

use std::cell::OnceCell;
use std::fmt;

use declkit_core::{Axis, EdgeInsets, Point, Size};
use declkit_runtime::{Binding, PropertyRegistry, TwoWayBinding};

use crate::config::{FlowLayoutConfig, ViewDefaults};
use crate::declarative::{Declarative, GeometryStates, Lifecycle};
use crate::native::{ContentInsetAdjustment, NativeScrollView, NativeView};

/// Item size, spacing and scroll direction of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLayout {
    pub item_size: Size,
    pub minimum_interitem_spacing: f64,
    pub minimum_line_spacing: f64,
    pub scroll_axis: Axis,
}

impl FlowLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&FlowLayoutConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &FlowLayoutConfig) -> Self {
        Self {
            item_size: Size::square(config.item_size),
            minimum_interitem_spacing: config.minimum_interitem_spacing,
            minimum_line_spacing: config.minimum_line_spacing,
            scroll_axis: config.scroll_axis,
        }
    }

    #[must_use]
    pub fn item_size(mut self, size: impl Into<Size>) -> Self {
        self.item_size = size.into();
        self
    }

    #[must_use]
    pub fn minimum_interitem_spacing(mut self, spacing: f64) -> Self {
        self.minimum_interitem_spacing = spacing;
        self
    }

    #[must_use]
    pub fn minimum_line_spacing(mut self, spacing: f64) -> Self {
        self.minimum_line_spacing = spacing;
        self
    }

    #[must_use]
    pub fn scroll_axis(mut self, axis: Axis) -> Self {
        self.scroll_axis = axis;
        self
    }
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CollectionView {
    view: NativeView,
    scroll: NativeScrollView,
    layout: FlowLayout,
    properties: OnceCell<PropertyRegistry>,
    lifecycle: Lifecycle,
    geometry: GeometryStates,
    scroll_position: Option<TwoWayBinding<Point>>,
}

impl CollectionView {
    /// Collection view with the default flow layout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(&ViewDefaults::default())
    }

    #[must_use]
    pub fn with_defaults(defaults: &ViewDefaults) -> Self {
        Self::with_layout(FlowLayout::from_config(&defaults.flow_layout))
    }

    #[must_use]
    pub fn with_layout(layout: FlowLayout) -> Self {
        Self {
            view: NativeView::default(),
            scroll: NativeScrollView::new(),
            layout,
            properties: OnceCell::new(),
            lifecycle: Lifecycle::new(),
            geometry: GeometryStates::new(),
            scroll_position: None,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    #[must_use]
    pub fn scroll_view(&self) -> &NativeScrollView {
        &self.scroll
    }

    #[must_use]
    pub fn geometry(&self) -> &GeometryStates {
        &self.geometry
    }

    /// Two-way binding driving the content offset, if one is attached.
    #[must_use]
    pub fn scroll_position_binding(&self) -> Option<&TwoWayBinding<Point>> {
        self.scroll_position.as_ref()
    }

    #[must_use]
    pub fn content_inset_adjustment(self, behavior: ContentInsetAdjustment) -> Self {
        self.scroll.props().write(|p| p.inset_adjustment = behavior);
        self
    }

    #[must_use]
    pub fn paging(self, enabled: bool) -> Self {
        self.scroll.props().write(|p| p.paging = enabled);
        self
    }

    #[must_use]
    pub fn scrolling(self, enabled: bool) -> Self {
        self.scroll.props().write(|p| p.scroll_enabled = enabled);
        self
    }

    /// Hide the scroll indicators along `axes`. Indicators not named keep
    /// their current visibility.
    #[must_use]
    pub fn hide_indicator(self, axes: &[Axis]) -> Self {
        self.scroll.props().write(|p| {
            for axis in axes {
                match axis {
                    Axis::Horizontal => p.shows_horizontal_indicator = false,
                    Axis::Vertical => p.shows_vertical_indicator = false,
                }
            }
        });
        self
    }

    #[must_use]
    pub fn hide_all_indicators(self) -> Self {
        self.hide_indicator(&[Axis::Horizontal, Axis::Vertical])
    }

    #[must_use]
    pub fn content_inset(self, insets: EdgeInsets) -> Self {
        self.scroll.props().write(|p| p.content_inset = insets);
        self
    }

    #[must_use]
    pub fn content_inset_sides(self, top: f64, left: f64, right: f64, bottom: f64) -> Self {
        self.content_inset(EdgeInsets::new(top, left, bottom, right))
    }

    #[must_use]
    pub fn scroll_indicator_insets(self, insets: EdgeInsets) -> Self {
        self.scroll.props().write(|p| p.scroll_indicator_insets = insets);
        self
    }

    /// Unlike [`content_inset_sides`](Self::content_inset_sides), sides run
    /// top, left, bottom, right.
    #[must_use]
    pub fn scroll_indicator_insets_sides(
        self,
        top: f64,
        left: f64,
        bottom: f64,
        right: f64,
    ) -> Self {
        self.scroll_indicator_insets(EdgeInsets::new(top, left, bottom, right))
    }

    /// Set the content offset. With a bound scroll position the new offset
    /// also lands in the bound cell, exactly as a user scroll would.
    #[must_use]
    pub fn content_offset(self, offset: Point, animated: bool) -> Self {
        self.scroll.set_content_offset(offset, animated);
        self
    }

    /// Bind the content offset two-way to `position`.
    ///
    /// The offset takes the cell's value immediately. Binding the same cell
    /// again keeps the existing connection; a different cell replaces it.
    #[must_use]
    pub fn scroll_position(mut self, position: &Binding<Point>) -> Self {
        if let Some(existing) = &self.scroll_position
            && existing.binding().same_cell(position)
        {
            return self;
        }
        self.scroll_position = None;

        let apply = self.scroll.downgrade();
        let read = self.scroll.downgrade();
        let two_way = TwoWayBinding::attach(
            position,
            move |offset: &Point| apply.set_content_offset(*offset, false),
            move || read.content_offset(),
            self.scroll.did_scroll(),
        );
        self.scroll_position = Some(two_way);
        self
    }

    /// Toolkit entry point for a user scroll.
    pub fn scroll_to(&mut self, offset: Point) {
        self.scroll.set_content_offset(offset, false);
    }

    /// Toolkit entry point for removing the view. Stops every binding; the
    /// scroll handler stays connected until the view is dropped and ignores
    /// anything the toolkit still reports.
    pub fn teardown(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("teardown", view = "CollectionView").entered();

        if let Some(two_way) = self.scroll_position.as_mut() {
            two_way.detach();
        }
        if let Some(properties) = self.properties.get() {
            properties.unbind_all();
        }
        self.view.remove_from_superview();
    }
}

impl Default for CollectionView {
    fn default() -> Self {
        Self::new()
    }
}

impl Declarative for CollectionView {
    fn declarative_view(&self) -> &Self {
        self
    }

    fn properties(&self) -> &PropertyRegistry {
        self.properties.get_or_init(PropertyRegistry::new)
    }

    fn native(&self) -> &NativeView {
        &self.view
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn on_layout_pass(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("layout_pass", view = "CollectionView").entered();

        self.lifecycle.record_layout_pass();
        self.geometry.refresh(self.view.frame(), self.view.direction());
    }

    fn on_attach_to_parent(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("attach_to_parent", view = "CollectionView").entered();

        self.lifecycle.mark_attached(&self.view);
    }
}

impl fmt::Debug for CollectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionView")
            .field("layout", &self.layout)
            .field("offset", &self.scroll.content_offset())
            .field("scroll_position", &self.scroll_position)
            .field("properties", &self.properties.get())
            .finish()
    }
}
