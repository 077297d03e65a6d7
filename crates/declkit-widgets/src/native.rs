#![forbid(unsafe_code)]

//! Modelled native toolkit surface.
//!
//! Views drive native objects they do not own the behaviour of: the hosting
//! toolkit renders them, lays them out and reports user interaction. This
//! module models exactly the part of that surface the declarative layer
//! touches. Each native object is a shared handle ([`Native<P>`]) over a plain
//! property struct, so apply closures can hold a [`WeakNative`] back to the
//! object they mutate.
//!
//! Only [`NativeScrollView`] has behaviour of its own: changing its content
//! offset fires `did_scroll` synchronously, the way real scroll views notify
//! their delegate from inside the setter.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use declkit_core::{EdgeInsets, LayoutDirection, Point, Rect, Size};
use declkit_runtime::EventSource;
use declkit_style::{Color, Font};

/// Shared handle to a native object's properties.
pub struct Native<P> {
    props: Rc<RefCell<P>>,
}

impl<P> Clone for Native<P> {
    fn clone(&self) -> Self {
        Self {
            props: Rc::clone(&self.props),
        }
    }
}

impl<P: Default> Default for Native<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P> Native<P> {
    #[must_use]
    pub fn new(props: P) -> Self {
        Self {
            props: Rc::new(RefCell::new(props)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.props.borrow())
    }

    pub fn write(&self, f: impl FnOnce(&mut P)) {
        f(&mut self.props.borrow_mut());
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakNative<P> {
        WeakNative {
            props: Rc::downgrade(&self.props),
        }
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.props, &other.props)
    }
}

impl<P: Clone> Native<P> {
    /// Copy of every property.
    #[must_use]
    pub fn snapshot(&self) -> P {
        self.props.borrow().clone()
    }
}

impl<P: fmt::Debug> fmt::Debug for Native<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.props.borrow().fmt(f)
    }
}

/// Non-owning handle held by apply closures.
pub struct WeakNative<P> {
    props: Weak<RefCell<P>>,
}

impl<P> Clone for WeakNative<P> {
    fn clone(&self) -> Self {
        Self {
            props: Weak::clone(&self.props),
        }
    }
}

impl<P> WeakNative<P> {
    /// Mutate the object if it is still alive. Returns whether it was.
    pub fn write(&self, f: impl FnOnce(&mut P)) -> bool {
        match self.props.upgrade() {
            Some(props) => {
                f(&mut props.borrow_mut());
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn upgrade(&self) -> Option<Native<P>> {
        self.props.upgrade().map(|props| Native { props })
    }
}

// ---------------------------------------------------------------------------
// Base view
// ---------------------------------------------------------------------------

/// Properties every native view has.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProps {
    pub frame: Rect,
    pub background: Option<Color>,
    pub alpha: f64,
    pub hidden: bool,
    pub corner_radius: f64,
    pub tag: i64,
    pub direction: LayoutDirection,
    /// Bounds of the parent view; `None` until attached.
    pub superview_bounds: Option<Size>,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            background: None,
            alpha: 1.0,
            hidden: false,
            corner_radius: 0.0,
            tag: 0,
            direction: LayoutDirection::LeftToRight,
            superview_bounds: None,
        }
    }
}

pub type NativeView = Native<ViewProps>;

impl Native<ViewProps> {
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.read(|p| p.frame)
    }

    pub fn set_frame(&self, frame: Rect) {
        self.write(|p| p.frame = frame);
    }

    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.read(|p| p.background)
    }

    pub fn set_background(&self, color: Option<Color>) {
        self.write(|p| p.background = color);
    }

    #[must_use]
    pub fn direction(&self) -> LayoutDirection {
        self.read(|p| p.direction)
    }

    #[must_use]
    pub fn superview_bounds(&self) -> Option<Size> {
        self.read(|p| p.superview_bounds)
    }

    /// Toolkit side of inserting the view into a parent.
    pub fn move_to_superview(&self, bounds: Size) {
        self.write(|p| p.superview_bounds = Some(bounds));
    }

    pub fn remove_from_superview(&self) {
        self.write(|p| p.superview_bounds = None);
    }
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// Interaction state a button property is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlState {
    #[default]
    Normal,
    Highlighted,
    Disabled,
    Selected,
}

/// How image content is fitted into its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    #[default]
    ScaleToFill,
    ScaleAspectFit,
    ScaleAspectFill,
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

/// Named image resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    name: String,
}

impl Image {
    /// Look up an image by name. Empty names resolve to nothing.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonProps {
    pub titles: AHashMap<ControlState, String>,
    pub title_colors: AHashMap<ControlState, Color>,
    pub images: AHashMap<ControlState, Image>,
    pub title_font: Option<Font>,
    pub content_mode: ContentMode,
    pub title_insets: EdgeInsets,
    pub image_insets: EdgeInsets,
    pub highlighted: bool,
}

pub type NativeButton = Native<ButtonProps>;

impl Native<ButtonProps> {
    #[must_use]
    pub fn title(&self, state: ControlState) -> Option<String> {
        self.read(|p| p.titles.get(&state).cloned())
    }

    #[must_use]
    pub fn title_color(&self, state: ControlState) -> Option<Color> {
        self.read(|p| p.title_colors.get(&state).copied())
    }

    #[must_use]
    pub fn image(&self, state: ControlState) -> Option<Image> {
        self.read(|p| p.images.get(&state).cloned())
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.read(|p| p.highlighted)
    }
}

// ---------------------------------------------------------------------------
// Scroll view
// ---------------------------------------------------------------------------

/// How the toolkit adjusts content insets for safe areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentInsetAdjustment {
    #[default]
    Automatic,
    ScrollableAxes,
    Never,
    Always,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollProps {
    pub content_offset: Point,
    /// Whether the last offset change was requested as animated.
    pub last_offset_animated: bool,
    pub content_inset: EdgeInsets,
    pub scroll_indicator_insets: EdgeInsets,
    pub paging: bool,
    pub scroll_enabled: bool,
    pub shows_horizontal_indicator: bool,
    pub shows_vertical_indicator: bool,
    pub inset_adjustment: ContentInsetAdjustment,
}

impl Default for ScrollProps {
    fn default() -> Self {
        Self {
            content_offset: Point::ZERO,
            last_offset_animated: false,
            content_inset: EdgeInsets::ZERO,
            scroll_indicator_insets: EdgeInsets::ZERO,
            paging: false,
            scroll_enabled: true,
            shows_horizontal_indicator: true,
            shows_vertical_indicator: true,
            inset_adjustment: ContentInsetAdjustment::Automatic,
        }
    }
}

/// Scroll view with a synchronous scroll notification.
#[derive(Clone, Default)]
pub struct NativeScrollView {
    props: Native<ScrollProps>,
    did_scroll: EventSource,
}

impl NativeScrollView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn props(&self) -> &Native<ScrollProps> {
        &self.props
    }

    #[must_use]
    pub fn did_scroll(&self) -> &EventSource {
        &self.did_scroll
    }

    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.props.read(|p| p.content_offset)
    }

    /// Store the offset, then fire `did_scroll` before returning.
    pub fn set_content_offset(&self, offset: Point, animated: bool) {
        self.props.write(|p| {
            p.content_offset = offset;
            p.last_offset_animated = animated;
        });
        self.did_scroll.emit();
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakScrollView {
        WeakScrollView {
            props: self.props.downgrade(),
            did_scroll: self.did_scroll.clone(),
        }
    }
}

impl fmt::Debug for NativeScrollView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeScrollView")
            .field("props", &self.props)
            .field("did_scroll", &self.did_scroll)
            .finish()
    }
}

/// Non-owning scroll view handle for two-way apply/read closures.
#[derive(Clone)]
pub struct WeakScrollView {
    props: WeakNative<ScrollProps>,
    did_scroll: EventSource,
}

impl WeakScrollView {
    /// [`NativeScrollView::set_content_offset`] if the view is alive.
    pub fn set_content_offset(&self, offset: Point, animated: bool) {
        let alive = self.props.write(|p| {
            p.content_offset = offset;
            p.last_offset_animated = animated;
        });
        if alive {
            self.did_scroll.emit();
        }
    }

    /// Current offset, or the origin once the view is gone.
    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.props
            .upgrade()
            .map_or(Point::ZERO, |props| props.read(|p| p.content_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn view_defaults_are_visible_and_opaque() {
        let view = NativeView::default();
        let props = view.snapshot();
        assert_eq!(props.alpha, 1.0);
        assert!(!props.hidden);
        assert_eq!(props.background, None);
        assert_eq!(view.superview_bounds(), None);
    }

    #[test]
    fn clones_share_properties() {
        let view = NativeView::default();
        let other = view.clone();
        other.set_background(Some(Color::RED));
        assert_eq!(view.background(), Some(Color::RED));
        assert!(view.ptr_eq(&other));
    }

    #[test]
    fn weak_write_after_drop_is_ignored() {
        let view = NativeView::default();
        let weak = view.downgrade();
        assert!(weak.write(|p| p.tag = 3));
        assert_eq!(view.read(|p| p.tag), 3);
        drop(view);
        assert!(!weak.write(|p| p.tag = 4));
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn superview_attach_and_detach() {
        let view = NativeView::default();
        view.move_to_superview(Size::new(320.0, 480.0));
        assert_eq!(view.superview_bounds(), Some(Size::new(320.0, 480.0)));
        view.remove_from_superview();
        assert_eq!(view.superview_bounds(), None);
    }

    #[test]
    fn button_state_tables() {
        let button = NativeButton::default();
        button.write(|p| {
            p.titles.insert(ControlState::Normal, "Go".into());
            p.titles.insert(ControlState::Highlighted, "Going".into());
        });
        assert_eq!(button.title(ControlState::Normal).as_deref(), Some("Go"));
        assert_eq!(
            button.title(ControlState::Highlighted).as_deref(),
            Some("Going")
        );
        assert_eq!(button.title(ControlState::Disabled), None);
    }

    #[test]
    fn image_lookup_rejects_empty_name() {
        assert!(Image::named("").is_none());
        assert_eq!(Image::named("star").map(|i| i.name().to_owned()), Some("star".into()));
    }

    #[test]
    fn offset_change_fires_did_scroll_synchronously() {
        let scroll = NativeScrollView::new();
        let seen = Rc::new(Cell::new(Point::ZERO));
        let s = Rc::clone(&seen);
        let reader = scroll.clone();
        scroll
            .did_scroll()
            .connect(move || s.set(reader.content_offset()));

        scroll.set_content_offset(Point::new(0.0, 40.0), true);
        assert_eq!(seen.get(), Point::new(0.0, 40.0));
        assert!(scroll.props().read(|p| p.last_offset_animated));
        assert_eq!(scroll.did_scroll().emitted(), 1);
    }

    #[test]
    fn weak_scroll_view_goes_quiet_after_drop() {
        let scroll = NativeScrollView::new();
        let weak = scroll.downgrade();
        weak.set_content_offset(Point::new(1.0, 2.0), false);
        assert_eq!(scroll.content_offset(), Point::new(1.0, 2.0));

        let events = scroll.did_scroll().clone();
        drop(scroll);
        weak.set_content_offset(Point::new(9.0, 9.0), false);
        assert_eq!(events.emitted(), 1);
        assert_eq!(weak.content_offset(), Point::ZERO);
    }
}
