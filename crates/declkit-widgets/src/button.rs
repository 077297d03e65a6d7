#![forbid(unsafe_code)]

//! Button variant.
//!
//! Besides the shared builders, a button configures per-state titles, title
//! colors and images, a title font, insets, and an optional background shown
//! while it is highlighted.
//!
//! # Highlight background
//!
//! The first time the highlight changes, the current background is captured
//! as the "original" and restored whenever the button leaves the highlighted
//! state. The capture happens once: a background set after that point is
//! overwritten by the captured value on the next un-highlight.

use std::cell::OnceCell;
use std::fmt;

use declkit_core::EdgeInsets;
use declkit_runtime::{Binding, PropertyKey, PropertyRegistry};
use declkit_style::{Color, Font, FontIdentifier};

use crate::config::ViewDefaults;
use crate::declarative::{Declarative, GeometryStates, Lifecycle};
use crate::native::{ContentMode, ControlState, Image, NativeButton, NativeView};

/// Registry name of the normal-state title.
pub const TITLE: PropertyKey = "title";

pub struct Button {
    view: NativeView,
    control: NativeButton,
    properties: OnceCell<PropertyRegistry>,
    lifecycle: Lifecycle,
    geometry: GeometryStates,
    background_highlighted: Option<Color>,
    original_background: Option<Color>,
}

impl Button {
    /// Button with `title` for the normal state.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_defaults(title, &ViewDefaults::default())
    }

    /// Like [`new`](Self::new), taking unset options from `defaults`. An
    /// empty `title` falls back to the configured default title.
    #[must_use]
    pub fn with_defaults(title: impl Into<String>, defaults: &ViewDefaults) -> Self {
        let mut title = title.into();
        if title.is_empty() {
            title.clone_from(&defaults.button.title);
        }
        let button = Self {
            view: NativeView::default(),
            control: NativeButton::default(),
            properties: OnceCell::new(),
            lifecycle: Lifecycle::new(),
            geometry: GeometryStates::new(),
            background_highlighted: defaults.button.highlighted_background,
            original_background: None,
        };
        button.title(title, ControlState::Normal)
    }

    #[must_use]
    pub fn control(&self) -> &NativeButton {
        &self.control
    }

    #[must_use]
    pub fn geometry(&self) -> &GeometryStates {
        &self.geometry
    }

    /// Background captured on the first highlight change, if any.
    #[must_use]
    pub fn original_background(&self) -> Option<Color> {
        self.original_background
    }

    /// Title for `state`. The normal-state title goes through the registry,
    /// replacing any [`bind_title`](Self::bind_title) binding.
    #[must_use]
    pub fn title(self, title: impl Into<String>, state: ControlState) -> Self {
        let title = title.into();
        if state == ControlState::Normal {
            return self.bind_title(&Binding::constant(title));
        }
        self.control.write(|p| {
            p.titles.insert(state, title);
        });
        self
    }

    /// Drive the normal-state title from `title`.
    #[must_use]
    pub fn bind_title(self, title: &Binding<String>) -> Self {
        let control = self.control.downgrade();
        self.bind(TITLE, title, move |t: &String| {
            control.write(|p| {
                p.titles.insert(ControlState::Normal, t.clone());
            });
        })
    }

    #[must_use]
    pub fn color(self, color: impl Into<Color>, state: ControlState) -> Self {
        let color = color.into();
        self.control.write(|p| {
            p.title_colors.insert(state, color);
        });
        self
    }

    /// Title color from opaque `0xRRGGBB`.
    #[must_use]
    pub fn color_hex(self, hex: u32, state: ControlState) -> Self {
        self.color(Color::from_hex(hex), state)
    }

    /// Title font; `None` restores the toolkit default.
    #[must_use]
    pub fn font(self, font: Option<Font>) -> Self {
        self.control.write(|p| p.title_font = font);
        self
    }

    /// Title font by identifier. A lookup that finds nothing clears the font.
    #[must_use]
    pub fn font_named(self, identifier: impl Into<FontIdentifier>, size: f64) -> Self {
        let font = Font::named(&identifier.into(), size);
        self.font(font)
    }

    /// Image for `state`; `None` removes it.
    #[must_use]
    pub fn image(self, image: Option<Image>, state: ControlState) -> Self {
        self.control.write(|p| match image {
            Some(image) => {
                p.images.insert(state, image);
            }
            None => {
                p.images.remove(&state);
            }
        });
        self
    }

    #[must_use]
    pub fn image_named(self, name: &str, state: ControlState) -> Self {
        self.image(Image::named(name), state)
    }

    #[must_use]
    pub fn mode(self, mode: ContentMode) -> Self {
        self.control.write(|p| p.content_mode = mode);
        self
    }

    #[must_use]
    pub fn title_insets(self, insets: EdgeInsets) -> Self {
        self.control.write(|p| p.title_insets = insets);
        self
    }

    #[must_use]
    pub fn title_insets_sides(self, top: f64, left: f64, right: f64, bottom: f64) -> Self {
        self.title_insets(EdgeInsets::new(top, left, bottom, right))
    }

    #[must_use]
    pub fn image_insets(self, insets: EdgeInsets) -> Self {
        self.control.write(|p| p.image_insets = insets);
        self
    }

    #[must_use]
    pub fn image_insets_sides(self, top: f64, left: f64, right: f64, bottom: f64) -> Self {
        self.image_insets(EdgeInsets::new(top, left, bottom, right))
    }

    /// Background shown while the button is highlighted.
    #[must_use]
    pub fn background_highlighted(mut self, color: impl Into<Color>) -> Self {
        self.background_highlighted = Some(color.into());
        self
    }

    #[must_use]
    pub fn background_highlighted_hex(self, hex: u32) -> Self {
        self.background_highlighted(Color::from_hex(hex))
    }

    /// Toolkit entry point for touch-down / touch-up.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        let current = self.view.background();
        if self.original_background.is_none() {
            self.original_background = current;
        }
        self.control.write(|p| p.highlighted = highlighted);

        let background = if highlighted {
            self.background_highlighted.or(current)
        } else {
            self.original_background.or(current)
        };
        self.view.set_background(background);
    }
}

impl Declarative for Button {
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
        let _span = tracing::debug_span!("layout_pass", view = "Button").entered();

        self.lifecycle.record_layout_pass();
        self.geometry.refresh(self.view.frame(), self.view.direction());
    }

    fn on_attach_to_parent(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("attach_to_parent", view = "Button").entered();

        self.lifecycle.mark_attached(&self.view);
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("title", &self.control.title(ControlState::Normal))
            .field("highlighted", &self.control.is_highlighted())
            .field("properties", &self.properties.get())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declkit_runtime::ObservableCell;
    use declkit_style::FontWeight;

    #[test]
    fn new_sets_normal_title() {
        let button = Button::new("Go");
        assert_eq!(button.control().title(ControlState::Normal).as_deref(), Some("Go"));
        assert_eq!(
            button.properties().current_value::<String>(TITLE).as_deref(),
            Some("Go")
        );
    }

    #[test]
    fn per_state_titles_and_colors() {
        let button = Button::new("Go")
            .title("Going", ControlState::Highlighted)
            .color(Color::WHITE, ControlState::Normal)
            .color_hex(0xFF0000, ControlState::Disabled);
        let control = button.control();
        assert_eq!(control.title(ControlState::Highlighted).as_deref(), Some("Going"));
        assert_eq!(control.title(ControlState::Normal).as_deref(), Some("Go"));
        assert_eq!(control.title_color(ControlState::Normal), Some(Color::WHITE));
        assert_eq!(
            control.title_color(ControlState::Disabled),
            Some(Color::from_hex(0xFF0000))
        );
    }

    #[test]
    fn bound_title_follows_cell() {
        let label = ObservableCell::new(String::from("Save"));
        let button = Button::new("").bind_title(&label.binding());
        label.write("Saved".into());
        assert_eq!(button.control().title(ControlState::Normal).as_deref(), Some("Saved"));
    }

    #[test]
    fn font_lookup_failure_clears_font() {
        let button = Button::new("A").font_named(FontIdentifier::System(FontWeight::Bold), 17.0);
        assert!(button.control().read(|p| p.title_font.is_some()));

        let button = button.font_named("", 17.0);
        assert!(button.control().read(|p| p.title_font.is_none()));
    }

    #[test]
    fn images_and_mode() {
        let button = Button::new("A")
            .image_named("star", ControlState::Normal)
            .image_named("", ControlState::Selected)
            .mode(ContentMode::ScaleAspectFit);
        assert_eq!(
            button.control().image(ControlState::Normal).map(|i| i.name().to_owned()),
            Some("star".into())
        );
        assert!(button.control().image(ControlState::Selected).is_none());
        assert_eq!(button.control().read(|p| p.content_mode), ContentMode::ScaleAspectFit);
    }

    #[test]
    fn inset_sides_keep_argument_order() {
        let button = Button::new("A")
            .title_insets_sides(1.0, 2.0, 3.0, 4.0)
            .image_insets_sides(5.0, 6.0, 7.0, 8.0);
        let p = button.control().snapshot();
        assert_eq!(p.title_insets, EdgeInsets::new(1.0, 2.0, 4.0, 3.0));
        assert_eq!(p.image_insets.right, 7.0);
        assert_eq!(p.image_insets.bottom, 8.0);
    }

    #[test]
    fn highlight_swaps_and_restores_background() {
        let mut button = Button::new("A")
            .background(Color::BLUE)
            .background_highlighted(Color::RED);

        button.set_highlighted(true);
        assert_eq!(button.native().background(), Some(Color::RED));
        assert!(button.control().is_highlighted());

        button.set_highlighted(false);
        assert_eq!(button.native().background(), Some(Color::BLUE));
        assert_eq!(button.original_background(), Some(Color::BLUE));
    }

    #[test]
    fn original_background_is_captured_once() {
        let mut button = Button::new("A")
            .background(Color::BLUE)
            .background_highlighted(Color::RED);
        button.set_highlighted(true);
        button.set_highlighted(false);

        let mut button = button.background(Color::GREEN);
        button.set_highlighted(true);
        button.set_highlighted(false);
        assert_eq!(button.native().background(), Some(Color::BLUE));
    }

    #[test]
    fn highlight_without_highlight_color_keeps_background() {
        let mut button = Button::new("A").background(Color::GRAY);
        button.set_highlighted(true);
        assert_eq!(button.native().background(), Some(Color::GRAY));
    }

    #[test]
    fn defaults_supply_title_and_highlight() {
        let mut defaults = ViewDefaults::default();
        defaults.button.title = "OK".into();
        defaults.button.highlighted_background = Some(Color::GREEN);

        let mut button = Button::with_defaults("", &defaults);
        assert_eq!(button.control().title(ControlState::Normal).as_deref(), Some("OK"));
        button.set_highlighted(true);
        assert_eq!(button.native().background(), Some(Color::GREEN));
    }
}
