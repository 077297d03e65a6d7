#![forbid(unsafe_code)]

use declkit::prelude::*;
use declkit::{bind, bind_map};

#[test]
fn prelude_wires_a_button() {
    let count = ObservableCell::new(0);
    let mut button = Button::new("")
        .bind_title(&bind_map!(count, |c| format!("Tapped {c}")))
        .background(Color::from_hex(0x336699))
        .background_highlighted(Color::BLACK);

    count.write(3);
    assert_eq!(
        button.control().title(ControlState::Normal).as_deref(),
        Some("Tapped 3")
    );

    button.set_highlighted(true);
    assert_eq!(button.native().background(), Some(Color::BLACK));
    button.set_highlighted(false);
    assert_eq!(button.native().background(), Some(Color::from_hex(0x336699)));
}

#[test]
fn bind_macro_feeds_scroll_position() {
    let offset = ObservableCell::new(Point::new(0.0, 5.0));
    let grid = CollectionView::new().scroll_position(&bind!(offset));
    assert_eq!(grid.scroll_view().content_offset(), Point::new(0.0, 5.0));
}

#[cfg(feature = "config")]
#[test]
fn defaults_from_toml_shape_new_views() {
    let defaults = ViewDefaults::from_toml_str(
        r#"
        [flow_layout]
        item_size = 64.0
        minimum_line_spacing = 0.0

        [button]
        title = "Continue"
        "#,
    )
    .unwrap();

    let grid = CollectionView::with_defaults(&defaults);
    assert_eq!(grid.layout().item_size, Size::square(64.0));
    assert_eq!(grid.layout().minimum_line_spacing, 0.0);

    let button = Button::with_defaults("", &defaults);
    assert_eq!(
        button.control().title(ControlState::Normal).as_deref(),
        Some("Continue")
    );
}
