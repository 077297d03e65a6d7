//! Property tests for rectangle edges and inset arithmetic.
//!
//! Coordinates are whole numbers so every comparison is exact.

use declkit_core::{EdgeInsets, Rect};
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (-1000i32..1000, -1000i32..1000, 0i32..2000, 0i32..2000).prop_map(|(x, y, w, h)| {
        Rect::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h))
    })
}

fn insets() -> impl Strategy<Value = EdgeInsets> {
    (0i32..500, 0i32..500, 0i32..500, 0i32..500).prop_map(|(t, l, b, r)| {
        EdgeInsets::new(f64::from(t), f64::from(l), f64::from(b), f64::from(r))
    })
}

proptest! {
    #[test]
    fn edges_are_ordered(r in rect()) {
        prop_assert!(r.min_x() <= r.mid_x() && r.mid_x() <= r.max_x());
        prop_assert!(r.min_y() <= r.mid_y() && r.mid_y() <= r.max_y());
        prop_assert_eq!(r.max_x() - r.min_x(), r.width());
        prop_assert_eq!(r.max_y() - r.min_y(), r.height());
        prop_assert_eq!(r.is_empty(), r.width() == 0.0 || r.height() == 0.0);
    }

    #[test]
    fn inset_stays_inside_and_never_goes_negative(r in rect(), i in insets()) {
        let inner = i.inset(r);
        prop_assert!(inner.width() >= 0.0);
        prop_assert!(inner.height() >= 0.0);
        prop_assert_eq!(inner.min_x(), r.min_x() + i.left);
        prop_assert_eq!(inner.min_y(), r.min_y() + i.top);
        if i.horizontal_sum() <= r.width() {
            prop_assert_eq!(inner.max_x(), r.max_x() - i.right);
        }
        if i.vertical_sum() <= r.height() {
            prop_assert_eq!(inner.max_y(), r.max_y() - i.bottom);
        }
    }

    #[test]
    fn zero_insets_are_identity(r in rect()) {
        prop_assert_eq!(EdgeInsets::ZERO.inset(r), r);
    }
}
