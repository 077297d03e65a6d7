#![forbid(unsafe_code)]

//! Typed handles to [`ObservableCell`]s.
//!
//! A [`Binding<T>`] is what application code passes into a view's builder
//! methods. It shares ownership of the cell it points at, so it can never
//! dangle, and it compares equal to another binding exactly when both point
//! at the same cell. Views rely on that identity to tell a rebind to a new
//! cell apart from a repeated bind of the same one.
//!
//! The [`bind!`] and [`bind_map!`] macros provide syntactic sugar.
//!
//! # Usage
//!
//! ```
//! use declkit_runtime::{bind, bind_map, ObservableCell};
//!
//! let count = ObservableCell::new(0);
//!
//! let b = bind!(count);
//! assert_eq!(b.get(), 0);
//!
//! let label = bind_map!(count, |c| format!("Count: {c}"));
//! assert_eq!(label.get(), "Count: 0");
//!
//! b.set(5);
//! assert_eq!(count.read(), 5);
//! assert_eq!(label.get(), "Count: 5");
//! ```
//!
//! # Invariants
//!
//! 1. `get()` always returns the cell's current value.
//! 2. `a == b` iff `a` and `b` reference the same cell.
//! 3. A binding keeps its cell alive.

use std::fmt;

use super::observable::{CellId, ObservableCell, Subscription, SubscriptionToken};

/// A copyable handle to an [`ObservableCell`].
pub struct Binding<T> {
    cell: ObservableCell<T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("cell", &self.cell.id().get())
            .field("value", &self.get())
            .finish()
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// Bind to an existing cell.
    #[must_use]
    pub fn new(cell: &ObservableCell<T>) -> Self {
        Self { cell: cell.clone() }
    }

    /// Bind to a fresh cell that nothing else references.
    ///
    /// Builder methods that accept plain values use this so every property
    /// goes through the same registry path.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            cell: ObservableCell::new(value),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.cell.read()
    }

    pub fn set(&self, value: T) {
        self.cell.write(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.cell.update(f);
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    /// Subscribe to changes of the referenced cell.
    pub fn on_change(&self, callback: impl Fn(&T) + 'static) -> SubscriptionToken {
        self.cell.subscribe(callback)
    }

    /// Subscribe with an RAII guard.
    pub fn on_change_scoped(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.cell.subscribe_scoped(callback)
    }

    /// Proxy for [`ObservableCell::unsubscribe`]. Idempotent.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.cell.unsubscribe(token)
    }

    #[must_use]
    pub fn cell_id(&self) -> CellId {
        self.cell.id()
    }

    #[must_use]
    pub fn same_cell(&self, other: &Self) -> bool {
        self.cell.same_cell(&other.cell)
    }

    #[must_use]
    pub fn cell(&self) -> &ObservableCell<T> {
        &self.cell
    }

    /// Binding to a cell derived through `f`. See [`ObservableCell::map`].
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Binding<U> {
        Binding {
            cell: self.cell.map(f),
        }
    }
}

impl<T> PartialEq for Binding<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cell.id() == other.cell.id()
    }
}

impl<T> Eq for Binding<T> {}

impl<T: Clone + 'static> From<&ObservableCell<T>> for Binding<T> {
    fn from(cell: &ObservableCell<T>) -> Self {
        Self::new(cell)
    }
}

impl<T: Clone + 'static> From<ObservableCell<T>> for Binding<T> {
    fn from(cell: ObservableCell<T>) -> Self {
        Self { cell }
    }
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

/// Create a [`Binding`] to a cell.
///
/// ```
/// # use declkit_runtime::{bind, ObservableCell};
/// let count = ObservableCell::new(0);
/// let b = bind!(count);
/// assert_eq!(b.get(), 0);
/// ```
#[macro_export]
macro_rules! bind {
    ($cell:expr) => {
        $crate::reactive::binding::Binding::new(&$cell)
    };
}

/// Create a [`Binding`] to a cell derived from `$cell` through `$f`.
///
/// ```
/// # use declkit_runtime::{bind_map, ObservableCell};
/// let count = ObservableCell::new(5);
/// let b = bind_map!(count, |v| v * 10);
/// assert_eq!(b.get(), 50);
/// ```
#[macro_export]
macro_rules! bind_map {
    ($cell:expr, $f:expr) => {
        $crate::reactive::binding::Binding::new(&$cell).map($f)
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn get_set_proxy_to_cell() {
        let cell = ObservableCell::new(42);
        let b = Binding::new(&cell);
        assert_eq!(b.get(), 42);

        b.set(100);
        assert_eq!(cell.read(), 100);

        cell.write(7);
        assert_eq!(b.get(), 7);
    }

    #[test]
    fn on_change_proxies_subscribe() {
        let cell = ObservableCell::new(0);
        let b = cell.binding();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let token = b.on_change(move |v| s.set(*v));

        cell.write(3);
        assert_eq!(seen.get(), 3);

        assert!(b.unsubscribe(token));
        assert!(!b.unsubscribe(token));
        cell.write(4);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn identity_equality() {
        let a = ObservableCell::new(1);
        let b = ObservableCell::new(1);

        assert_eq!(a.binding(), a.binding());
        assert_eq!(a.binding(), Binding::from(&a.clone()));
        assert_ne!(a.binding(), b.binding());
        assert!(a.binding().same_cell(&a.binding()));
    }

    #[test]
    fn equal_values_in_different_cells_are_not_equal_bindings() {
        let a = Binding::constant(5);
        let b = Binding::constant(5);
        assert_ne!(a, b);
    }

    #[test]
    fn binding_keeps_cell_alive() {
        let b = {
            let cell = ObservableCell::new(String::from("kept"));
            cell.binding()
        };
        assert_eq!(b.get(), "kept");
        b.set("still here".into());
        assert_eq!(b.get(), "still here");
    }

    #[test]
    fn clone_shares_cell() {
        let b1 = Binding::constant(1);
        let b2 = b1.clone();
        b1.set(99);
        assert_eq!(b2.get(), 99);
        assert_eq!(b1, b2);
    }

    #[test]
    fn map_derives_new_cell() {
        let cell = ObservableCell::new(3);
        let label = cell.binding().map(|c| format!("items: {c}"));
        assert_eq!(label.get(), "items: 3");

        cell.write(7);
        assert_eq!(label.get(), "items: 7");
    }

    #[test]
    fn mapped_binding_notifies() {
        let cell = ObservableCell::new(1);
        let doubled = cell.binding().map(|v| v * 2);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        doubled.on_change(move |v| l.borrow_mut().push(*v));

        cell.write(2);
        cell.write(3);
        assert_eq!(*log.borrow(), vec![4, 6]);
    }

    #[test]
    fn bind_macro() {
        let cell = ObservableCell::new(42);
        let b = bind!(cell);
        assert_eq!(b.get(), 42);
        assert_eq!(b.cell_id(), cell.id());
    }

    #[test]
    fn bind_map_macro() {
        let cell = ObservableCell::new(5);
        let b = bind_map!(cell, |v| v * 10);
        assert_eq!(b.get(), 50);
    }

    #[test]
    fn debug_format() {
        let b = Binding::constant(7);
        let dbg = format!("{b:?}");
        assert!(dbg.contains("Binding"));
        assert!(dbg.contains('7'));
    }
}
