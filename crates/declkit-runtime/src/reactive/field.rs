#![forbid(unsafe_code)]

//! A plain value paired with a lazily created cell.
//!
//! Views expose computed attributes (width, top, center) as a plain value for
//! direct reads plus an explicit [`binding`](StateField::binding) accessor.
//! The cell is only created the first time someone asks for a binding, so
//! views nobody observes pay nothing for notification.

use std::cell::OnceCell;
use std::fmt;

use super::binding::Binding;
use super::observable::ObservableCell;

/// Value slot with an on-demand [`ObservableCell`].
pub struct StateField<T> {
    value: T,
    cell: OnceCell<ObservableCell<T>>,
}

impl<T: Clone + 'static> StateField<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            cell: OnceCell::new(),
        }
    }

    /// Current value. Reads through the cell once one exists, so writes made
    /// via a handed-out binding are visible here.
    #[must_use]
    pub fn get(&self) -> T {
        match self.cell.get() {
            Some(cell) => cell.read(),
            None => self.value.clone(),
        }
    }

    /// Store `value`, notifying binding subscribers if a cell exists.
    pub fn set(&mut self, value: T) {
        self.value = value.clone();
        if let Some(cell) = self.cell.get() {
            cell.write(value);
        }
    }

    /// Binding to the backing cell, creating it on first call.
    pub fn binding(&self) -> Binding<T> {
        let cell = self.cell.get_or_init(|| ObservableCell::new(self.value.clone()));
        cell.binding()
    }

    #[must_use]
    pub fn has_binding(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Clone + PartialEq + 'static> StateField<T> {
    /// [`set`](Self::set) only when `value` differs from the current value.
    /// Returns whether a write happened.
    pub fn set_if_changed(&mut self, value: T) -> bool {
        if self.get() == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: Clone + Default + 'static> Default for StateField<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for StateField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateField")
            .field("value", &self.get())
            .field("has_binding", &self.has_binding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn plain_until_binding_requested() {
        let mut field = StateField::new(1.0);
        assert!(!field.has_binding());
        field.set(2.0);
        assert_eq!(field.get(), 2.0);
        assert!(!field.has_binding());
    }

    #[test]
    fn binding_is_created_once() {
        let field = StateField::new(5);
        let a = field.binding();
        let b = field.binding();
        assert_eq!(a, b);
        assert_eq!(a.get(), 5);
    }

    #[test]
    fn set_notifies_binding_subscribers() {
        let mut field = StateField::new(0);
        let seen = Rc::new(Cell::new(-1));
        let s = Rc::clone(&seen);
        field.binding().on_change(move |v| s.set(*v));

        field.set(9);
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn external_binding_write_is_visible() {
        let field = StateField::new(0);
        field.binding().set(4);
        assert_eq!(field.get(), 4);
    }

    #[test]
    fn set_if_changed_skips_equal_values() {
        let mut field = StateField::new(3);
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        field.binding().on_change(move |_| h.set(h.get() + 1));

        assert!(!field.set_if_changed(3));
        assert!(field.set_if_changed(4));
        assert_eq!(hits.get(), 1);
    }
}
