#![forbid(unsafe_code)]

//! Per-view property registry.
//!
//! A [`PropertyRegistry`] maps a declared property name to the binding that
//! currently drives it. Binding a property subscribes an apply function to
//! the cell and runs it once with the cell's current value, so the native
//! property reflects state from the moment of the bind. Rebinding to a
//! different cell tears the old subscription down first.
//!
//! # Invariants
//!
//! 1. Right after `bind(name, b, f)`, `current_value(name) == b.get()`.
//! 2. At most one live subscription per property name.
//! 3. Binding a name again with the same cell is a no-op: no second
//!    subscription and no second initial sync.
//! 4. `unbind` keeps the last applied value for introspection.
//! 5. Dropping the registry releases every subscription.
//! 6. A bound cell stays alive while it drives a property.
//! 7. When `apply` writes back into the cell, `current_value(name)` ends up
//!    equal to the cell's final value.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use super::binding::Binding;
use super::observable::{CellId, Subscription, run_isolated};

/// Declared property name, e.g. `"width"` or `"scrollPosition"`.
pub type PropertyKey = &'static str;

/// What [`PropertyRegistry::bind`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The property had no binding.
    Bound,
    /// A binding to a different cell was torn down and replaced.
    Rebound,
    /// The property was already bound to this cell; nothing changed.
    Unchanged,
}

struct Entry {
    cell: CellId,
    _subscription: Subscription,
    /// Keeps the bound cell alive while it drives the property, so a
    /// temporary derived binding keeps updating.
    _source: Box<dyn Any>,
}

#[derive(Default)]
struct RegistryState {
    entries: AHashMap<PropertyKey, Entry>,
    applied: AHashMap<PropertyKey, Rc<dyn Any>>,
}

/// Property name → active subscription plus last applied value.
///
/// Owned by exactly one view instance. Apply callbacks hold only a weak
/// reference back to the registry, so a view and its registry never keep
/// each other alive through a cell.
pub struct PropertyRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl PropertyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState::default())),
        }
    }

    /// Drive property `name` from `binding`, applying values with `apply`.
    ///
    /// `apply` runs once immediately with the current value and then on
    /// every write to the bound cell. A panic in the initial run is logged
    /// and swallowed like one from a notification; the binding stays live.
    pub fn bind<T: Clone + 'static>(
        &self,
        name: PropertyKey,
        binding: &Binding<T>,
        apply: impl Fn(&T) + 'static,
    ) -> BindOutcome {
        let previous = self.state.borrow().entries.get(name).map(|e| e.cell);
        let outcome = match previous {
            Some(cell) if cell == binding.cell_id() => {
                tracing::trace!(property = name, cell = cell.get(), "bind skipped: same cell");
                return BindOutcome::Unchanged;
            }
            Some(old) => {
                self.unbind(name);
                tracing::debug!(
                    property = name,
                    old_cell = old.get(),
                    new_cell = binding.cell_id().get(),
                    "property rebound"
                );
                BindOutcome::Rebound
            }
            None => BindOutcome::Bound,
        };

        let weak = Rc::downgrade(&self.state);
        // Recorded before `apply` runs: an apply that writes back into the
        // cell records the newer value from the nested notification.
        let record = move |value: &T| {
            if let Some(state) = weak.upgrade() {
                state
                    .borrow_mut()
                    .applied
                    .insert(name, Rc::new(value.clone()) as Rc<dyn Any>);
            }
            apply(value);
        };
        let record = Rc::new(record);

        let subscriber = Rc::clone(&record);
        let subscription = binding.on_change_scoped(move |value| subscriber(value));
        let token = subscription.token();
        self.state.borrow_mut().entries.insert(
            name,
            Entry {
                cell: binding.cell_id(),
                _subscription: subscription,
                _source: Box::new(binding.clone()),
            },
        );

        // Initial sync. Cloned first so `apply` may write back into the cell.
        let current = binding.get();
        run_isolated(binding.cell_id(), token, || record(&current));
        outcome
    }

    /// Tear down the subscription for `name`. The native property keeps its
    /// last applied value. Returns whether a binding was removed.
    pub fn unbind(&self, name: PropertyKey) -> bool {
        let removed = self.state.borrow_mut().entries.remove(name);
        match removed {
            Some(entry) => {
                tracing::debug!(property = name, cell = entry.cell.get(), "property unbound");
                drop(entry);
                true
            }
            None => false,
        }
    }

    /// Unbind every property.
    pub fn unbind_all(&self) {
        let entries = std::mem::take(&mut self.state.borrow_mut().entries);
        drop(entries);
    }

    /// Last value applied to `name`, if any and if it is a `T`.
    #[must_use]
    pub fn current_value<T: Clone + 'static>(&self, name: PropertyKey) -> Option<T> {
        self.state
            .borrow()
            .applied
            .get(name)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    #[must_use]
    pub fn is_bound(&self, name: PropertyKey) -> bool {
        self.state.borrow().entries.contains_key(name)
    }

    /// Cell currently driving `name`.
    #[must_use]
    pub fn bound_cell(&self, name: PropertyKey) -> Option<CellId> {
        self.state.borrow().entries.get(name).map(|e| e.cell)
    }

    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Bound property names, sorted.
    #[must_use]
    pub fn bound_names(&self) -> Vec<PropertyKey> {
        let mut names: Vec<_> = self.state.borrow().entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PropertyRegistry {
    fn drop(&mut self) {
        self.unbind_all();
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("bound", &self.bound_names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
