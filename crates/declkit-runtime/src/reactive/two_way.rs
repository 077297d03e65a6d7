#![forbid(unsafe_code)]

//! Two-way binding between a cell and an interactive native property.
//!
//! Some properties are driven both by state and by the user: a scroll
//! offset is set from state, and the user scrolling writes it back. A
//! [`TwoWayBinding`] wires both directions:
//!
//! - **cell → view**: every write to the bound cell calls `apply_to_view`.
//! - **view → cell**: every native event calls `read_from_view` and writes
//!   the result into the cell.
//!
//! # State machine
//!
//! ```text
//!            cell write / native event
//!   Idle ───────────────────────────────▶ Propagating
//!    ▲                                        │
//!    └──────── triggering write completes ────┘
//! ```
//!
//! While `Propagating`, a trigger arriving from the other direction is
//! suppressed. A state-driven apply that makes the toolkit fire its scroll
//! event synchronously is not echoed back into the cell, and a user-driven
//! cell write is not re-applied to the native property it came from. If
//! another subscriber rewrites the cell while a user-driven write is
//! propagating, the final value is applied to the view once that write
//! completes.
//!
//! # Teardown
//!
//! [`detach`](TwoWayBinding::detach) stops cell → view propagation at once
//! but keeps the native handler connected until the binding is dropped. The
//! toolkit may still fire events while a view is being torn down; those are
//! counted in [`dropped_after_detach`](TwoWayBinding::dropped_after_detach)
//! and never reach the cell.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::binding::Binding;
use super::event::EventSource;
use super::observable::{Subscription, run_isolated};

/// Re-entrancy state of a [`TwoWayBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationState {
    #[default]
    Idle,
    Propagating,
}

#[derive(Debug, Default)]
struct GuardState {
    state: Cell<PropagationState>,
    attached: Cell<bool>,
    suppressed: Cell<u64>,
    dropped: Cell<u64>,
}

/// Holds `Propagating` for its lifetime; restores `Idle` on drop, including
/// during unwinding.
struct Propagation<'a>(&'a Cell<PropagationState>);

impl<'a> Propagation<'a> {
    fn enter(state: &'a Cell<PropagationState>) -> Option<Self> {
        if state.get() == PropagationState::Propagating {
            return None;
        }
        state.set(PropagationState::Propagating);
        Some(Self(state))
    }
}

impl Drop for Propagation<'_> {
    fn drop(&mut self) {
        self.0.set(PropagationState::Idle);
    }
}

/// Cell ↔ native property synchronization with a re-entrancy guard.
///
/// Dropping the binding disconnects both directions.
pub struct TwoWayBinding<T: Clone + 'static> {
    binding: Binding<T>,
    guard: Rc<GuardState>,
    state_to_view: Option<Subscription>,
    _view_to_state: Subscription,
}

impl<T: Clone + 'static> TwoWayBinding<T> {
    /// Connect `binding` to a native property.
    ///
    /// `apply_to_view` runs once immediately with the current value (the
    /// same initial sync a one-way bind performs) and then on every cell
    /// write. `read_from_view` runs whenever `events` fires. A panic in the
    /// initial apply is logged and swallowed; the binding is still attached.
    pub fn attach(
        binding: &Binding<T>,
        apply_to_view: impl Fn(&T) + 'static,
        read_from_view: impl Fn() -> T + 'static,
        events: &EventSource,
    ) -> Self {
        let guard = Rc::new(GuardState::default());
        guard.attached.set(true);
        let apply = Rc::new(apply_to_view);

        let state_to_view = {
            let guard = Rc::clone(&guard);
            let apply = Rc::clone(&apply);
            binding.on_change_scoped(move |value| {
                if !guard.attached.get() {
                    return;
                }
                match Propagation::enter(&guard.state) {
                    Some(_propagating) => apply(value),
                    None => {
                        guard.suppressed.set(guard.suppressed.get() + 1);
                        tracing::trace!("two-way: cell write from view not re-applied");
                    }
                }
            })
        };

        let view_to_state = {
            let guard = Rc::clone(&guard);
            let apply = Rc::clone(&apply);
            let target = binding.clone();
            events.connect_scoped(move || {
                if !guard.attached.get() {
                    guard.dropped.set(guard.dropped.get() + 1);
                    tracing::debug!(
                        cell = target.cell_id().get(),
                        "two-way: native event after detach dropped"
                    );
                    return;
                }
                let Some(propagating) = Propagation::enter(&guard.state) else {
                    guard.suppressed.set(guard.suppressed.get() + 1);
                    tracing::trace!("two-way: native echo of state write suppressed");
                    return;
                };
                let before = target.cell().version();
                target.set(read_from_view());
                drop(propagating);
                // Another subscriber rewrote the cell during the notification
                // and the cell → view side suppressed it. Show the final value.
                if target.cell().version() != before + 1 && guard.attached.get() {
                    if let Some(_propagating) = Propagation::enter(&guard.state) {
                        tracing::trace!("two-way: view corrected after write-back");
                        apply(&target.get());
                    }
                }
            })
        };

        // Initial sync under the guard: a toolkit that fires its event while
        // the first value is applied must not write back.
        let current = binding.get();
        run_isolated(binding.cell_id(), state_to_view.token(), || {
            let _propagating = Propagation::enter(&guard.state);
            apply(&current);
        });

        Self {
            binding: binding.clone(),
            guard,
            state_to_view: Some(state_to_view),
            _view_to_state: view_to_state,
        }
    }

    /// Stop propagating. Native events arriving afterwards are dropped.
    /// Idempotent.
    pub fn detach(&mut self) {
        if !self.guard.attached.replace(false) {
            return;
        }
        self.state_to_view = None;
        tracing::debug!(cell = self.binding.cell_id().get(), "two-way binding detached");
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.guard.attached.get()
    }

    #[must_use]
    pub fn state(&self) -> PropagationState {
        self.guard.state.get()
    }

    /// Triggers suppressed by the re-entrancy guard, in either direction.
    #[must_use]
    pub fn suppressed_count(&self) -> u64 {
        self.guard.suppressed.get()
    }

    /// Native events ignored because the binding was detached.
    #[must_use]
    pub fn dropped_after_detach(&self) -> u64 {
        self.guard.dropped.get()
    }

    #[must_use]
    pub fn binding(&self) -> &Binding<T> {
        &self.binding
    }
}

impl<T: Clone + 'static> Drop for TwoWayBinding<T> {
    fn drop(&mut self) {
        self.guard.attached.set(false);
    }
}

impl<T: Clone + 'static> fmt::Debug for TwoWayBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoWayBinding")
            .field("cell", &self.binding.cell_id().get())
            .field("attached", &self.is_attached())
            .field("state", &self.state())
            .field("suppressed", &self.suppressed_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
