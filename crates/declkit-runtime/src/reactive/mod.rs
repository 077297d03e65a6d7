#![forbid(unsafe_code)]

//! Reactive primitives.
//!
//! - [`ObservableCell`]: shared value slot with synchronous change
//!   notification.
//! - [`Binding`]: copyable handle to a cell, compared by cell identity.
//! - [`EventSource`]: native event channel (scroll, highlight) built on a
//!   unit cell.
//! - [`PropertyRegistry`]: per-view map from property name to its active
//!   subscription and last applied value.
//! - [`TwoWayBinding`]: cell-to-view plus view-to-cell propagation with a
//!   re-entrancy guard.
//! - [`StateField`]: plain value with a lazily created cell.
//!
//! # Architecture
//!
//! `ObservableCell<T>` is an `Rc` around a `RefCell`. Subscribers are held
//! strongly by the cell and removed by token. Notification snapshots the
//! subscriber list and runs callbacks outside the borrow, so callbacks may
//! read, write, subscribe and unsubscribe freely.
//!
//! # Invariants
//!
//! 1. Every `write` notifies, including writes of an equal value.
//! 2. Subscribers are notified in registration order.
//! 3. Subscribers added during a notification are not called for it.
//! 4. A panicking subscriber is logged and skipped; the rest still run.
//! 5. Unsubscribing is idempotent.

pub mod binding;
pub mod event;
pub mod field;
pub mod observable;
pub mod registry;
pub mod two_way;

pub use binding::Binding;
pub use event::EventSource;
pub use field::StateField;
pub use observable::{CellId, ObservableCell, Subscription, SubscriptionToken};
pub use registry::{BindOutcome, PropertyKey, PropertyRegistry};
pub use two_way::{PropagationState, TwoWayBinding};
