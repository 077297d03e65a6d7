#![forbid(unsafe_code)]

//! Observable value cell with synchronous change notification.
//!
//! # Design
//!
//! [`ObservableCell<T>`] wraps a value in shared, reference-counted storage.
//! Every [`write`](ObservableCell::write) stores the value and then invokes
//! each current subscriber with it, in registration order. No equality check
//! is made; callers that want duplicate suppression do it themselves.
//!
//! # Performance
//!
//! | Operation       | Complexity                  |
//! |-----------------|-----------------------------|
//! | `read()`        | O(1) plus `T::clone`        |
//! | `write()`       | O(S) where S = subscribers  |
//! | `subscribe()`   | O(1) amortized              |
//! | `unsubscribe()` | O(S)                        |
//!
//! # Failure Modes
//!
//! - **Panicking subscriber**: caught with `catch_unwind`, logged at `warn`,
//!   and skipped. Remaining subscribers in the same notification still run.
//!   This needs `panic = "unwind"`.
//! - **Nested write**: a subscriber may write to the cell it observes. The
//!   nested notification reaches every subscriber with the newer value, and
//!   the outer pass then stops: subscribers it had not reached yet never see
//!   the superseded value, so the last write wins everywhere.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a cell. Shared by every handle to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    fn next() -> Self {
        Self(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle returned by [`ObservableCell::subscribe`].
///
/// Tokens are unique across all cells, so a token from one cell never
/// removes a subscriber from another. [`SubscriptionToken::NONE`] is never
/// issued and is the value to hold after teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    /// The never-issued token.
    pub const NONE: Self = Self(0);

    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

type Callback<T> = Rc<dyn Fn(&T)>;

struct Subscriber<T> {
    token: SubscriptionToken,
    callback: Callback<T>,
    /// Cleared on unsubscribe so an in-flight notification skips it.
    active: Rc<Cell<bool>>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            callback: Rc::clone(&self.callback),
            active: Rc::clone(&self.active),
        }
    }
}

struct CellState<T> {
    value: T,
    version: u64,
    subscribers: Vec<Subscriber<T>>,
}

struct CellShared<T> {
    id: CellId,
    state: RefCell<CellState<T>>,
    /// Subscriptions whose lifetime is tied to this cell (derived cells keep
    /// their source subscription here).
    retained: RefCell<Vec<Subscription>>,
}

impl<T: 'static> CellShared<T> {
    fn remove(&self, token: SubscriptionToken) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            state
                .subscribers
                .iter()
                .position(|s| s.token == token)
                .map(|pos| state.subscribers.remove(pos))
        };
        // Dropped outside the borrow: the callback may own guards for this cell.
        match removed {
            Some(subscriber) => {
                subscriber.active.set(false);
                true
            }
            None => false,
        }
    }

    /// Deliver `value`, written as `version`, to `snapshot`. Stops early once
    /// a nested write has moved the cell past `version`.
    fn dispatch(&self, snapshot: &[Subscriber<T>], value: &T, version: u64) {
        for subscriber in snapshot {
            if self.state.borrow().version != version {
                break;
            }
            if !subscriber.active.get() {
                continue;
            }
            run_isolated(self.id, subscriber.token, || (subscriber.callback)(value));
        }
    }
}

/// Invoke one subscriber callback. A panic is logged and swallowed so the
/// caller can carry on with the next subscriber. Returns whether `f`
/// completed.
pub(crate) fn run_isolated(cell: CellId, token: SubscriptionToken, f: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            tracing::warn!(
                target: "declkit_runtime::reactive",
                cell = cell.0,
                token = token.0,
                panic = panic_message(payload.as_ref()),
                "subscriber panicked; continuing notification"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// A shared value slot with change notification.
///
/// Cloning an `ObservableCell` creates another handle to the **same** slot;
/// the slot is freed when the last handle (including those held inside
/// [`Binding`](super::Binding)s) is dropped.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on every `write` or `update`.
/// 2. Subscribers are notified in registration order with the written value.
/// 3. Subscribers added during a notification are not called for it.
/// 4. A subscriber removed during a notification is not called later in it.
/// 5. After a nested write, no subscriber receives the superseded value.
pub struct ObservableCell<T> {
    shared: Rc<CellShared<T>>,
}

impl<T> Clone for ObservableCell<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("ObservableCell")
            .field("id", &self.shared.id.0)
            .field("value", &state.value)
            .field("version", &state.version)
            .field("subscriber_count", &state.subscribers.len())
            .finish()
    }
}

impl<T> ObservableCell<T> {
    #[must_use]
    pub fn id(&self) -> CellId {
        self.shared.id
    }

    /// Whether `self` and `other` are handles to the same slot.
    #[must_use]
    pub fn same_cell(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: Clone + 'static> ObservableCell<T> {
    /// Create a cell holding `value`, version 0, no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(CellShared {
                id: CellId::next(),
                state: RefCell::new(CellState {
                    value,
                    version: 0,
                    subscribers: Vec::new(),
                }),
                retained: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Clone of the current value. No side effects.
    #[must_use]
    pub fn read(&self) -> T {
        self.shared.state.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.state.borrow().value)
    }

    /// Store `value`, then call every current subscriber with it.
    pub fn write(&self, value: T) {
        let (snapshot, value, version) = {
            let mut state = self.shared.state.borrow_mut();
            state.value = value;
            state.version += 1;
            (state.subscribers.clone(), state.value.clone(), state.version)
        };
        self.shared.dispatch(&snapshot, &value, version);
    }

    /// Mutate the value in place, then notify. Always notifies.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (snapshot, value, version) = {
            let mut state = self.shared.state.borrow_mut();
            f(&mut state.value);
            state.version += 1;
            (state.subscribers.clone(), state.value.clone(), state.version)
        };
        self.shared.dispatch(&snapshot, &value, version);
    }

    /// Register `callback`. It is called on every subsequent write, never
    /// for the current value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionToken {
        let token = SubscriptionToken::next();
        self.shared.state.borrow_mut().subscribers.push(Subscriber {
            token,
            callback: Rc::new(callback),
            active: Rc::new(Cell::new(true)),
        });
        token
    }

    /// Subscribe and return an RAII guard that unsubscribes on drop.
    pub fn subscribe_scoped(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let token = self.subscribe(callback);
        let weak: Weak<CellShared<T>> = Rc::downgrade(&self.shared);
        Subscription {
            token,
            cancel: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.remove(token);
                }
            })),
        }
    }

    /// Remove the subscriber registered under `token`.
    ///
    /// Returns whether a subscriber was removed. Unknown, already-removed and
    /// [`SubscriptionToken::NONE`] tokens are ignored.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        if token.is_none() {
            return false;
        }
        self.shared.remove(token)
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.borrow().subscribers.len()
    }

    /// Number of writes so far. Useful for dirty-checking and tests.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    /// A [`Binding`](super::Binding) to this cell.
    #[must_use]
    pub fn binding(&self) -> super::Binding<T> {
        super::Binding::new(self)
    }

    /// Derive a cell whose value is `f(source)`, rewritten on every write to
    /// `self`.
    ///
    /// The derived cell owns its subscription to `self`; the subscription is
    /// released when the last handle to the derived cell is dropped. Writes
    /// made directly to the derived cell stick until the next source write.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> ObservableCell<U> {
        let derived = ObservableCell::new(self.with(|v| f(v)));
        let weak = Rc::downgrade(&derived.shared);
        let subscription = self.subscribe_scoped(move |value| {
            if let Some(shared) = weak.upgrade() {
                ObservableCell { shared }.write(f(value));
            }
        });
        derived.shared.retained.borrow_mut().push(subscription);
        derived
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard unsubscribes. If the cell is already gone the drop is
/// a no-op.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    token: SubscriptionToken,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    #[must_use]
    pub fn token(&self) -> SubscriptionToken {
        self.token
    }

    /// Unsubscribe now. Same as dropping the guard.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token.0)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
