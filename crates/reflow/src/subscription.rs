//! State publication - observers notified after every reduce
//!
//! Observers are called synchronously once the new state is in place. An
//! observer may dispatch; the resulting state changes are delivered by the
//! notification pass already running rather than by a nested one, so every
//! observer always ends up having seen the latest state.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tokio::sync::mpsc;

type Observer<S> = RefCell<Box<dyn FnMut(&S)>>;

struct Entry<S> {
    id: u64,
    active: Cell<bool>,
    observer: Observer<S>,
}

/// Registry of state observers owned by the store
pub(crate) struct Subscribers<S> {
    entries: RefCell<Vec<Rc<Entry<S>>>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
}

impl<S> Subscribers<S> {
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<S: 'static> Subscribers<S> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            notifying: Cell::new(false),
        })
    }

    pub(crate) fn insert(self: &Rc<Self>, observer: Box<dyn FnMut(&S)>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push(Rc::new(Entry {
            id,
            active: Cell::new(true),
            observer: RefCell::new(observer),
        }));

        let registry: Weak<Self> = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|entry| {
            if entry.id == id {
                entry.active.set(false);
                false
            } else {
                true
            }
        });
    }

    /// Deliver the latest state to every observer
    ///
    /// `version` identifies the current state, `latest` reads it. When an
    /// observer causes a new reduce, the pass repeats with the newer state.
    pub(crate) fn notify(&self, version: impl Fn() -> u64, latest: impl Fn() -> S) {
        if self.notifying.get() || self.entries.borrow().is_empty() {
            return;
        }
        let _notifying = NotifyingGuard::enter(&self.notifying);

        loop {
            let delivered = version();
            let state = latest();
            let entries: Vec<Rc<Entry<S>>> = self.entries.borrow().clone();
            for entry in entries {
                // Unsubscribed by an earlier observer in this pass
                if !entry.active.get() {
                    continue;
                }
                (entry.observer.borrow_mut())(&state);
            }
            if version() == delivered {
                break;
            }
        }
    }
}

struct NotifyingGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Disposer for a registered observer
///
/// Dropping the subscription unregisters the observer. Use
/// [`Subscription::detach`] to keep it registered for the store's lifetime.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Stop receiving notifications
    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    /// Keep the observer registered until the store is dropped
    pub fn detach(mut self) {
        self.dispose = None;
    }

    fn dispose(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

/// Awaitable sequence of distinct projected values, see [`Store::watch`](crate::Store::watch)
///
/// The first value is the projection of the state at the time of the call.
/// The sequence ends once the store is dropped.
#[derive(Debug)]
pub struct Watch<T> {
    values: mpsc::UnboundedReceiver<T>,
    _subscription: Subscription,
}

impl<T> Watch<T> {
    pub(crate) fn new(values: mpsc::UnboundedReceiver<T>, subscription: Subscription) -> Self {
        Self {
            values,
            _subscription: subscription,
        }
    }

    /// Wait for the next distinct value
    pub async fn recv(&mut self) -> Option<T> {
        self.values.recv().await
    }

    /// Next buffered value, if any
    pub fn try_recv(&mut self) -> Option<T> {
        self.values.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{counter_reducer, CounterAction, CounterState};
    use crate::Store;
    use pretty_assertions::assert_eq;

    fn recorder() -> (Rc<RefCell<Vec<i64>>>, impl FnMut(&i64) + 'static) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&values);
        (values, move |value: &i64| log.borrow_mut().push(*value))
    }

    #[test]
    fn test_select_emits_current_value_immediately() {
        let store = Store::new(counter_reducer, CounterState { counter: 5 });
        let (values, record) = recorder();

        let _subscription = store.select(|state| state.counter, record);

        assert_eq!(*values.borrow(), vec![5]);
    }

    #[test]
    fn test_select_deduplicates_equal_projections() {
        let store = Store::new(counter_reducer, CounterState::default());
        let (values, record) = recorder();
        let _subscription = store.select(|state| state.counter, record);

        store.dispatch(CounterAction::Reset);
        store.dispatch(CounterAction::Reset);
        assert_eq!(*values.borrow(), vec![0]);

        store.dispatch(CounterAction::Increment);
        store.dispatch(CounterAction::LoadCounterCompleted(1));
        store.dispatch(CounterAction::Reset);
        assert_eq!(*values.borrow(), vec![0, 1, 0]);
    }

    #[test]
    fn test_select_delivers_change_made_by_initial_emission() {
        let store = Store::new(counter_reducer, CounterState::default());
        let dispatcher = store.dispatcher();
        let values = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&values);

        let _subscription = store.select(
            |state| state.counter,
            move |value: &i64| {
                log.borrow_mut().push(*value);
                if *value == 0 {
                    dispatcher.dispatch(CounterAction::Increment);
                }
            },
        );

        assert_eq!(store.state().counter, 1);
        assert_eq!(*values.borrow(), vec![0, 1]);

        // Registered with the latest value, so later changes still arrive once
        store.dispatch(CounterAction::Increment);
        assert_eq!(*values.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_subscribe_sees_every_reduce() {
        let store = Store::new(counter_reducer, CounterState::default());
        let (values, mut record) = recorder();
        let _subscription = store.subscribe(move |state| record(&state.counter));

        store.dispatch(CounterAction::Reset);
        store.dispatch(CounterAction::Increment);

        assert_eq!(*values.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = Store::new(counter_reducer, CounterState::default());
        let (values, record) = recorder();
        let subscription = store.select(|state| state.counter, record);

        store.dispatch(CounterAction::Increment);
        subscription.unsubscribe();
        store.dispatch(CounterAction::Increment);

        assert_eq!(*values.borrow(), vec![0, 1]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_detached_subscription_stays_registered() {
        let store = Store::new(counter_reducer, CounterState::default());
        let (values, record) = recorder();
        store.select(|state| state.counter, record).detach();

        store.dispatch(CounterAction::Increment);

        assert_eq!(*values.borrow(), vec![0, 1]);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_observer_dispatch_delivers_latest_state() {
        let store = Store::new(counter_reducer, CounterState::default());
        let dispatcher = store.dispatcher();
        let _bump = store.subscribe(move |state: &CounterState| {
            if state.counter == 1 {
                dispatcher.dispatch(CounterAction::Increment);
            }
        });
        let (values, mut record) = recorder();
        let _record = store.subscribe(move |state| record(&state.counter));

        store.dispatch(CounterAction::Increment);

        assert_eq!(store.state().counter, 2);
        assert_eq!(*values.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_observer_can_unsubscribe_another() {
        let store = Store::new(counter_reducer, CounterState::default());
        let (values, mut record) = recorder();
        let second = store.subscribe(move |state| record(&state.counter));
        let slot = Rc::new(RefCell::new(Some(second)));
        let first_slot = Rc::clone(&slot);
        let _first = store.subscribe(move |_: &CounterState| {
            first_slot.borrow_mut().take();
        });

        store.dispatch(CounterAction::Increment);
        store.dispatch(CounterAction::Increment);

        // Registered before the unsubscribing observer, so it saw the first change
        assert_eq!(*values.borrow(), vec![1]);
        assert!(slot.borrow().is_none());
    }

    #[tokio::test]
    async fn test_watch_yields_distinct_values() {
        let store = Store::new(counter_reducer, CounterState::default());
        let mut counter = store.watch(|state| state.counter);

        assert_eq!(counter.recv().await, Some(0));

        store.dispatch(CounterAction::Reset);
        store.dispatch(CounterAction::Increment);
        store.dispatch(CounterAction::Increment);

        assert_eq!(counter.recv().await, Some(1));
        assert_eq!(counter.recv().await, Some(2));
        assert_eq!(counter.try_recv(), None);
    }

    #[tokio::test]
    async fn test_watch_ends_when_store_dropped() {
        let store = Store::new(counter_reducer, CounterState::default());
        let mut counter = store.watch(|state| state.counter);
        drop(store);

        assert_eq!(counter.recv().await, Some(0));
        assert_eq!(counter.recv().await, None);
    }
}
