//! Dispatcher handed to middleware and effects
//!
//! When middleware or an effect needs to dispatch actions that should re-enter
//! the pipeline, it uses the Dispatcher. Actions dispatched here go through
//! the full chain again, starting at the builtin effect stage, and are
//! processed depth-first before `dispatch` returns.
//!
//! The Dispatcher only holds a weak reference to the store. Once the
//! [`Store`](crate::Store) is dropped, dispatching becomes a no-op and
//! [`Dispatcher::get_state`] falls back to the initial state.

use crate::action::{Action, Dispatchable};
use crate::store::StoreInner;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handle for dispatching actions and reading the latest state
pub struct Dispatcher<S, A> {
    store: Weak<StoreInner<S, A>>,
    initial_state: Rc<S>,
}

impl<S, A> Dispatcher<S, A> {
    pub(crate) fn new(store: Weak<StoreInner<S, A>>, initial_state: Rc<S>) -> Self {
        Self {
            store,
            initial_state,
        }
    }

    /// Whether the store behind this dispatcher still exists
    pub fn is_connected(&self) -> bool {
        self.store.strong_count() > 0
    }
}

impl<S: Clone + 'static, A: Action> Dispatcher<S, A> {
    /// Dispatch an action or effect through the store's pipeline
    pub fn dispatch(&self, action: impl Into<Dispatchable<S, A>>) {
        let action = action.into();
        match self.store.upgrade() {
            Some(store) => store.dispatch(action),
            None => log::debug!("Dispatcher: store dropped, ignoring {:?}", action),
        }
    }

    /// Latest state of the store, or the initial state once the store is gone
    pub fn get_state(&self) -> S {
        match self.store.upgrade() {
            Some(store) => store.state(),
            None => S::clone(&self.initial_state),
        }
    }
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            initial_state: Rc::clone(&self.initial_state),
        }
    }
}

impl<S, A> fmt::Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("connected", &self.is_connected())
            .finish()
    }
}
