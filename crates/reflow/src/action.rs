//! Actions and the value type accepted by `dispatch`

use crate::effect::{AsyncEffect, Effect};
use std::fmt;

/// Marker trait for values that can be dispatched to a [`Store`](crate::Store).
///
/// Actions describe an intent to change state. Reducers match on the variants
/// they know and return the state unchanged for everything else.
///
/// ```
/// use reflow::Action;
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
///     Reset,
/// }
///
/// impl Action for CounterAction {}
/// ```
pub trait Action: fmt::Debug + 'static {}

/// Everything that can enter the dispatch pipeline.
///
/// The builtin effect stage at the head of the pipeline runs the effect
/// variants itself and only forwards [`Dispatchable::Action`], so consumer
/// middleware and reducers never see an effect.
pub enum Dispatchable<S, A> {
    /// Plain action, forwarded through middleware to the reducer
    Action(A),
    /// Side effect executed synchronously during dispatch
    Effect(Effect<S, A>),
    /// Side effect scheduled as a task that may suspend
    AsyncEffect(AsyncEffect<S, A>),
}

impl<S, A: Action> From<A> for Dispatchable<S, A> {
    fn from(action: A) -> Self {
        Dispatchable::Action(action)
    }
}

impl<S, A> From<Effect<S, A>> for Dispatchable<S, A> {
    fn from(effect: Effect<S, A>) -> Self {
        Dispatchable::Effect(effect)
    }
}

impl<S, A> From<AsyncEffect<S, A>> for Dispatchable<S, A> {
    fn from(effect: AsyncEffect<S, A>) -> Self {
        Dispatchable::AsyncEffect(effect)
    }
}

impl<S, A: fmt::Debug> fmt::Debug for Dispatchable<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatchable::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Dispatchable::Effect(effect) => effect.fmt(f),
            Dispatchable::AsyncEffect(effect) => effect.fmt(f),
        }
    }
}
