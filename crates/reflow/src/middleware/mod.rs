//! Middleware system
//!
//! Middleware sits between dispatch and reducer execution, allowing side
//! effects, logging, and other cross-cutting concerns to be handled in a
//! composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch → effect stage → m0 → m1 → ... → mN → reduce → subscribers
//! ```
//!
//! Each middleware can:
//! - Inspect the action and read the latest state
//! - Transform the action before forwarding it to `next`
//! - Block the action by never calling `next`
//! - Dispatch new actions, which re-enter the chain from the top
//!
//! The chain is folded right-to-left once, when the store is built. Earlier
//! entries wrap later ones, so list order is interception order.
//!
//! ## Example
//!
//! ```
//! use reflow::{Action, Dispatcher, Middleware, Next};
//!
//! #[derive(Debug)]
//! enum RouteAction {
//!     Set(String),
//! }
//!
//! impl Action for RouteAction {}
//!
//! struct UppercaseMiddleware;
//!
//! impl<S> Middleware<S, RouteAction> for UppercaseMiddleware {
//!     fn handle(
//!         &self,
//!         _dispatcher: &Dispatcher<S, RouteAction>,
//!         action: RouteAction,
//!         next: &Next<RouteAction>,
//!     ) {
//!         match action {
//!             RouteAction::Set(route) => next.run(RouteAction::Set(route.to_uppercase())),
//!         }
//!     }
//! }
//! ```

use crate::dispatcher::Dispatcher;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

// Module declarations
pub(crate) mod effect;
mod logging;

// Re-exports
pub use logging::LoggingMiddleware;

/// A single stage of the composed dispatch function
pub(crate) type Stage<A> = Rc<dyn Fn(A)>;

/// Middleware trait - intercepts actions before they reach the reducer
///
/// Middleware only ever sees plain actions. Effects are run by the builtin
/// effect stage before the chain is entered.
///
/// `handle` takes `&self` because a middleware may be re-entered while it is
/// still handling an action (when it dispatches). Stateful middleware keeps
/// its state behind a `Cell` or `RefCell`.
pub trait Middleware<S, A> {
    /// Handle an action
    ///
    /// - `dispatcher`: dispatches into the top of the pipeline, reads state
    /// - `action`: the action to process
    /// - `next`: the rest of the chain, ending in the reducer
    fn handle(&self, dispatcher: &Dispatcher<S, A>, action: A, next: &Next<A>);
}

/// The remainder of the pipeline after the current middleware
pub struct Next<A> {
    stage: Stage<A>,
}

impl<A> Next<A> {
    pub(crate) fn new(stage: Stage<A>) -> Self {
        Self { stage }
    }

    /// Forward an action to the next middleware, or to the reducer
    pub fn run(&self, action: A) {
        (self.stage)(action)
    }
}

impl<A> fmt::Debug for Next<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Middleware backed by a closure, see [`from_fn`]
pub struct FnMiddleware<F, S, A> {
    handler: F,
    _marker: PhantomData<fn(&Dispatcher<S, A>, A)>,
}

/// Create middleware from a closure
///
/// ```
/// use reflow::{middleware, Action, Dispatcher, Store};
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
///     Decrement,
/// }
///
/// impl Action for CounterAction {}
///
/// fn reducer(count: i32, action: &CounterAction) -> i32 {
///     match action {
///         CounterAction::Increment => count + 1,
///         CounterAction::Decrement => count - 1,
///     }
/// }
///
/// // Never let the counter go below zero
/// let floor = middleware::from_fn(|dispatcher: &Dispatcher<i32, CounterAction>, action, next| {
///     match action {
///         CounterAction::Decrement if dispatcher.get_state() == 0 => {}
///         action => next.run(action),
///     }
/// });
///
/// let store = Store::builder(reducer, 0).middleware(floor).build();
/// store.dispatch(CounterAction::Decrement);
/// assert_eq!(store.state(), 0);
/// ```
pub fn from_fn<S, A, F>(handler: F) -> FnMiddleware<F, S, A>
where
    F: Fn(&Dispatcher<S, A>, A, &Next<A>),
{
    FnMiddleware {
        handler,
        _marker: PhantomData,
    }
}

impl<S, A, F> Middleware<S, A> for FnMiddleware<F, S, A>
where
    F: Fn(&Dispatcher<S, A>, A, &Next<A>),
{
    fn handle(&self, dispatcher: &Dispatcher<S, A>, action: A, next: &Next<A>) {
        (self.handler)(dispatcher, action, next)
    }
}

/// Fold the middleware list right-to-left around the terminal stage
///
/// `[m0, m1, m2]` around `reduce` yields `m0(m1(m2(reduce)))`.
pub(crate) fn compose<S, A>(
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    dispatcher: &Dispatcher<S, A>,
    terminal: Stage<A>,
) -> Stage<A>
where
    S: 'static,
    A: 'static,
{
    middleware
        .into_iter()
        .rev()
        .fold(terminal, |next, middleware| {
            let dispatcher = dispatcher.clone();
            let next = Next::new(next);
            Rc::new(move |action: A| middleware.handle(&dispatcher, action, &next))
        })
}
