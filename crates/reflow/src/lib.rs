//! Reflow - a unidirectional state container
//!
//! Application state lives in a single [`Store`]. It changes only when an
//! action is dispatched and a pure reducer computes the next state from the
//! current one:
//!
//! ```text
//! dispatch(action) → middleware chain → reducer → subscribers
//! ```
//!
//! Side effects are dispatched like actions. A synchronous [`Effect`] runs
//! inside `dispatch`, an [`AsyncEffect`] is scheduled as a local task. Both
//! receive a [`Dispatcher`] to read the latest state and dispatch further
//! actions.
//!
//! ```
//! use reflow::{Action, Dispatcher, Effect, Store};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct CounterState {
//!     counter: i64,
//! }
//!
//! #[derive(Debug)]
//! enum CounterAction {
//!     Increment,
//!     Loaded(i64),
//! }
//!
//! impl Action for CounterAction {}
//!
//! fn reducer(state: CounterState, action: &CounterAction) -> CounterState {
//!     match action {
//!         CounterAction::Increment => CounterState {
//!             counter: state.counter + 1,
//!         },
//!         CounterAction::Loaded(value) => CounterState { counter: *value },
//!     }
//! }
//!
//! let store = Store::new(reducer, CounterState::default());
//! store.dispatch(CounterAction::Increment);
//! store.dispatch(Effect::new(|dispatcher: &Dispatcher<CounterState, CounterAction>| {
//!     let doubled = dispatcher.get_state().counter * 2;
//!     dispatcher.dispatch(CounterAction::Loaded(doubled));
//! }));
//!
//! assert_eq!(store.state().counter, 2);
//! ```

mod action;
mod config;
mod diagnostics;
mod dispatcher;
mod effect;
pub mod middleware;
mod reducer;
mod spawn;
mod store;
mod subscription;

#[cfg(test)]
mod mocks;

pub use action::{Action, Dispatchable};
pub use config::{load_config_file, ConfigError, StoreOptions};
pub use diagnostics::{DiagnosticSink, Violation};
pub use dispatcher::Dispatcher;
pub use effect::{AsyncEffect, Effect, LocalBoxFuture};
pub use middleware::{LoggingMiddleware, Middleware, Next};
pub use reducer::{combine_reducers, lift_to_field, Lens, Reducer};
pub use spawn::{LocalSpawner, Spawn};
pub use store::{Store, StoreBuilder};
pub use subscription::{Subscription, Watch};
