//! LoggingMiddleware - logs all actions for debugging

use super::{Middleware, Next};
use crate::action::Action;
use crate::dispatcher::Dispatcher;

/// LoggingMiddleware - logs every action that passes through the chain
///
/// Place it first to see actions as dispatched, or last to see them as the
/// reducer will receive them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn handle(&self, _dispatcher: &Dispatcher<S, A>, action: A, next: &Next<A>) {
        log::debug!("Action: {:?}", action);
        // Always continue to next middleware
        next.run(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{counter_reducer, CounterAction, CounterState};
    use crate::Store;

    #[test]
    fn test_logging_middleware_passes_actions_through() {
        let store = Store::builder(counter_reducer, CounterState::default())
            .middleware(LoggingMiddleware::new())
            .build();

        store.dispatch(CounterAction::Increment);
        store.dispatch(CounterAction::Increment);

        assert_eq!(store.state().counter, 2);
    }
}
