//! Side effects for the counter demo

use crate::actions::CounterAction;
use crate::state::AppState;
use reflow::{AsyncEffect, Effect};
use std::time::Duration;

pub type CounterEffect = Effect<AppState, CounterAction>;
pub type CounterAsyncEffect = AsyncEffect<AppState, CounterAction>;

/// Reset the counter once it goes past `limit`
pub fn reset_when_above(limit: i64) -> CounterEffect {
    CounterEffect::new(move |dispatcher| {
        let value = dispatcher.get_state().counter.value;
        if value > limit {
            log::info!("Counter {} is above {}, resetting", value, limit);
            dispatcher.dispatch(CounterAction::Reset);
        }
    })
}

/// Simulate loading a saved counter value from slow storage
pub fn load_saved_counter(value: i64, latency: Duration) -> CounterAsyncEffect {
    CounterAsyncEffect::new(move |dispatcher| async move {
        dispatcher.dispatch(CounterAction::LoadStarted);
        tokio::time::sleep(latency).await;
        log::debug!("Loaded saved counter: {}", value);
        dispatcher.dispatch(CounterAction::LoadCompleted(value));
    })
}
