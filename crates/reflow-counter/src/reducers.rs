//! Reducers for the counter demo
//!
//! Each slice of [`AppState`] has its own reducer. [`app_reducer`] lifts them
//! onto their fields and combines them.

use crate::actions::CounterAction;
use crate::state::{AppState, CounterState, LoadingState};
use reflow::{combine_reducers, lens, lift_to_field, Reducer};

pub fn reduce_counter(state: CounterState, action: &CounterAction) -> CounterState {
    match action {
        CounterAction::Increment => CounterState {
            value: state.value + 1,
        },
        CounterAction::Decrement => CounterState {
            value: state.value - 1,
        },
        CounterAction::Reset => CounterState::default(),
        CounterAction::LoadCompleted(value) => CounterState { value: *value },
        CounterAction::LoadStarted => state,
    }
}

pub fn reduce_loading(mut state: LoadingState, action: &CounterAction) -> LoadingState {
    match action {
        CounterAction::LoadStarted => {
            state.loading = true;
        }
        CounterAction::LoadCompleted(_) => {
            state.loading = false;
            state.loads_completed += 1;
        }
        _ => {}
    }
    state
}

pub fn reduce_history(mut history: Vec<String>, action: &CounterAction) -> Vec<String> {
    history.push(format!("{:?}", action));
    history
}

/// Root reducer combining every slice reducer
pub fn app_reducer() -> Reducer<AppState, CounterAction> {
    combine_reducers(vec![
        lift_to_field(lens!(AppState, counter), reduce_counter),
        lift_to_field(lens!(AppState, loading), reduce_loading),
        lift_to_field(lens!(AppState, history), reduce_history),
    ])
}
