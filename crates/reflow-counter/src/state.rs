//! Application state for the counter demo

/// Counter value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    pub value: i64,
}

/// Tracks the simulated load of a saved counter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub loading: bool,
    pub loads_completed: u32,
}

/// Root state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub counter: CounterState,
    pub loading: LoadingState,
    /// Every action applied to the counter, oldest first
    pub history: Vec<String>,
}
