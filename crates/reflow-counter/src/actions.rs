use reflow::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Reset,
    /// Saved value requested from storage
    LoadStarted,
    LoadCompleted(i64),
}

impl Action for CounterAction {}
