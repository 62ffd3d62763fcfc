//! Shared state, actions, reducers and middleware for the unit tests

use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::effect::{AsyncEffect, Effect};
use crate::middleware::{Middleware, Next};
use std::cell::RefCell;
use std::rc::Rc;

// Counter

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    pub counter: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Reset,
    LoadCounterCompleted(i64),
}

impl Action for CounterAction {}

pub type CounterEffect = Effect<CounterState, CounterAction>;
pub type CounterAsyncEffect = AsyncEffect<CounterState, CounterAction>;

pub fn counter_reducer(state: CounterState, action: &CounterAction) -> CounterState {
    match action {
        CounterAction::Increment => CounterState {
            counter: state.counter + 1,
        },
        CounterAction::Reset => CounterState { counter: 0 },
        CounterAction::LoadCounterCompleted(value) => CounterState { counter: *value },
    }
}

/// Re-dispatches every action before forwarding it, recursing without bound
pub struct RepeatMiddleware;

impl Middleware<CounterState, CounterAction> for RepeatMiddleware {
    fn handle(
        &self,
        dispatcher: &Dispatcher<CounterState, CounterAction>,
        action: CounterAction,
        next: &Next<CounterAction>,
    ) {
        dispatcher.dispatch(action.clone());
        next.run(action);
    }
}

// Route

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteState {
    pub path: String,
}

impl RouteState {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Set(String),
    SetIndex(usize),
}

impl Action for RouteAction {}

pub fn route_reducer(state: RouteState, action: &RouteAction) -> RouteState {
    match action {
        RouteAction::Set(path) => RouteState::new(path.clone()),
        RouteAction::SetIndex(_) => state,
    }
}

/// Appends `" {suffix}"` to every `Set` route
pub struct SuffixMiddleware {
    suffix: &'static str,
}

impl SuffixMiddleware {
    pub fn new(suffix: &'static str) -> Self {
        Self { suffix }
    }
}

impl Middleware<RouteState, RouteAction> for SuffixMiddleware {
    fn handle(
        &self,
        _dispatcher: &Dispatcher<RouteState, RouteAction>,
        action: RouteAction,
        next: &Next<RouteAction>,
    ) {
        match action {
            RouteAction::Set(path) => next.run(RouteAction::Set(format!("{} {}", path, self.suffix))),
            action => next.run(action),
        }
    }
}

/// Turns `SetIndex(n)` into a fresh dispatch of `Set(n)`
pub struct IndexMiddleware;

impl Middleware<RouteState, RouteAction> for IndexMiddleware {
    fn handle(
        &self,
        dispatcher: &Dispatcher<RouteState, RouteAction>,
        action: RouteAction,
        next: &Next<RouteAction>,
    ) {
        match action {
            RouteAction::SetIndex(index) => dispatcher.dispatch(RouteAction::Set(index.to_string())),
            action => next.run(action),
        }
    }
}

/// Replaces the action with `Set("BACK")` while the route is `FRONT`
pub struct FrontToBackMiddleware;

impl Middleware<RouteState, RouteAction> for FrontToBackMiddleware {
    fn handle(
        &self,
        dispatcher: &Dispatcher<RouteState, RouteAction>,
        action: RouteAction,
        next: &Next<RouteAction>,
    ) {
        if dispatcher.get_state().path == "FRONT" {
            next.run(RouteAction::Set("BACK".to_string()));
        } else {
            next.run(action);
        }
    }
}

/// Records every action it forwards
pub struct RecordingMiddleware<A> {
    seen: Rc<RefCell<Vec<A>>>,
}

impl<A> RecordingMiddleware<A> {
    pub fn new() -> Self {
        Self {
            seen: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn seen(&self) -> Rc<RefCell<Vec<A>>> {
        Rc::clone(&self.seen)
    }
}

impl<S, A: Clone> Middleware<S, A> for RecordingMiddleware<A> {
    fn handle(&self, _dispatcher: &Dispatcher<S, A>, action: A, next: &Next<A>) {
        self.seen.borrow_mut().push(action.clone());
        next.run(action);
    }
}

// App

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusState {
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: RouteState,
    pub status: StatusState,
    pub visits: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: RouteState::new("home"),
            status: StatusState { online: true },
            visits: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Navigate(String),
    SetOnline(bool),
    Noop,
}

impl Action for AppAction {}

pub fn status_reducer(state: StatusState, action: &AppAction) -> StatusState {
    match action {
        AppAction::SetOnline(online) => StatusState { online: *online },
        _ => state,
    }
}

pub fn app_route_reducer(state: RouteState, action: &AppAction) -> RouteState {
    match action {
        AppAction::Navigate(path) => RouteState::new(path.clone()),
        _ => state,
    }
}
