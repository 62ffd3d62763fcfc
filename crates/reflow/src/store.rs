//! Store - holds application state and runs the dispatch pipeline
//!
//! ```text
//! dispatch(x) → effect stage → middleware chain → reduce → subscribers
//! ```
//!
//! The pipeline is composed once, at construction. Every stage and every
//! [`Dispatcher`] holds only a weak reference back to the store, so dropping
//! the [`Store`] tears the pipeline down and turns outstanding dispatchers
//! into no-ops.
//!
//! The store lives on one thread. It is `!Send`, async effects are spawned
//! as local tasks, and re-entrant dispatch is processed depth-first without
//! any locking.

use crate::action::{Action, Dispatchable};
use crate::config::StoreOptions;
use crate::diagnostics::{DiagnosticSink, Diagnostics, Violation};
use crate::dispatcher::Dispatcher;
use crate::middleware::effect::EffectMiddleware;
use crate::middleware::{compose, Middleware, Next, Stage};
use crate::spawn::{EffectRunner, LocalSpawner, Spawn};
use crate::subscription::{Subscribers, Subscription, Watch};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};
use tokio::sync::mpsc;

/// Store - single owner of the state and the only place the reducer runs
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

pub(crate) struct StoreInner<S, A> {
    state: RefCell<S>,
    version: Cell<u64>,
    reducer: Box<dyn Fn(S, &A) -> S>,
    pipeline: EffectMiddleware<S, A>,
    effects: EffectRunner,
    subscribers: Rc<Subscribers<S>>,
    diagnostics: Diagnostics,
    max_dispatch_depth: Option<usize>,
    depth: Cell<usize>,
    reducing: Cell<bool>,
}

impl<S: Clone + 'static, A: Action> Store<S, A> {
    /// Create a store without middleware
    pub fn new(reducer: impl Fn(S, &A) -> S + 'static, initial_state: S) -> Self {
        Self::builder(reducer, initial_state).build()
    }

    /// Create a store with an ordered middleware chain
    ///
    /// The first middleware in the list sees each action first.
    pub fn with_middleware(
        reducer: impl Fn(S, &A) -> S + 'static,
        initial_state: S,
        middleware: Vec<Box<dyn Middleware<S, A>>>,
    ) -> Self {
        Self::builder(reducer, initial_state)
            .middlewares(middleware)
            .build()
    }

    pub fn builder(
        reducer: impl Fn(S, &A) -> S + 'static,
        initial_state: S,
    ) -> StoreBuilder<S, A> {
        StoreBuilder::new(Box::new(reducer), initial_state)
    }

    /// Process an action or effect through the middleware chain and reducer
    ///
    /// For plain actions the state is updated before this returns.
    ///
    /// # Panics
    ///
    /// With the default [`LocalSpawner`], dispatching an [`AsyncEffect`](crate::AsyncEffect)
    /// outside a `tokio::task::LocalSet` panics. Install another spawner with
    /// [`StoreBuilder::spawner`] to run effects elsewhere.
    pub fn dispatch(&self, action: impl Into<Dispatchable<S, A>>) {
        self.inner.dispatch(action.into());
    }

    /// Get a copy of the current state
    pub fn state(&self) -> S {
        self.inner.state()
    }

    /// Get a dispatcher that can outlive borrows of the store
    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        self.inner.pipeline.dispatcher().clone()
    }

    /// Observe the whole state after every reduce
    pub fn subscribe(&self, observer: impl FnMut(&S) + 'static) -> Subscription {
        self.inner.subscribers.insert(Box::new(observer))
    }

    /// Observe a projection of the state
    ///
    /// `observer` is called with the current projection right away, then
    /// again whenever a reduce produces a projection different from the last
    /// one delivered.
    pub fn select<T, P, O>(&self, projection: P, mut observer: O) -> Subscription
    where
        T: PartialEq + 'static,
        P: Fn(&S) -> T + 'static,
        O: FnMut(&T) + 'static,
    {
        let mut last = projection(&self.inner.state.borrow());
        observer(&last);
        // The observer may have dispatched before it is registered
        loop {
            let current = projection(&self.inner.state.borrow());
            if current == last {
                break;
            }
            observer(&current);
            last = current;
        }
        self.subscribe(move |state| {
            let value = projection(state);
            if value != last {
                observer(&value);
                last = value;
            }
        })
    }

    /// Awaitable variant of [`Store::select`]
    ///
    /// Each call starts a fresh sequence beginning with the current value.
    pub fn watch<T, P>(&self, projection: P) -> Watch<T>
    where
        T: PartialEq + Clone + 'static,
        P: Fn(&S) -> T + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.select(projection, move |value: &T| {
            // Receiver gone means the Watch is being dropped along with this subscription
            let _ = tx.send(value.clone());
        });
        Watch::new(rx, subscription)
    }

    /// Resolves once every async effect dispatched so far has completed
    ///
    /// Effects spawned by those effects are waited for as well. The returned
    /// future does not keep the store alive.
    pub fn settled(&self) -> impl Future<Output = ()> + 'static {
        self.inner.effects.settled()
    }

    /// Number of async effects spawned but not yet completed
    pub fn pending_effects(&self) -> usize {
        self.inner.effects.pending()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl<S, A> fmt::Debug for Store<S, A>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state)
            .field("pending_effects", &self.inner.effects.pending())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}

impl<S: Clone + 'static, A: Action> StoreInner<S, A> {
    pub(crate) fn state(&self) -> S {
        self.state.borrow().clone()
    }

    pub(crate) fn dispatch(&self, action: Dispatchable<S, A>) {
        let depth = self.depth.get() + 1;
        if let Some(limit) = self.max_dispatch_depth {
            if depth > limit {
                log::error!(
                    "Dispatch depth {} exceeds limit {}, dropping {:?}",
                    depth,
                    limit,
                    action
                );
                self.diagnostics
                    .report(Violation::DispatchDepthExceeded { depth, limit });
                return;
            }
        }

        let _depth = CellGuard::set(&self.depth, depth);
        self.pipeline.handle(action);
    }

    /// Terminal stage: run the reducer and publish the new state
    fn reduce(&self, action: &A) {
        if self.reducing.get() && self.diagnostics.is_enabled() {
            self.diagnostics.report(Violation::ReentrantReduce {
                action: format!("{:?}", action),
            });
        }

        let next = {
            let _reducing = CellGuard::set(&self.reducing, true);
            let current = self.state.borrow().clone();
            (self.reducer)(current, action)
        };
        *self.state.borrow_mut() = next;
        self.version.set(self.version.get() + 1);

        self.subscribers
            .notify(|| self.version.get(), || self.state.borrow().clone());
    }
}

/// Sets a cell for the lifetime of the guard and restores the previous value,
/// also when unwinding out of consumer code.
struct CellGuard<'a, T: Copy> {
    cell: &'a Cell<T>,
    previous: T,
}

impl<'a, T: Copy> CellGuard<'a, T> {
    fn set(cell: &'a Cell<T>, value: T) -> Self {
        let previous = cell.replace(value);
        Self { cell, previous }
    }
}

impl<T: Copy> Drop for CellGuard<'_, T> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}

/// Builder for a [`Store`] with middleware, options, a custom spawner or a
/// diagnostics sink
pub struct StoreBuilder<S, A> {
    reducer: Box<dyn Fn(S, &A) -> S>,
    initial_state: S,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    options: StoreOptions,
    spawner: Rc<dyn Spawn>,
    diagnostic_sink: Option<DiagnosticSink>,
}

impl<S: Clone + 'static, A: Action> StoreBuilder<S, A> {
    fn new(reducer: Box<dyn Fn(S, &A) -> S>, initial_state: S) -> Self {
        Self {
            reducer,
            initial_state,
            middleware: Vec::new(),
            options: StoreOptions::default(),
            spawner: Rc::new(LocalSpawner),
            diagnostic_sink: None,
        }
    }

    /// Append middleware to the chain
    ///
    /// Middleware is called in the order it was added.
    pub fn middleware(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Append several middleware to the chain, keeping their order
    pub fn middlewares(mut self, middleware: Vec<Box<dyn Middleware<S, A>>>) -> Self {
        self.middleware.extend(middleware);
        self
    }

    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the default [`LocalSpawner`] used for async effects
    pub fn spawner(mut self, spawner: impl Spawn + 'static) -> Self {
        self.spawner = Rc::new(spawner);
        self
    }

    /// Receive violations instead of having them logged
    ///
    /// Only called when `StoreOptions::diagnostics` is enabled.
    pub fn diagnostics(mut self, sink: impl Fn(&Violation) + 'static) -> Self {
        self.diagnostic_sink = Some(Rc::new(sink));
        self
    }

    pub fn build(self) -> Store<S, A> {
        let Self {
            reducer,
            initial_state,
            middleware,
            options,
            spawner,
            diagnostic_sink,
        } = self;

        log::debug!(
            "Building store with {} middleware, options: {:?}",
            middleware.len(),
            options
        );

        let inner = Rc::new_cyclic(|store: &Weak<StoreInner<S, A>>| {
            let dispatcher = Dispatcher::new(store.clone(), Rc::new(initial_state.clone()));

            let terminal: Stage<A> = {
                let store = store.clone();
                Rc::new(move |action: A| {
                    if let Some(store) = store.upgrade() {
                        store.reduce(&action);
                    }
                })
            };
            let chain = compose(middleware, &dispatcher, terminal);
            let effects = EffectRunner::new(spawner);

            StoreInner {
                state: RefCell::new(initial_state),
                version: Cell::new(0),
                reducer,
                pipeline: EffectMiddleware::new(dispatcher, effects.clone(), Next::new(chain)),
                effects,
                subscribers: Subscribers::new(),
                diagnostics: Diagnostics::new(options.diagnostics, diagnostic_sink),
                max_dispatch_depth: options.max_dispatch_depth,
                depth: Cell::new(0),
                reducing: Cell::new(false),
            }
        });

        Store { inner }
    }
}
