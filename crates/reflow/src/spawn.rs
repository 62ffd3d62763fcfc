//! Scheduling of async effect tasks
//!
//! The store does not own a runtime. Async effects are handed to a [`Spawn`]
//! implementation, by default [`LocalSpawner`], which puts them on the
//! current thread's `tokio::task::LocalSet`. Tasks therefore resume on the
//! store's thread and can call back into its [`Dispatcher`](crate::Dispatcher)
//! directly.

use crate::effect::LocalBoxFuture;
use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use tokio::sync::Notify;

/// Runs async effect tasks on the store's thread
pub trait Spawn {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Spawns tasks with [`tokio::task::spawn_local`]
///
/// Dispatching an async effect with this spawner must happen inside a
/// `LocalSet` context, otherwise tokio panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSpawner;

impl Spawn for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

/// Number of async effects that have been spawned but not finished
#[derive(Default)]
struct InFlight {
    count: Cell<usize>,
    idle: Notify,
}

/// Decrements the in-flight count when the task finishes or is dropped
struct InFlightGuard(Rc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let remaining = self.0.count.get() - 1;
        self.0.count.set(remaining);
        if remaining == 0 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Spawns async effects and tracks them until they settle
#[derive(Clone)]
pub(crate) struct EffectRunner {
    spawner: Rc<dyn Spawn>,
    in_flight: Rc<InFlight>,
}

impl EffectRunner {
    pub(crate) fn new(spawner: Rc<dyn Spawn>) -> Self {
        Self {
            spawner,
            in_flight: Rc::new(InFlight::default()),
        }
    }

    pub(crate) fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.in_flight.count.set(self.in_flight.count.get() + 1);
        let guard = InFlightGuard(Rc::clone(&self.in_flight));
        self.spawner.spawn(Box::pin(async move {
            let _guard = guard;
            task.await;
        }));
    }

    pub(crate) fn pending(&self) -> usize {
        self.in_flight.count.get()
    }

    /// Resolves once no task is in flight
    ///
    /// Tasks spawned by other tasks before the count reaches zero are waited
    /// for as well.
    pub(crate) fn settled(&self) -> impl Future<Output = ()> + 'static {
        let in_flight = Rc::clone(&self.in_flight);
        async move {
            loop {
                let idle = in_flight.idle.notified();
                if in_flight.count.get() == 0 {
                    return;
                }
                idle.await;
            }
        }
    }
}

impl fmt::Debug for EffectRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRunner")
            .field("pending", &self.pending())
            .finish()
    }
}
