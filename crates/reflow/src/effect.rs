//! Effects - side-effecting logic dispatched like actions
//!
//! An effect never produces state itself. It receives the store's
//! [`Dispatcher`] and may read the latest state or dispatch further actions
//! (and further effects), which re-enter the pipeline from the top.

use crate::dispatcher::Dispatcher;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future that is not required to be `Send`
///
/// Async effects run on the store's thread, so they may hold `Rc` handles
/// such as the [`Dispatcher`] across suspension points.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Synchronous side effect
///
/// The block runs to completion inside `dispatch`. Actions it dispatches are
/// fully reduced before the block continues.
pub struct Effect<S, A> {
    block: Box<dyn FnOnce(&Dispatcher<S, A>)>,
}

impl<S, A> Effect<S, A> {
    pub fn new<F>(block: F) -> Self
    where
        F: FnOnce(&Dispatcher<S, A>) + 'static,
    {
        Self {
            block: Box::new(block),
        }
    }

    pub(crate) fn run(self, dispatcher: &Dispatcher<S, A>) {
        (self.block)(dispatcher)
    }
}

impl<S, A> fmt::Debug for Effect<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect").finish_non_exhaustive()
    }
}

/// Side effect that may suspend before completing
///
/// Dispatching it only schedules the task; `dispatch` returns before the
/// block starts. Dispatches issued by one task reach the reducer in the order
/// they are made. Two tasks are not ordered relative to each other.
///
/// The block receives an owned [`Dispatcher`] so it can keep it across
/// `.await` points. If the store is dropped while the task is suspended, the
/// dispatcher turns into a no-op.
///
/// With the default [`LocalSpawner`](crate::LocalSpawner) it must be
/// dispatched from within a `tokio::task::LocalSet`.
pub struct AsyncEffect<S, A> {
    block: Box<dyn FnOnce(Dispatcher<S, A>) -> LocalBoxFuture<'static, ()>>,
}

impl<S: 'static, A: 'static> AsyncEffect<S, A> {
    pub fn new<F, Fut>(block: F) -> Self
    where
        F: FnOnce(Dispatcher<S, A>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        Self {
            block: Box::new(
                move |dispatcher: Dispatcher<S, A>| -> LocalBoxFuture<'static, ()> {
                    Box::pin(block(dispatcher))
                },
            ),
        }
    }

    /// Build the task without polling it
    pub(crate) fn into_task(self, dispatcher: Dispatcher<S, A>) -> LocalBoxFuture<'static, ()> {
        (self.block)(dispatcher)
    }
}

impl<S, A> fmt::Debug for AsyncEffect<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncEffect").finish_non_exhaustive()
    }
}
