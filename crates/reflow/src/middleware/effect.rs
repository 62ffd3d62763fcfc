//! Builtin effect stage - always the head of the pipeline
//!
//! Routes the three shapes of [`Dispatchable`]:
//! - `Effect` runs immediately with the store's dispatcher
//! - `AsyncEffect` is handed to the effect runner as a task
//! - `Action` is forwarded unchanged to the consumer middleware chain

use super::Next;
use crate::action::Dispatchable;
use crate::dispatcher::Dispatcher;
use crate::spawn::EffectRunner;

pub(crate) struct EffectMiddleware<S, A> {
    dispatcher: Dispatcher<S, A>,
    runner: EffectRunner,
    next: Next<A>,
}

impl<S, A> EffectMiddleware<S, A> {
    pub(crate) fn new(dispatcher: Dispatcher<S, A>, runner: EffectRunner, next: Next<A>) -> Self {
        Self {
            dispatcher,
            runner,
            next,
        }
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher<S, A> {
        &self.dispatcher
    }
}

impl<S: 'static, A: 'static> EffectMiddleware<S, A> {
    pub(crate) fn handle(&self, action: Dispatchable<S, A>) {
        match action {
            Dispatchable::Action(action) => self.next.run(action),
            Dispatchable::Effect(effect) => effect.run(&self.dispatcher),
            Dispatchable::AsyncEffect(effect) => {
                log::trace!("Scheduling async effect");
                self.runner.spawn(effect.into_task(self.dispatcher.clone()));
            }
        }
    }
}
