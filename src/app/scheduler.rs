//! Deferred turns
//!
//! Work that must run after the current event has finished dispatching
//! (overlay activation) is queued here and drained by the session once the
//! handler returns. Tasks queued while draining run on the following turn.

use std::collections::VecDeque;

pub type DeferredTask<C> = Box<dyn FnOnce(&mut C)>;

pub struct TurnQueue<C> {
    tasks: VecDeque<DeferredTask<C>>,
}

impl<C> TurnQueue<C> {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Run `task` after the current event dispatch completes
    pub fn defer(&mut self, task: impl FnOnce(&mut C) + 'static) {
        self.tasks.push_back(Box::new(task));
    }

    /// Take every task queued so far, leaving the queue empty for the next turn
    pub fn take_turn(&mut self) -> VecDeque<DeferredTask<C>> {
        std::mem::take(&mut self.tasks)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl<C> Default for TurnQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
