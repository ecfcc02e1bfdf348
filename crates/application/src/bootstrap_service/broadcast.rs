//! One-shot terminal-state broadcast.

use bootgate_core::{BootstrapSnapshot, BootstrapState};
use parking_lot::Mutex;

type Subscriber = Box<dyn FnOnce(BootstrapState) + Send>;

/// Guards the state/current-task pair together with the queued subscribers.
///
/// A registration racing the terminal transition either lands in the queue
/// before the flush or observes the terminal value and fires immediately;
/// it is never dropped. Callbacks run after the lock is released, so a
/// callback may re-enter `subscribe` without deadlocking.
pub(crate) struct StateBroadcast {
    inner: Mutex<Inner>,
}

struct Inner {
    state: BootstrapState,
    current_task: Option<String>,
    subscribers: Vec<Subscriber>,
}

impl StateBroadcast {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BootstrapState::InProgress,
                current_task: None,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.inner.lock().state
    }

    pub fn current_task(&self) -> Option<String> {
        self.inner.lock().current_task.clone()
    }

    pub fn snapshot(&self) -> BootstrapSnapshot {
        let inner = self.inner.lock();
        BootstrapSnapshot {
            state: inner.state,
            current_task: inner.current_task.clone(),
        }
    }

    /// Records the step currently executing. Only the execution routine
    /// calls this, and only while the state is `InProgress`.
    pub fn set_current_task(&self, name: Option<String>) {
        self.inner.lock().current_task = name;
    }

    /// Registers a one-shot callback for the terminal state.
    ///
    /// Fires immediately on the caller when the state is already terminal;
    /// otherwise the callback is queued and fired by the transition.
    pub fn subscribe(&self, callback: impl FnOnce(BootstrapState) + Send + 'static) {
        let state = {
            let mut inner = self.inner.lock();
            if !inner.state.is_terminal() {
                inner.subscribers.push(Box::new(callback));
                return;
            }
            inner.state
        };
        callback(state);
    }

    /// Performs the single terminal transition, clears the current task, and
    /// flushes every queued subscriber with the terminal value.
    ///
    /// Panics on a second terminal transition: the execution routine is the
    /// only writer and runs exactly once, so reaching that panic means the
    /// single-routine invariant was broken.
    pub fn transition(&self, state: BootstrapState) {
        debug_assert!(state.is_terminal());
        let subscribers = {
            let mut inner = self.inner.lock();
            if inner.state.is_terminal() {
                panic!(
                    "bootstrap terminal state already set to {}, refusing transition to {}",
                    inner.state, state
                );
            }
            inner.state = state;
            inner.current_task = None;
            std::mem::take(&mut inner.subscribers)
        };
        for subscriber in subscribers {
            subscriber(state);
        }
    }
}
