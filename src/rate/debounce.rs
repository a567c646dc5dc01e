//! Debouncing: collapse a burst of calls into one execution.
//!
//! Every call re-arms the wrapper's timer, so the callback runs once the
//! calls have stopped for `wait`. In immediate mode the first call of a burst
//! runs the callback right away and the timer only marks the end of the
//! burst.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;

use crate::error::PacerError;
use crate::observability::metrics::{self, Edge};
use crate::rate::timer::{TimerSlot, TimerToken};
use crate::rate::{Action, RateLimited};

const WRAPPER: &str = "debounce";

/// A debounced callback. Clones share the same timer and captured arguments.
pub struct Debouncer<A> {
    shared: Arc<Shared<A>>,
}

struct Shared<A> {
    action: Action<A>,
    wait: Duration,
    immediate: bool,
    state: Mutex<State<A>>,
}

struct State<A> {
    timer: TimerSlot,
    /// Arguments of the latest call, waiting for the timer. Always empty in
    /// immediate mode.
    pending_args: Option<A>,
}

impl<A: Send + 'static> Debouncer<A> {
    /// Wrap `action`, hosting timers on the current tokio runtime.
    pub fn new<F>(action: F, wait: Duration, immediate: bool) -> Result<Self, PacerError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Ok(Self::with_handle(Handle::try_current()?, action, wait, immediate))
    }

    /// Wrap `action`, hosting timers on the given runtime.
    pub fn with_handle<F>(runtime: Handle, action: F, wait: Duration, immediate: bool) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                action: Box::new(action),
                wait,
                immediate,
                state: Mutex::new(State {
                    timer: TimerSlot::new(runtime),
                    pending_args: None,
                }),
            }),
        }
    }

    /// Quiet period that must pass after the last call.
    pub fn wait(&self) -> Duration {
        self.shared.wait
    }

    /// Whether the first call of a burst runs right away.
    pub fn is_immediate(&self) -> bool {
        self.shared.immediate
    }

    /// Record a call. Returns once the timer is re-armed, or after the
    /// callback ran when this call opens a burst in immediate mode.
    pub fn call(&self, args: A) {
        metrics::record_call(WRAPPER);

        let run_now = {
            let mut state = self.shared.lock();
            let call_now = self.shared.immediate && !state.timer.is_armed();

            if state.timer.is_armed() {
                metrics::record_timer_cancelled(WRAPPER);
            }
            let shared = Arc::clone(&self.shared);
            state
                .timer
                .schedule(self.shared.wait, move |token| shared.fire(token));

            if self.shared.immediate {
                call_now.then_some(args)
            } else {
                state.pending_args = Some(args);
                None
            }
        };

        if let Some(args) = run_now {
            tracing::trace!(wait = ?self.shared.wait, "debounce leading call");
            metrics::record_invocation(WRAPPER, Edge::Leading);
            (self.shared.action)(args);
        }
    }

    /// Whether a timer is armed, or has fired and its callback is still
    /// running.
    pub fn is_pending(&self) -> bool {
        self.shared.lock().timer.is_pending()
    }
}

impl<A> Shared<A> {
    fn lock(&self) -> MutexGuard<'_, State<A>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fire(&self, token: TimerToken) {
        let args = {
            let mut state = self.lock();
            if !state.timer.claim(token) {
                return;
            }
            state.pending_args.take()
        };
        let _running = Running(self);

        match args {
            Some(args) => {
                tracing::trace!(wait = ?self.wait, "debounce quiet period elapsed");
                metrics::record_invocation(WRAPPER, Edge::Trailing);
                (self.action)(args);
            }
            None => tracing::trace!("debounce burst ended"),
        }
    }
}

/// Ends a claimed firing once its callback returns or unwinds.
struct Running<'a, A>(&'a Shared<A>);

impl<A> Drop for Running<'_, A> {
    fn drop(&mut self) {
        self.0.lock().timer.finish();
    }
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.shared.wait)
            .field("immediate", &self.shared.immediate)
            .finish_non_exhaustive()
    }
}

impl<A: Send + 'static> RateLimited<A> for Debouncer<A> {
    fn call(&self, args: A) {
        Debouncer::call(self, args);
    }

    fn is_pending(&self) -> bool {
        Debouncer::is_pending(self)
    }
}

/// Wrap `action` so bursts of calls collapse into one execution.
///
/// With `immediate` the execution happens on the first call of a burst;
/// otherwise `wait` after the last one, with the last call's arguments.
pub fn debounce<A, F>(
    action: F,
    wait: Duration,
    immediate: bool,
) -> Result<Debouncer<A>, PacerError>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debouncer::new(action, wait, immediate)
}
