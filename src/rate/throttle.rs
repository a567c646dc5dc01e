//! Throttling: at most one execution per window.
//!
//! # Algorithm
//! ```text
//! call(args) at `now`:
//!     previous unset && !leading      → previous = now
//!     remaining = wait - (now - previous)
//!     previous unset
//!       || remaining <= 0
//!       || remaining > wait           → cancel trailing, previous = now, run(args)
//!     otherwise                       → keep args as latest;
//!                                       arm trailing for `remaining` if none
//!                                       is armed and trailing is enabled
//!
//! trailing fires:
//!     previous = leading ? now : unset
//!     run(latest args)
//! ```
//!
//! `remaining > wait` only happens when the clock went backwards; the call is
//! treated as opening a fresh window.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;

use crate::error::PacerError;
use crate::observability::metrics::{self, Edge};
use crate::rate::clock::{Clock, SystemClock};
use crate::rate::timer::{TimerSlot, TimerToken};
use crate::rate::{Action, RateLimited};

const WRAPPER: &str = "throttle";

/// Which window edges may execute the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleOptions {
    /// Run on the first call of a window.
    pub leading: bool,
    /// Run at the end of a window with the latest arguments.
    pub trailing: bool,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

/// A throttled callback. Clones share the same window and timer.
pub struct Throttler<A> {
    shared: Arc<Shared<A>>,
}

struct Shared<A> {
    action: Action<A>,
    wait: Duration,
    wait_ms: i64,
    options: ThrottleOptions,
    clock: Arc<dyn Clock>,
    state: Mutex<State<A>>,
}

struct State<A> {
    timer: TimerSlot,
    /// When the current window opened. `None` before the first execution,
    /// and after a trailing execution when leading is disabled.
    previous: Option<i64>,
    latest_args: Option<A>,
}

impl<A: Send + 'static> Throttler<A> {
    /// Wrap `action` using the wall clock and the current tokio runtime.
    pub fn new<F>(action: F, wait: Duration, options: ThrottleOptions) -> Result<Self, PacerError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::with_clock(action, wait, options, Arc::new(SystemClock))
    }

    /// Wrap `action` measuring windows with `clock`.
    pub fn with_clock<F>(
        action: F,
        wait: Duration,
        options: ThrottleOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PacerError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        let runtime = Handle::try_current()?;
        Ok(Self::with_handle(runtime, action, wait, options, clock))
    }

    /// Wrap `action` hosting timers on `runtime`.
    pub fn with_handle<F>(
        runtime: Handle,
        action: F,
        wait: Duration,
        options: ThrottleOptions,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                action: Box::new(action),
                wait,
                wait_ms: i64::try_from(wait.as_millis()).unwrap_or(i64::MAX),
                options,
                clock,
                state: Mutex::new(State {
                    timer: TimerSlot::new(runtime),
                    previous: None,
                    latest_args: None,
                }),
            }),
        }
    }

    /// Window length.
    pub fn wait(&self) -> Duration {
        self.shared.wait
    }

    /// Edges allowed to run the callback.
    pub fn options(&self) -> ThrottleOptions {
        self.shared.options
    }

    /// Record a call, running the callback synchronously when it opens a
    /// new window.
    pub fn call(&self, args: A) {
        metrics::record_call(WRAPPER);
        let shared = &self.shared;
        let now = shared.clock.now_millis();

        let run_now = {
            let mut state = shared.lock();
            if state.previous.is_none() && !shared.options.leading {
                state.previous = Some(now);
            }

            let remaining = state
                .previous
                .map(|previous| shared.wait_ms.saturating_sub(now.saturating_sub(previous)));

            match remaining {
                Some(remaining) if remaining > 0 && remaining <= shared.wait_ms => {
                    if shared.options.trailing {
                        state.latest_args = Some(args);
                        if !state.timer.is_armed() {
                            tracing::trace!(
                                remaining_ms = remaining,
                                "throttle arming trailing call"
                            );
                            let delay = Duration::from_millis(remaining as u64);
                            let fire_with = Arc::clone(shared);
                            state.timer.schedule(delay, move |token| fire_with.fire(token));
                        }
                    }
                    None
                }
                _ => {
                    if let Some(remaining) = remaining.filter(|r| *r > shared.wait_ms) {
                        tracing::debug!(
                            remaining_ms = remaining,
                            "clock moved backwards, opening new window"
                        );
                    }
                    if state.timer.cancel() {
                        metrics::record_timer_cancelled(WRAPPER);
                    }
                    state.previous = Some(now);
                    state.latest_args = None;
                    Some(args)
                }
            }
        };

        if let Some(args) = run_now {
            metrics::record_invocation(WRAPPER, Edge::Leading);
            (shared.action)(args);
        }
    }

    /// Whether a trailing call is armed, or has fired and its callback is
    /// still running.
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
            state.previous = if self.options.leading {
                Some(self.clock.now_millis())
            } else {
                None
            };
            state.latest_args.take()
        };
        let _running = Running(self);

        if let Some(args) = args {
            tracing::trace!(wait = ?self.wait, "throttle trailing call");
            metrics::record_invocation(WRAPPER, Edge::Trailing);
            (self.action)(args);
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

impl<A> Clone for Throttler<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> std::fmt::Debug for Throttler<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttler")
            .field("wait", &self.shared.wait)
            .field("options", &self.shared.options)
            .finish_non_exhaustive()
    }
}

impl<A: Send + 'static> RateLimited<A> for Throttler<A> {
    fn call(&self, args: A) {
        Throttler::call(self, args);
    }

    fn is_pending(&self) -> bool {
        Throttler::is_pending(self)
    }
}

/// Wrap `action` so it runs at most once per `wait`.
pub fn throttle<A, F>(
    action: F,
    wait: Duration,
    options: ThrottleOptions,
) -> Result<Throttler<A>, PacerError>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Throttler::new(action, wait, options)
}
