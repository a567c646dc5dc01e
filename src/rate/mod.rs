//! Call-rate shaping subsystem.
//!
//! # Data Flow
//! ```text
//! caller → wrapper.call(args)
//!     → debounce.rs: re-arm timer, keep latest args (or run now in immediate mode)
//!     → throttle.rs: clock.rs reading decides run now / arm trailing / drop
//!     → timer.rs: single-shot tokio task, claimed under the wrapper lock
//!     → user callback (never invoked while the wrapper lock is held)
//! ```
//!
//! # Design Decisions
//! - One mutex per wrapper instance; nothing is shared between instances
//! - Cancellation is token based, so a replaced timer can never fire late
//! - Callback panics are not caught
//! - Dropping a wrapper leaves a pending execution to run as scheduled

pub mod clock;
pub mod debounce;
pub mod throttle;
pub(crate) mod timer;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use debounce::{debounce, Debouncer};
pub use throttle::{throttle, ThrottleOptions, Throttler};

/// Boxed user callback. The argument carries everything the call site wants
/// forwarded, receiver included.
pub(crate) type Action<A> = Box<dyn Fn(A) + Send + Sync + 'static>;

/// Common surface of the rate-shaping wrappers.
pub trait RateLimited<A>: Send + Sync {
    /// Submit a call. Whether and when the callback runs is up to the wrapper.
    fn call(&self, args: A);

    /// Whether an execution is scheduled, or a timer callback is still running.
    fn is_pending(&self) -> bool;
}
