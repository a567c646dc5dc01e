//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Wrappers and the replay runner produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (call, invocation and cancellation counters)
//!
//! Consumers:
//!     → stderr (pacer binary)
//!     → whatever recorder/subscriber the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields over formatted strings
//! - Metrics are cheap (counter increments, no-op without a recorder)

pub mod logging;
pub mod metrics;
