//! Metrics collection.
//!
//! # Metrics
//! - `pacer_calls_total` (counter): calls made to a wrapper
//! - `pacer_invocations_total` (counter): callback executions, by edge
//! - `pacer_timers_cancelled_total` (counter): pending executions superseded
//!
//! All metrics carry a `wrapper` label (`debounce` or `throttle`).
//!
//! # Design Decisions
//! - No recorder is installed by the library; the host application decides
//!   whether and where to export
//! - Recording without a recorder is a no-op

/// Which side of a window an execution happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
}

impl Edge {
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Leading => "leading",
            Edge::Trailing => "trailing",
        }
    }
}

pub fn record_call(wrapper: &'static str) {
    metrics::counter!("pacer_calls_total", "wrapper" => wrapper).increment(1);
}

pub fn record_invocation(wrapper: &'static str, edge: Edge) {
    metrics::counter!(
        "pacer_invocations_total",
        "wrapper" => wrapper,
        "edge" => edge.as_str()
    )
    .increment(1);
}

pub fn record_timer_cancelled(wrapper: &'static str) {
    metrics::counter!("pacer_timers_cancelled_total", "wrapper" => wrapper).increment(1);
}
