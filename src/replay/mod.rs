//! Scenario replay.
//!
//! Plays a scenario's call trace through the configured wrapper on the tokio
//! timer and records every callback execution with its offset from the start
//! of the replay. Windows are measured with [`TokioClock`], so a replay on a
//! paused runtime is exact and instant.

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::schema::{ScenarioConfig, WrapperKind};
use crate::error::PacerError;
use crate::rate::{Debouncer, RateLimited, Throttler, TokioClock};

/// One callback execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub label: String,
    pub at_ms: u64,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub kind: WrapperKind,
    pub wait_ms: u64,
    pub calls: usize,
    pub invocations: Vec<Invocation>,
}

/// Build the wrapper a scenario describes around `action`.
pub fn build_wrapper<F>(
    config: &ScenarioConfig,
    action: F,
) -> Result<Box<dyn RateLimited<String>>, PacerError>
where
    F: Fn(String) + Send + Sync + 'static,
{
    let wrapper = &config.wrapper;
    let built: Box<dyn RateLimited<String>> = match wrapper.kind {
        WrapperKind::Debounce => Box::new(Debouncer::new(
            action,
            wrapper.wait(),
            wrapper.immediate(),
        )?),
        WrapperKind::Throttle => Box::new(Throttler::with_clock(
            action,
            wrapper.wait(),
            wrapper.throttle_options(),
            Arc::new(TokioClock::new()),
        )?),
    };
    Ok(built)
}

/// Replay the scenario and wait until no execution is pending.
///
/// A wrapper stays pending until its last timer callback has returned, so the
/// report is complete even when timers run on another worker thread.
pub async fn run_scenario(config: &ScenarioConfig) -> Result<ReplayReport, PacerError> {
    let start = Instant::now();
    let invocations = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&invocations);
    let wrapper = build_wrapper(config, move |label: String| {
        let at_ms = start.elapsed().as_millis() as u64;
        tracing::info!(label = %label, at_ms, "callback ran");
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation { label, at_ms });
    })?;

    let mut calls = config.calls.clone();
    calls.sort_by_key(|call| call.at_ms);

    tracing::info!(
        kind = %config.wrapper.kind,
        wait_ms = config.wrapper.wait_ms,
        calls = calls.len(),
        "Replaying scenario"
    );

    for call in &calls {
        tokio::time::sleep_until(start + Duration::from_millis(call.at_ms)).await;
        tracing::debug!(label = %call.label, at_ms = call.at_ms, "call");
        wrapper.call(call.label.clone());
    }

    let settle = config.wrapper.wait().max(Duration::from_millis(1));
    while wrapper.is_pending() {
        tokio::time::sleep(settle).await;
    }

    let invocations = std::mem::take(
        &mut *invocations.lock().unwrap_or_else(PoisonError::into_inner),
    );

    tracing::info!(invocations = invocations.len(), "Replay complete");

    Ok(ReplayReport {
        kind: config.wrapper.kind,
        wait_ms: config.wrapper.wait_ms,
        calls: calls.len(),
        invocations,
    })
}
