//! Shared utilities for integration tests.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Records every callback execution with its offset from creation.
#[derive(Clone)]
#[allow(dead_code)]
pub struct Recorder<A> {
    start: Instant,
    seen: Arc<Mutex<Vec<(A, u64)>>>,
}

#[allow(dead_code)]
impl<A: Clone + Send + 'static> Recorder<A> {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A callback that appends to this recorder.
    pub fn action(&self) -> impl Fn(A) + Send + Sync + 'static {
        let start = self.start;
        let seen = self.seen.clone();
        move |args| {
            let at = start.elapsed().as_millis() as u64;
            seen.lock().unwrap().push((args, at));
        }
    }

    pub fn seen(&self) -> Vec<(A, u64)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

/// Sleep until `at_ms` after `start`.
#[allow(dead_code)]
pub async fn at(start: Instant, at_ms: u64) {
    tokio::time::sleep_until(start + Duration::from_millis(at_ms)).await;
}

/// Write a scenario to a temporary TOML file.
#[allow(dead_code)]
pub fn scenario_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
