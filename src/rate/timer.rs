//! Single-shot cancellable timer owned by one wrapper.
//!
//! The slot lives inside the wrapper's mutex-guarded state. A fired task must
//! `claim` its token under that same lock before doing anything, so a timer
//! that was cancelled or replaced never runs its callback, even when its task
//! had already woken up.
//!
//! A claimed firing counts as running until the owner calls `finish`, so
//! `is_pending` covers the gap between the claim and the callback returning.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Identifies one arming of a [`TimerSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

pub(crate) struct TimerSlot {
    runtime: Handle,
    generation: u64,
    armed: Option<JoinHandle<()>>,
    running: usize,
}

impl TimerSlot {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            generation: 0,
            armed: None,
            running: 0,
        }
    }

    /// Whether a timer is armed and has not fired yet.
    pub(crate) fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Armed, or fired with its callback still running.
    pub(crate) fn is_pending(&self) -> bool {
        self.is_armed() || self.running > 0
    }

    /// Arm the slot, replacing whatever was armed before.
    ///
    /// `on_fire` runs on the runtime once `delay` has elapsed and receives the
    /// token it must claim.
    pub(crate) fn schedule<F>(&mut self, delay: Duration, on_fire: F) -> TimerToken
    where
        F: FnOnce(TimerToken) + Send + 'static,
    {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(token);
        });
        self.armed = Some(task);
        token
    }

    /// Disarm the slot. Returns whether a timer was armed.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(task) => {
                task.abort();
                self.generation = self.generation.wrapping_add(1);
                true
            }
            None => false,
        }
    }

    /// Take ownership of a firing. Succeeds only for the currently armed token.
    pub(crate) fn claim(&mut self, token: TimerToken) -> bool {
        if self.armed.is_some() && self.generation == token.0 {
            // Dropping the handle of the running task only detaches it.
            self.armed = None;
            self.running += 1;
            true
        } else {
            false
        }
    }

    /// Mark a claimed firing as done.
    pub(crate) fn finish(&mut self) {
        self.running = self.running.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn slot_with_counter() -> (Arc<Mutex<TimerSlot>>, Arc<AtomicU32>) {
        let slot = Arc::new(Mutex::new(TimerSlot::new(Handle::current())));
        (slot, Arc::new(AtomicU32::new(0)))
    }

    fn arm(slot: &Arc<Mutex<TimerSlot>>, fired: &Arc<AtomicU32>, delay_ms: u64) -> TimerToken {
        let shared = slot.clone();
        let fired = fired.clone();
        slot.lock()
            .unwrap()
            .schedule(Duration::from_millis(delay_ms), move |token| {
                let claimed = shared.lock().unwrap().claim(token);
                if claimed {
                    fired.fetch_add(1, Ordering::SeqCst);
                    shared.lock().unwrap().finish();
                }
            })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_delay() {
        let (slot, fired) = slot_with_counter();
        arm(&slot, &fired, 50);
        assert!(slot.lock().unwrap().is_pending());

        tokio::time::sleep(Duration::from_millis(49)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!slot.lock().unwrap().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_replaces_previous_timer() {
        let (slot, fired) = slot_with_counter();
        let first = arm(&slot, &fired, 50);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = arm(&slot, &fired, 50);
        assert_ne!(first, second);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let (slot, fired) = slot_with_counter();
        arm(&slot, &fired, 50);
        assert!(slot.lock().unwrap().cancel());
        assert!(!slot.lock().unwrap().cancel());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_token_cannot_claim() {
        let (slot, fired) = slot_with_counter();
        let stale = arm(&slot, &fired, 50);
        let current = arm(&slot, &fired, 50);

        let mut guard = slot.lock().unwrap();
        assert!(!guard.claim(stale));
        assert!(guard.claim(current));
        assert!(!guard.claim(current));
    }

    #[tokio::test(start_paused = true)]
    async fn test_claimed_firing_pending_until_finished() {
        let (slot, fired) = slot_with_counter();
        let token = arm(&slot, &fired, 50);

        let mut guard = slot.lock().unwrap();
        assert!(guard.claim(token));
        assert!(!guard.is_armed());
        assert!(guard.is_pending());

        guard.finish();
        assert!(!guard.is_pending());
    }
}
