//! Long-press timers.
//!
//! A gesture session asks a [`LongPressScheduler`] for a timer and keeps the returned
//! [`TimerGuard`]. Dropping the guard cancels the timer, so every way a session can
//! end (pointer up, movement, cancel, controller dropped) also cancels its timer.
//! When a timer fires, the scheduler delivers the session's [`SessionToken`] back to
//! whoever drives the controller; tokens of sessions that already ended are ignored.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::trace;

/// Identifies one gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw token number.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Cancels a scheduled timer when dropped.
pub struct TimerGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

impl TimerGuard {
    /// Guard that runs `cancel` when dropped.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Forget the timer without cancelling it (it has already fired).
    pub fn disarm(mut self) {
        self.cancel = None;
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Arranges for a session's token to be delivered after a delay.
pub trait LongPressScheduler {
    /// Deliver `token` after `after`; dropping the guard cancels.
    fn schedule(&mut self, token: SessionToken, after: Duration) -> TimerGuard;
}

/// Spawns a sleeping tokio task per timer; expiry is posted on an mpsc channel.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<SessionToken>,
}

impl TokioScheduler {
    /// A scheduler and the receiver its expirations arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LongPressScheduler for TokioScheduler {
    fn schedule(&mut self, token: SessionToken, after: Duration) -> TimerGuard {
        let tx = self.tx.clone();
        let handle: AbortHandle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            trace!(token = token.value(), "Long press elapsed");
            // The receiver may be gone if the app is shutting down.
            let _ = tx.send(token);
        })
        .abort_handle();
        TimerGuard::new(move || handle.abort())
    }
}

#[derive(Debug, Default)]
struct ManualState {
    scheduled: Vec<(SessionToken, Duration)>,
    cancelled: Vec<SessionToken>,
}

/// Records timers instead of running them. Tests fire a timer by feeding
/// `LongPressElapsed(token)` to the controller themselves.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers scheduled and not cancelled, oldest first.
    pub fn pending(&self) -> Vec<SessionToken> {
        self.state
            .lock()
            .map(|s| {
                s.scheduled
                    .iter()
                    .map(|(token, _)| *token)
                    .filter(|token| !s.cancelled.contains(token))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The most recently scheduled timer, cancelled or not.
    pub fn last_scheduled(&self) -> Option<(SessionToken, Duration)> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.scheduled.last().copied())
    }

    /// Whether the guard for `token` was dropped before firing.
    pub fn is_cancelled(&self, token: SessionToken) -> bool {
        self.state
            .lock()
            .map(|s| s.cancelled.contains(&token))
            .unwrap_or(false)
    }
}

impl LongPressScheduler for ManualScheduler {
    fn schedule(&mut self, token: SessionToken, after: Duration) -> TimerGuard {
        if let Ok(mut state) = self.state.lock() {
            state.scheduled.push((token, after));
        }
        let state = Arc::clone(&self.state);
        TimerGuard::new(move || {
            if let Ok(mut state) = state.lock() {
                state.cancelled.push(token);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn dropping_guard_runs_cancel() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let guard = TimerGuard::new(move || flag.store(true, Ordering::SeqCst));

        drop(guard);

        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn disarmed_guard_does_not_cancel() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        TimerGuard::new(move || flag.store(true, Ordering::SeqCst)).disarm();

        assert!(!cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn manual_scheduler_tracks_cancellation() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule(SessionToken::new(1), Duration::from_millis(300));
        let _second = scheduler.schedule(SessionToken::new(2), Duration::from_millis(300));

        drop(first);

        assert!(scheduler.is_cancelled(SessionToken::new(1)));
        assert_eq!(scheduler.pending(), vec![SessionToken::new(2)]);
        assert_eq!(
            scheduler.last_scheduled(),
            Some((SessionToken::new(2), Duration::from_millis(300)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_delivers_token_after_delay() {
        let (mut scheduler, mut rx) = TokioScheduler::channel();
        let started = tokio::time::Instant::now();
        let _guard = scheduler.schedule(SessionToken::new(7), Duration::from_millis(300));

        assert_eq!(rx.recv().await, Some(SessionToken::new(7)));
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_guard_drop_cancels() {
        let (mut scheduler, mut rx) = TokioScheduler::channel();
        let guard = scheduler.schedule(SessionToken::new(7), Duration::from_millis(300));

        drop(guard);
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
    }
}
