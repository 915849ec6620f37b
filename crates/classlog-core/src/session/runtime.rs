//! Recurring session timers.
//!
//! The engine in [`super`] is caller-driven; this module hosts it behind
//! real timers when a session runs in-process. Each timer is an owned,
//! abortable tokio task: starting is idempotent, stopping is
//! unconditional, and dropping a handle cancels the task even on
//! abnormal teardown.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::ObserverSession;

/// Cadence of the reminder poll, in seconds.
pub const REMINDER_POLL_SECS: u64 = 10;

/// Cadence of mode accumulation.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A repeating timer with an owned task handle.
#[derive(Debug, Default)]
pub struct Clock {
    handle: Option<JoinHandle<()>>,
}

impl Clock {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Fire `f` once per `period`, starting one period from now. No-op if
    /// already running.
    pub fn start<F>(&mut self, period: Duration, mut f: F)
    where
        F: FnMut() + Send + 'static,
    {
        if self.handle.is_some() {
            return;
        }
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                f();
            }
        }));
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancel future fires. Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The per-session timer pair: 1 Hz mode accumulation and the reminder
/// poll. Every fire re-checks session state through the engine's own
/// active-guard, so a fire that lands after stop mutates nothing.
#[derive(Debug)]
pub struct SessionTimers {
    tick: Clock,
    reminder: Clock,
}

impl SessionTimers {
    pub fn start(session: Arc<Mutex<ObserverSession>>, poll_period: Duration) -> Self {
        let mut tick = Clock::new();
        {
            let session = Arc::clone(&session);
            tick.start(TICK_PERIOD, move || {
                lock(&session).tick(Utc::now());
            });
        }
        let mut reminder = Clock::new();
        {
            let session = Arc::clone(&session);
            reminder.start(poll_period, move || {
                lock(&session).poll_reminder(Utc::now());
            });
        }
        Self { tick, reminder }
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_running() || self.reminder.is_running()
    }

    /// Cancel both timers. Idempotent; also runs on drop.
    pub fn stop(&mut self) {
        self.tick.stop();
        self.reminder.stop();
    }
}

fn lock(session: &Arc<Mutex<ObserverSession>>) -> MutexGuard<'_, ObserverSession> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn clock_fires_once_per_period() {
        let count = Arc::new(AtomicU32::new(0));
        let mut clock = Clock::new();
        {
            let count = Arc::clone(&count);
            clock.start(Duration::from_secs(1), move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let count = Arc::new(AtomicU32::new(0));
        let mut clock = Clock::new();
        for _ in 0..2 {
            let count = Arc::clone(&count);
            clock.start(Duration::from_secs(1), move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert!(clock.is_running());
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_future_fires() {
        let count = Arc::new(AtomicU32::new(0));
        let mut clock = Clock::new();
        {
            let count = Arc::clone(&count);
            clock.start(Duration::from_secs(1), move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(2100)).await;
        clock.stop();
        assert!(!clock.is_running());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timers_drive_accumulation_until_session_stops() {
        let mut session = ObserverSession::default();
        session.start("Year 8 Mathematics", Utc::now());
        session.toggle_mode("lecture", Utc::now());
        let session = Arc::new(Mutex::new(session));

        let mut timers =
            SessionTimers::start(Arc::clone(&session), Duration::from_secs(REMINDER_POLL_SECS));
        tokio::time::sleep(Duration::from_millis(3100)).await;
        let elapsed = {
            let s = lock(&session);
            s.modes().get("lecture").unwrap().elapsed_secs
        };
        assert_eq!(elapsed, 3);

        // A fire that lands after stop must mutate nothing.
        lock(&session).stop(Utc::now());
        tokio::time::sleep(Duration::from_secs(3)).await;
        let elapsed = {
            let s = lock(&session);
            s.modes().get("lecture").unwrap().elapsed_secs
        };
        assert_eq!(elapsed, 3);

        timers.stop();
        assert!(!timers.is_running());
    }
}
