//! Transient toast notices and the header clock.
//!
//! Both are driven by tokio timers owned by the console. Raising a new toast
//! cancels the previous dismiss timer; stopping either handle aborts its task
//! so nothing mutates console state after teardown.

use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Tone of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation completed
    Success,
    /// Operation refused or failed
    Error,
}

/// A notice shown until dismissed by its timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message text
    pub message: String,
    /// Success or error
    pub kind: ToastKind,
}

impl Toast {
    /// Single-line rendering, e.g. `[ok] Transaction Finalized Successfully`
    #[must_use]
    pub fn render(&self) -> String {
        let tag = match self.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "denied",
        };
        format!("[{tag}] {}", self.message)
    }
}

/// The visible toast and the timer that will dismiss it.
#[derive(Debug)]
pub struct Notices {
    current: Arc<Mutex<Option<Toast>>>,
    delay: Duration,
    timer: Option<JoinHandle<()>>,
    raised: u64,
}

impl Notices {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            delay,
            timer: None,
            raised: 0,
        }
    }

    /// Shows `message` and schedules its dismissal. Must run inside a tokio runtime.
    pub fn raise(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.cancel_timer();
        let toast = Toast {
            message: message.into(),
            kind,
        };
        trace!(message = %toast.message, "Toast raised");
        *self.current.lock() = Some(toast);
        self.raised += 1;

        let current = Arc::clone(&self.current);
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            current.lock().take();
        }));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(message, ToastKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(message, ToastKind::Error);
    }

    #[must_use]
    pub fn current(&self) -> Option<Toast> {
        self.current.lock().clone()
    }

    /// Number of toasts raised so far
    #[must_use]
    pub const fn raised(&self) -> u64 {
        self.raised
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Cancels the pending dismissal and clears the toast.
    pub fn stop(&mut self) {
        self.cancel_timer();
        self.current.lock().take();
    }
}

impl Drop for Notices {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Formats a timestamp for the header, e.g. `18 Oct 2026, 03:04:05 pm`.
#[must_use]
pub fn format_clock(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset)
        .format("%d %b %Y, %I:%M:%S %P")
        .to_string()
}

/// Wall clock refreshed by a periodic tick.
#[derive(Debug)]
pub struct Clock {
    now: Arc<Mutex<DateTime<Utc>>>,
    ticker: Option<JoinHandle<()>>,
}

impl Clock {
    /// Starts ticking every `tick`. Must run inside a tokio runtime.
    #[must_use]
    pub fn start(tick: Duration) -> Self {
        let now = Arc::new(Mutex::new(Utc::now()));
        let shared = Arc::clone(&now);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                *shared.lock() = Utc::now();
            }
        });
        Self {
            now,
            ticker: Some(ticker),
        }
    }

    /// Time as of the last tick
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}
