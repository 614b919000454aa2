//! Single-slot status notices with timed dismissal.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

/// Default time a notice stays visible.
pub const DEFAULT_NOTICE_DISMISS: Duration = Duration::from_secs(3);

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeTone {
    /// The action worked.
    Success,
    /// The action failed or needs attention.
    Error,
}

/// A status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or error styling.
    pub tone: NoticeTone,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Error,
            message: message.into(),
        }
    }
}

struct Posted {
    notice: Notice,
    at: DateTime<Utc>,
}

/// Holds the latest notice; a newer post replaces an older one.
///
/// Expiry is evaluated lazily against the injected clock, so no timer task
/// is needed.
pub struct NoticeBoard {
    clock: Arc<dyn Clock>,
    dismiss_after: TimeDelta,
    latest: Mutex<Option<Posted>>,
}

impl NoticeBoard {
    /// Board dismissing notices after `dismiss_after`.
    pub fn new(clock: Arc<dyn Clock>, dismiss_after: Duration) -> Self {
        Self {
            clock,
            dismiss_after: TimeDelta::from_std(dismiss_after).unwrap_or(TimeDelta::MAX),
            latest: Mutex::new(None),
        }
    }

    /// Replace the current notice.
    pub fn post(&self, notice: Notice) {
        let at = self.clock.utc();
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(Posted { notice, at });
    }

    /// Post a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.post(Notice::success(message));
    }

    /// Post an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.post(Notice::error(message));
    }

    /// The visible notice, if one was posted less than the dismissal delay
    /// ago.
    pub fn current(&self) -> Option<Notice> {
        let now = self.clock.utc();
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = latest
            .as_ref()
            .is_some_and(|posted| now.signed_duration_since(posted.at) >= self.dismiss_after);
        if expired {
            *latest = None;
        }
        latest.as_ref().map(|posted| posted.notice.clone())
    }

    /// Remove the notice immediately.
    pub fn clear(&self) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
