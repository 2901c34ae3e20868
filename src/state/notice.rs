#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use std::collections::VecDeque;

use crate::error::BookingError;

/// Maximum notices kept before the oldest is discarded.
const MAX_NOTICES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient, dismissible banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Error code when the notice reports a failure.
    pub code: Option<&'static str>,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into(), code: None }
    }

    #[must_use]
    pub fn from_error(err: &BookingError) -> Self {
        let message = match err {
            BookingError::Validation(m)
            | BookingError::Network(m)
            | BookingError::Conflict(m)
            | BookingError::Auth(m)
            | BookingError::Config(m) => m.clone(),
            BookingError::Api { message, .. } => message.clone(),
            BookingError::StaleResponse { .. } => err.to_string(),
        };
        Self { level: NoticeLevel::Error, message, code: Some(err.error_code()) }
    }
}

/// Bounded FIFO of pending notices.
#[derive(Clone, Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.queue.push_back(notice);
    }

    /// Queue a notice for `err` unless it is internal.
    pub fn push_error(&mut self, err: &BookingError) {
        if err.is_user_facing() {
            self.push(Notice::from_error(err));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    /// Dismiss the notice at `index`, if present.
    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        self.queue.remove(index)
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}
