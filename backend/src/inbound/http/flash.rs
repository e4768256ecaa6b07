//! One-shot messages carried across a redirect.
//!
//! A flash is queued in the session before a `303 See Other` and drained by
//! the next page that renders, so each message is shown exactly once.

use serde::{Deserialize, Serialize};

/// Severity used by the presentation layer to style the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    /// The action went through.
    Success,
    /// Neutral notice.
    Info,
    /// The action was refused or failed.
    Error,
}

/// Message queued for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }

    fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}
