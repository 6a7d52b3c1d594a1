//! Transient user-facing notices for mutation results.

use serde::{Deserialize, Serialize};

use crate::error::RemoteResult;
use crate::service::SaveOutcome;
use crate::tables::ConfigTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short message shown to the operator after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// "Multiplier added" / "Multiplier updated" / "Failed to save multiplier".
    pub fn saved<T: ConfigTable>(result: &RemoteResult<SaveOutcome>) -> Self {
        match result {
            Ok(outcome) if outcome.is_update() => Self::success(format!("{} updated", T::TITLE)),
            Ok(_) => Self::success(format!("{} added", T::TITLE)),
            Err(_) => Self::error(format!("Failed to save {}", T::NOUN)),
        }
    }

    pub fn deleted<T: ConfigTable>(result: &RemoteResult<()>) -> Self {
        match result {
            Ok(()) => Self::success(format!("{} deleted", T::TITLE)),
            Err(_) => Self::error(format!("Failed to delete {}", T::NOUN)),
        }
    }

    /// Successful toggles are silent.
    pub fn toggled<T: ConfigTable>(result: &RemoteResult<bool>) -> Option<Self> {
        match result {
            Ok(_) => None,
            Err(_) => Some(Self::error(format!("Failed to toggle {}", T::NOUN))),
        }
    }

    /// Forwarding errors are shown as reported by the remote function.
    pub fn forwarded(result: &RemoteResult<()>) -> Self {
        match result {
            Ok(()) => Self::success("Notification sent"),
            Err(e) => Self::error(e.to_string()),
        }
    }
}
