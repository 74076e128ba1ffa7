//! Sync outcomes and user-facing notifications.

use crate::error::SyncError;
use quotebook_sync_protocol::MergeDecision;

/// Message shown after a successful sync.
pub const SYNC_SUCCESS_MESSAGE: &str = "Quotes synced with server!";

/// Message shown after a failed sync.
pub const SYNC_FAILURE_MESSAGE: &str = "Error syncing with server!";

/// Message shown when a sync request is dropped because one is running.
pub const SYNC_IN_PROGRESS_MESSAGE: &str = "Sync already in progress";

/// Result of one sync request.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The merged list was saved.
    Success {
        /// Length of the merged list.
        merged: usize,
        /// Decision taken at each merged position.
        decisions: Vec<MergeDecision>,
    },
    /// The sync did not complete; the persisted list is unchanged.
    Failure(SyncError),
}

impl SyncOutcome {
    /// Returns true on success.
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success { .. })
    }

    /// Returns the merged count on success.
    pub fn merged(&self) -> Option<usize> {
        match self {
            SyncOutcome::Success { merged, .. } => Some(*merged),
            SyncOutcome::Failure(_) => None,
        }
    }

    /// Returns the failure reason.
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncOutcome::Success { .. } => None,
            SyncOutcome::Failure(e) => Some(e),
        }
    }

    /// Returns the number of positions where a conflict was resolved.
    pub fn conflicts(&self) -> usize {
        match self {
            SyncOutcome::Success { decisions, .. } => {
                decisions.iter().filter(|d| d.is_conflict()).count()
            }
            SyncOutcome::Failure(_) => 0,
        }
    }

    /// Returns the notification to show for this outcome.
    pub fn notification(&self) -> Notification {
        match self {
            SyncOutcome::Success { .. } => Notification::info(SYNC_SUCCESS_MESSAGE),
            SyncOutcome::Failure(SyncError::InProgress) => {
                Notification::info(SYNC_IN_PROGRESS_MESSAGE)
            }
            SyncOutcome::Failure(_) => Notification::error(SYNC_FAILURE_MESSAGE),
        }
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Error-class notification.
    Error,
}

/// A message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text to show.
    pub message: &'static str,
    /// Severity.
    pub level: NotificationLevel,
}

impl Notification {
    fn info(message: &'static str) -> Self {
        Self {
            message,
            level: NotificationLevel::Info,
        }
    }

    fn error(message: &'static str) -> Self {
        Self {
            message,
            level: NotificationLevel::Error,
        }
    }

    /// Returns true for error-class notifications.
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}
