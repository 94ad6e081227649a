//! Status of the order's one upload slot.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::event::{UploadEvent, UploadFailure, UploadResponse};

/// Identity and cancel handle of one upload attempt.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    id: u64,
    cancel: CancellationToken,
}

impl UploadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token the transport watches for cancellation.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request cancellation of this attempt.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Upload status as shown to the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum UploadStatus {
    #[default]
    Idle,
    /// Started, no bytes reported yet.
    Pending,
    InProgress { percent: u8 },
    Succeeded(UploadResponse),
    Failed(UploadFailure),
    Cancelled,
}

impl UploadStatus {
    /// Check if the upload has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Succeeded(_) | UploadStatus::Failed(_) | UploadStatus::Cancelled
        )
    }

    /// Progress bar value.
    pub fn percent(&self) -> u8 {
        match self {
            UploadStatus::InProgress { percent } => *percent,
            UploadStatus::Succeeded(_) => 100,
            _ => 0,
        }
    }

    /// Status line text.
    pub fn message(&self) -> String {
        match self {
            UploadStatus::Idle => String::new(),
            UploadStatus::Pending => "Uploading... 0%".to_string(),
            UploadStatus::InProgress { percent } => format!("Uploading... {}%", percent),
            UploadStatus::Succeeded(_) => "Upload complete".to_string(),
            UploadStatus::Failed(failure) => failure.to_string(),
            UploadStatus::Cancelled => "Upload cancelled".to_string(),
        }
    }
}

/// Tracks at most one upload at a time. Starting a new attempt cancels the
/// previous one and stops listening to it.
#[derive(Debug, Default)]
pub struct UploadTracker {
    next_id: u64,
    active: Option<UploadTicket>,
    status: UploadStatus,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    /// Id of the attempt being tracked.
    pub fn active_id(&self) -> Option<u64> {
        self.active.as_ref().map(|t| t.id)
    }

    /// Start tracking a new attempt.
    pub fn begin(&mut self) -> UploadTicket {
        if let Some(previous) = self.active.take() {
            if !self.status.is_terminal() {
                debug!(upload = previous.id, "Superseded by new upload");
            }
            previous.cancel();
        }
        self.next_id += 1;
        let ticket = UploadTicket {
            id: self.next_id,
            cancel: CancellationToken::new(),
        };
        self.active = Some(ticket.clone());
        self.status = UploadStatus::Pending;
        ticket
    }

    /// Apply an event from attempt `id`. Events from superseded attempts and
    /// events after the terminal one are dropped; returns whether it applied.
    pub fn apply(&mut self, id: u64, event: UploadEvent) -> bool {
        if self.active_id() != Some(id) {
            debug!(upload = id, "Ignoring event from stale upload");
            return false;
        }
        if self.status.is_terminal() {
            return false;
        }

        self.status = match event {
            UploadEvent::Progress(percent) => UploadStatus::InProgress {
                percent: percent.min(100).max(self.status.percent()),
            },
            UploadEvent::Succeeded(response) => {
                info!(upload = id, status = response.status, "Upload complete");
                UploadStatus::Succeeded(response)
            }
            UploadEvent::Failed(failure) => {
                info!(upload = id, "{}", failure);
                UploadStatus::Failed(failure)
            }
            UploadEvent::Cancelled => UploadStatus::Cancelled,
        };
        true
    }

    /// Cancel the active attempt. The status turns `Cancelled` at once; the
    /// transport's own terminal event is then ignored.
    pub fn cancel(&mut self) -> bool {
        match &self.active {
            Some(ticket) if !self.status.is_terminal() => {
                ticket.cancel();
                info!(upload = ticket.id, "Upload cancelled");
                self.status = UploadStatus::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Drop the active attempt and return to idle.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.active.take() {
            ticket.cancel();
        }
        self.status = UploadStatus::Idle;
    }
}
