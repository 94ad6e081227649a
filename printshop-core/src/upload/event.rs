//! Events and outcomes of a model upload.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Successful server reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// HTTP status code (2xx).
    pub status: u16,
    /// File URL returned by the server, if any.
    pub file_url: Option<String>,
    /// Parsed JSON body, if the body was JSON.
    pub body: Option<Value>,
}

impl UploadResponse {
    /// Build from a 2xx status and raw body text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let body: Option<Value> = serde_json::from_str(body).ok();
        let file_url = body.as_ref().and_then(|v| {
            ["fileUrl", "url"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str))
                .map(str::to_string)
        });
        Self {
            status,
            file_url,
            body,
        }
    }
}

/// Why an upload failed. Client cancellation is not a failure; see
/// [`UploadEvent::Cancelled`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UploadFailure {
    /// Could not reach the server or the connection failed.
    Network { message: String },
    /// The transfer was cut off before a response arrived.
    Aborted { message: String },
    /// Server answered with a non-2xx status.
    Rejected { status: u16, body: String },
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailure::Network { message } => write!(f, "Network error: {}", message),
            UploadFailure::Aborted { message } => write!(f, "Upload aborted: {}", message),
            UploadFailure::Rejected { status, .. } => {
                write!(f, "Server rejected the upload (HTTP {})", status)
            }
        }
    }
}

/// Signal emitted by an upload in flight. `Progress` values are
/// non-decreasing and exactly one terminal event ends the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// Percent of the body handed to the transport, 0 to 100.
    Progress(u8),
    Succeeded(UploadResponse),
    Failed(UploadFailure),
    /// Client requested cancellation.
    Cancelled,
}

impl UploadEvent {
    /// Check if this event ends the upload.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Progress(_))
    }
}
