//! Model file upload: transport, progress and status tracking.

mod event;
mod progress;
mod tracker;
mod transport;

pub use event::{UploadEvent, UploadFailure, UploadResponse};
pub use progress::{split_chunks, ProgressMeter};
pub use tracker::{UploadStatus, UploadTicket, UploadTracker};
pub use transport::{Uploader, FILE_FIELD};
