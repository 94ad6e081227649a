//! HTTP multipart upload with progress and cancellation.

use std::error::Error as StdError;
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::event::{UploadEvent, UploadFailure, UploadResponse};
use super::progress::{split_chunks, ProgressMeter};
use super::tracker::UploadTicket;
use crate::config::UploadConfig;
use crate::error::{Result, ShopError};
use crate::model::ModelFile;

/// Multipart form field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Sends model files to the upload endpoint.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    endpoint: String,
    chunk_size: usize,
}

impl Uploader {
    /// Build an uploader for `config`.
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|e| ShopError::Config {
            message: format!("HTTP client: {}", e),
        })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            chunk_size: config.chunk_size,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start uploading `file` under `ticket` on the current tokio runtime.
    ///
    /// The receiver yields progress events followed by exactly one terminal
    /// event, then closes. Cancelling the ticket always ends with
    /// [`UploadEvent::Cancelled`].
    pub fn start(&self, ticket: &UploadTicket, file: &ModelFile) -> mpsc::UnboundedReceiver<UploadEvent> {
        let (events, rx) = mpsc::unbounded_channel();
        let job = UploadJob {
            id: ticket.id(),
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            chunk_size: self.chunk_size,
            file: file.clone(),
            cancel: ticket.cancel_token(),
        };
        tokio::spawn(job.run(events));
        rx
    }
}

struct UploadJob {
    id: u64,
    client: Client,
    endpoint: String,
    chunk_size: usize,
    file: ModelFile,
    cancel: CancellationToken,
}

impl UploadJob {
    async fn run(self, events: mpsc::UnboundedSender<UploadEvent>) {
        info!(
            upload = self.id,
            file = %self.file.name,
            size = self.file.size,
            endpoint = %self.endpoint,
            "Upload started"
        );

        // The body stream may outlive the request future inside the HTTP
        // connection, so it reports to this task instead of to `events`.
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let request = send_file(&self.client, &self.endpoint, &self.file, self.chunk_size, progress_tx);
        tokio::pin!(request);

        let mut outcome = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break UploadEvent::Cancelled,
                Some(percent) = progress_rx.recv() => {
                    let _ = events.send(UploadEvent::Progress(percent));
                }
                result = &mut request => break match result {
                    Ok(response) => UploadEvent::Succeeded(response),
                    Err(failure) => UploadEvent::Failed(failure),
                },
            }
        };

        if self.cancel.is_cancelled() {
            outcome = UploadEvent::Cancelled;
        }

        match &outcome {
            UploadEvent::Succeeded(response) => {
                info!(upload = self.id, status = response.status, "Upload finished")
            }
            UploadEvent::Failed(failure) => warn!(upload = self.id, "{}", failure),
            UploadEvent::Cancelled => info!(upload = self.id, "Upload cancelled"),
            UploadEvent::Progress(_) => {}
        }
        let _ = events.send(outcome);
    }
}

async fn send_file(
    client: &Client,
    endpoint: &str,
    file: &ModelFile,
    chunk_size: usize,
    progress: mpsc::UnboundedSender<u8>,
) -> std::result::Result<UploadResponse, UploadFailure> {
    let mut meter = ProgressMeter::new(file.size);
    let chunks = split_chunks(file.data(), chunk_size);
    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        if let Some(percent) = meter.advance(chunk.len() as u64) {
            let _ = progress.send(percent);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    });

    let part = Part::stream_with_length(Body::wrap_stream(stream), file.size)
        .file_name(file.name.clone())
        .mime_str(file.mime_type())
        .map_err(classify)?;
    let form = Form::new().part(FILE_FIELD, part);

    let response = client
        .post(endpoint)
        .multipart(form)
        .send()
        .await
        .map_err(classify)?;
    let status = response.status();
    let body = response.text().await.map_err(classify)?;
    debug!(status = status.as_u16(), bytes = body.len(), "Upload response");

    if !status.is_success() {
        return Err(UploadFailure::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    Ok(UploadResponse::from_body(status.as_u16(), &body))
}

/// Map a client error onto the failure taxonomy.
fn classify(err: reqwest::Error) -> UploadFailure {
    let message = error_chain(&err);
    if err.is_timeout() {
        UploadFailure::Aborted {
            message: format!("timed out ({})", message),
        }
    } else if err.is_body() || err.is_decode() {
        UploadFailure::Aborted { message }
    } else {
        UploadFailure::Network { message }
    }
}

/// Render an error with its sources, outermost first.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|l| l as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_error_chain() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer("connection refused", None))),
        );
        assert_eq!(error_chain(&err), "error sending request: connection refused");
    }

    #[test]
    fn test_uploader_endpoint() {
        let uploader = Uploader::new(&UploadConfig::with_endpoint("http://127.0.0.1:9/api/upload")).unwrap();
        assert_eq!(uploader.endpoint(), "http://127.0.0.1:9/api/upload");
    }
}
