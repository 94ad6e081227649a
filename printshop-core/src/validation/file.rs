//! Acceptance rules applied when a model file is selected.

use tracing::warn;

use crate::config::FileLimits;
use crate::error::{Result, ShopError};
use crate::model::ModelFile;

/// Check a selected file against the extension and size limits.
pub fn check_model_file(file: &ModelFile, limits: &FileLimits) -> Result<()> {
    let reason = if !limits.accepts_extension(&file.extension) {
        let accepted: Vec<String> = limits
            .extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect();
        Some(format!(
            "File type must be one of {}",
            accepted.join(", ")
        ))
    } else if file.size > limits.max_size {
        Some(format!(
            "File is too large. Max size is {}MB.",
            limits.max_size_mb()
        ))
    } else {
        None
    };

    match reason {
        Some(reason) => {
            warn!(file = %file.name, size = file.size, "{}", reason);
            Err(ShopError::FileRejected {
                name: file.name.clone(),
                reason,
            })
        }
        None => Ok(()),
    }
}
