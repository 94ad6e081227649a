//! Configuration constants and settings for the storefront core.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopError};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Bytes per MiB, used by the volume proxy.
pub const BYTES_PER_MIB: f64 = 1_048_576.0;

/// Volume proxy: cm³ per MiB of model file.
pub const VOLUME_CM3_PER_MIB: f64 = 10.0;

/// Base print time in minutes per cm³.
pub const MINUTES_PER_CM3: f64 = 5.0;

/// Layer height the time estimate is normalised to, in mm.
pub const REFERENCE_LAYER_HEIGHT_MM: f64 = 0.2;

/// Infill percentage the time estimate is normalised to.
pub const REFERENCE_INFILL_PERCENT: f64 = 20.0;

/// Machine cost per hour of print time.
pub const MACHINE_COST_PER_HOUR: f64 = 2.5;

/// Fixed per-order base fee.
pub const BASE_FEE: f64 = 5.0;

/// Flat shipping charge shown at checkout.
pub const SHIPPING_COST: f64 = 5.0;

/// Maximum accepted model file size (100 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 104_857_600;

/// Accepted model file extensions.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["stl", "obj", "3mf"];

/// Default storefront origin the upload path is resolved against.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default upload path.
pub const DEFAULT_UPLOAD_PATH: &str = "/api/upload";

/// Default streamed body chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Upload transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Absolute upload URL.
    pub endpoint: String,
    /// Size of each streamed body chunk; progress is reported per chunk.
    pub chunk_size: usize,
    /// Whole-request timeout. Zero disables it.
    pub timeout_secs: u64,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("{}{}", DEFAULT_BASE_URL, DEFAULT_UPLOAD_PATH),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            system_proxy: true,
        }
    }
}

impl UploadConfig {
    /// Upload configuration pointing at `endpoint`.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

/// Limits applied when a model file is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLimits {
    /// Maximum file size in bytes.
    pub max_size: u64,
    /// Accepted extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_FILE_SIZE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl FileLimits {
    /// Maximum size in whole MB, as shown to the user.
    pub fn max_size_mb(&self) -> u64 {
        self.max_size / (1024 * 1024)
    }

    /// Check whether an extension (any case, with or without dot) is accepted.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub upload: UploadConfig,
    pub limits: FileLimits,
}

impl ShopConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShopError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ShopError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        if config.upload.chunk_size == 0 {
            return Err(ShopError::Config {
                message: format!("{}: upload.chunk_size must be at least 1", path.display()),
            });
        }
        Ok(config)
    }

    /// Replace the upload endpoint. A bare path is resolved against the
    /// default storefront origin.
    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.upload.endpoint = resolve_endpoint(endpoint);
    }
}

/// Resolve an endpoint that may be a bare path into an absolute URL.
pub fn resolve_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.starts_with('/') {
        format!("{}{}", DEFAULT_BASE_URL, endpoint)
    } else {
        endpoint.to_string()
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_endpoint() {
        let config = ShopConfig::default();
        assert_eq!(config.upload.endpoint, "http://localhost:3000/api/upload");
    }

    #[test]
    fn test_approx_eq() {
        assert!(float_cmp::approx_eq(15.0 / 100.0, 0.15));
        assert!(float_cmp::approx_eq(0.1 + 0.2, 0.3));
        assert!(!float_cmp::approx_eq(0.2, 0.25));
    }

    #[test]
    fn test_resolve_endpoint() {
        assert_eq!(
            resolve_endpoint("/v2/upload"),
            "http://localhost:3000/v2/upload"
        );
        assert_eq!(
            resolve_endpoint("https://prints.example.com/api/upload"),
            "https://prints.example.com/api/upload"
        );
    }

    #[test]
    fn test_limits() {
        let limits = FileLimits::default();
        assert_eq!(limits.max_size_mb(), 100);
        assert!(limits.accepts_extension("STL"));
        assert!(limits.accepts_extension(".3mf"));
        assert!(!limits.accepts_extension("step"));
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"upload": {{"chunk_size": 1024}}}}"#).unwrap();

        let config = ShopConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.upload.chunk_size, 1024);
        assert_eq!(config.upload.endpoint, UploadConfig::default().endpoint);
        assert_eq!(config.limits, FileLimits::default());
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ShopConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ShopError::Config { .. }));
    }

    #[test]
    fn test_from_json_file_zero_chunk_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"upload": {{"chunk_size": 0}}}}"#).unwrap();

        let err = ShopConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ShopError::Config { .. }));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = ShopConfig::from_json_file(Path::new("/nonexistent/shop.json")).unwrap_err();
        assert!(matches!(err, ShopError::FileNotFound { .. }));
    }
}
