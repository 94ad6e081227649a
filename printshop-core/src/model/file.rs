//! Handle to a selected 3D model file.

use std::path::Path;

use bytes::Bytes;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopError};

/// A model file chosen by the user, with its content in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFile {
    /// File name as selected, without directories.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase extension without the dot, empty when absent.
    pub extension: String,
    #[serde(skip)]
    data: Bytes,
}

impl ModelFile {
    /// Wrap in-memory content under `name`.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let data = data.into();
        let extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Self {
            size: data.len() as u64,
            name,
            extension,
            data,
        }
    }

    /// Read a model file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShopError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();
        Ok(Self::from_bytes(name, data))
    }

    /// MIME type derived from the extension.
    pub fn mime_type(&self) -> &'static str {
        match self.extension.as_str() {
            "stl" => "model/stl",
            "obj" => "model/obj",
            "3mf" => "model/3mf",
            _ => "application/octet-stream",
        }
    }

    /// File content.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size in MiB, as displayed next to the file name.
    pub fn size_mib(&self) -> f64 {
        self.size as f64 / crate::config::BYTES_PER_MIB
    }

    /// Hex MD5 digest of the content.
    pub fn fingerprint(&self) -> String {
        format!("{:x}", Md5::digest(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_from_bytes() {
        let file = ModelFile::from_bytes("Bracket.STL", vec![0u8; 2048]);
        assert_eq!(file.size, 2048);
        assert_eq!(file.extension, "stl");
        assert_eq!(file.mime_type(), "model/stl");
    }

    #[test]
    fn test_no_extension() {
        let file = ModelFile::from_bytes("README", Bytes::from_static(b"x"));
        assert_eq!(file.extension, "");
        assert_eq!(file.mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_fingerprint() {
        let file = ModelFile::from_bytes("empty.obj", Bytes::new());
        assert_eq!(file.fingerprint(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gear.3mf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"solid gear").unwrap();

        let file = ModelFile::from_path(&path).unwrap();
        assert_eq!(file.name, "gear.3mf");
        assert_eq!(file.size, 10);
        assert_eq!(file.data().as_ref(), b"solid gear");
    }

    #[test]
    fn test_from_path_missing() {
        let err = ModelFile::from_path(Path::new("/nonexistent/part.stl")).unwrap_err();
        assert!(matches!(err, ShopError::FileNotFound { .. }));
    }
}
