// Input document: raw bytes plus an on-disk path for the external tools
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::types::{DonorscanError, Result};

/// A PDF loaded into memory.
///
/// The direct strategy reads `bytes`; the poppler/tesseract based strategies
/// need a file, so documents built from bytes alone are spilled to a temp file
/// on demand.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    filename: String,
    bytes: Vec<u8>,
    path: Option<PathBuf>,
}

impl SourceDocument {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DonorscanError::MissingInput(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            filename,
            bytes,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            path: None,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn filesize(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` with a filesystem path holding this document's bytes.
    pub fn with_path<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Path) -> Result<R>,
    {
        match &self.path {
            Some(path) => f(path),
            None => {
                let mut spill = tempfile::Builder::new()
                    .prefix("donorscan-")
                    .suffix(".pdf")
                    .tempfile()?;
                spill.write_all(&self.bytes)?;
                spill.flush()?;
                f(spill.path())
            }
        }
    }
}
