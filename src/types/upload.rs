// src/types/upload.rs
use std::path::Path;

use crate::error::ClientError;
use crate::utils::{content_type_for, OCTET_STREAM};

/// A resume selected for upload: file name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a resume from disk, keeping only the final path component as
    /// the uploaded file name.
    pub async fn load(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "resume".to_string());

        Ok(Self { file_name, bytes })
    }

    /// MIME type sent with the multipart part. Unknown extensions are sent
    /// as `application/octet-stream` and left for the service to reject.
    pub fn content_type(&self) -> &'static str {
        content_type_for(&self.file_name).unwrap_or(OCTET_STREAM)
    }

    pub fn is_supported(&self) -> bool {
        content_type_for(&self.file_name).is_some()
    }
}
