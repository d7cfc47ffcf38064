// src/core/artifact.rs
//! "Save bytes as file" capability for generated and exported artifacts

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::fs;

use crate::app_log;
use crate::error::ClientError;

pub const IMPROVED_RESUME_FILE: &str = "improved_resume.pdf";
pub const EXPORTED_ANALYSIS_FILE: &str = "resume_analysis.json";

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under `file_name` and return where they ended up.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ClientError>;
}

/// Writes artifacts into a directory, replacing files of the same name.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ClientError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .await
                .map_err(|source| ClientError::Io {
                    path: self.dir.clone(),
                    source,
                })?;
            app_log!(info, "Created directory: {}", self.dir.display());
        }

        let path = self.dir.join(file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|source| ClientError::Io {
                path: path.clone(),
                source,
            })?;

        app_log!(info, "Written file: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keeps artifacts in memory, for embedding the client where there is no
/// filesystem to write to.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every artifact saved so far, oldest first.
    pub fn artifacts(&self) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.artifacts()
            .into_iter()
            .rev()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes)
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ClientError> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
