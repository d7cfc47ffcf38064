// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::session::Action;

/// Outcome of a failed client action.
///
/// Local validation failures are raised before any request is sent; the
/// remaining variants describe what went wrong talking to the service or
/// saving an artifact. Presentation is left to the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no resume file selected")]
    NoFileSelected,

    #[error("select at least {required} files to compare ({selected} selected)")]
    NotEnoughFiles { selected: usize, required: usize },

    #[error("{0} is already in progress")]
    Busy(Action),

    #[error("cannot clear the selection while a request is in flight")]
    SelectionLocked,

    #[error("no analysis available, run analyze first")]
    NoAnalysis,

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    #[error("{endpoint} reported an error: {message}")]
    Service {
        endpoint: &'static str,
        message: String,
    },

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True for failures detected without contacting the service.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::NoFileSelected
                | ClientError::NotEnoughFiles { .. }
                | ClientError::Busy(_)
                | ClientError::SelectionLocked
                | ClientError::NoAnalysis
        )
    }
}
