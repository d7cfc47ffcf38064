// src/types/comparison.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::types::response::embedded_error;

/// Per-file summary returned by `POST /analysis/compare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub filename: String,
    #[serde(default)]
    pub skills_count: u32,
    #[serde(default)]
    pub sections_count: u32,
    #[serde(default)]
    pub ats_score: Option<f64>,
    /// Truncated by the service, typically to the first handful of skills.
    #[serde(default, alias = "top_skills")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub comparison: Vec<ResumeSummary>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ComparisonWire {
    Wrapped { comparison: Vec<ResumeSummary> },
    Bare(Vec<ResumeSummary>),
}

impl ComparisonResult {
    pub fn from_value(endpoint: &'static str, raw: Value) -> Result<Self, ClientError> {
        if let Some(message) = embedded_error(&raw) {
            return Err(ClientError::Service { endpoint, message });
        }

        let wire: ComparisonWire = serde_json::from_value(raw)
            .map_err(|source| ClientError::Decode { endpoint, source })?;

        let comparison = match wire {
            ComparisonWire::Wrapped { comparison } => comparison,
            ComparisonWire::Bare(comparison) => comparison,
        };

        Ok(Self { comparison })
    }

    /// Summary with the highest ATS score, if any file reported one.
    pub fn best_by_ats(&self) -> Option<&ResumeSummary> {
        self.comparison
            .iter()
            .filter(|summary| summary.ats_score.is_some())
            .max_by(|a, b| {
                a.ats_score
                    .unwrap_or_default()
                    .total_cmp(&b.ats_score.unwrap_or_default())
            })
    }
}
