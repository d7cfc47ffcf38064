// src/core/service_client.rs
//! HTTP client for the resume analysis service - multipart uploads for every endpoint

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

use crate::app_log;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::MIN_COMPARE_FILES;
use crate::types::response::{embedded_error, error_message};
use crate::types::{AnalysisPayload, ComparisonResult, ResumeFile};

pub const ANALYZE_ENDPOINT: &str = "/analyze";
pub const GENERATE_RESUME_ENDPOINT: &str = "/generate_resume";
pub const EXPORT_ENDPOINT: &str = "/analysis/export";
pub const COMPARE_ENDPOINT: &str = "/analysis/compare";

const FILE_FIELD: &str = "file";
const FILES_FIELD: &str = "files";

/// The analysis service as seen by the client. One call, one request, no
/// retries.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// `POST /analyze`
    async fn analyze(&self, file: &ResumeFile) -> Result<AnalysisPayload, ClientError>;

    /// `POST /generate_resume`, returning the PDF bytes untouched
    async fn generate_resume(&self, file: &ResumeFile) -> Result<Vec<u8>, ClientError>;

    /// `POST /analysis/export`, returning the JSON exactly as received
    async fn export_analysis(&self, file: &ResumeFile) -> Result<Value, ClientError>;

    /// `POST /analysis/compare`. Fewer than two files is rejected before any
    /// request is made.
    async fn compare(&self, files: &[ResumeFile]) -> Result<ComparisonResult, ClientError>;
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Create new service client. Without `timeout_seconds` requests wait
    /// for the service indefinitely.
    pub fn new(base_url: &str, timeout_seconds: Option<u64>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, config.timeout_seconds)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn file_part(endpoint: &'static str, file: &ResumeFile) -> Result<Part, ClientError> {
        Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.content_type())
            .map_err(|source| ClientError::Transport { endpoint, source })
    }

    fn single_file_form(endpoint: &'static str, file: &ResumeFile) -> Result<Form, ClientError> {
        Ok(Form::new().part(FILE_FIELD, Self::file_part(endpoint, file)?))
    }

    /// Send the form and turn any non-success status into `ClientError::Status`
    async fn post_form(&self, endpoint: &'static str, form: Form) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        app_log!(info, "Calling resume analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|e| format!("failed to read error body: {e}"));
        app_log!(error, "Analysis service error response: {}", error_text);

        Err(ClientError::Status {
            endpoint,
            status: status.as_u16(),
            message: error_message(&error_text),
        })
    }

    async fn read_json(endpoint: &'static str, response: Response) -> Result<Value, ClientError> {
        let response_text = response
            .text()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        app_log!(debug, "Raw response from {}: {} bytes", endpoint, response_text.len());

        serde_json::from_str(&response_text).map_err(|source| ClientError::Decode { endpoint, source })
    }
}

#[async_trait]
impl AnalysisService for ServiceClient {
    async fn analyze(&self, file: &ResumeFile) -> Result<AnalysisPayload, ClientError> {
        let form = Self::single_file_form(ANALYZE_ENDPOINT, file)?;
        let response = self.post_form(ANALYZE_ENDPOINT, form).await?;
        let raw = Self::read_json(ANALYZE_ENDPOINT, response).await?;
        AnalysisPayload::from_value(ANALYZE_ENDPOINT, raw)
    }

    async fn generate_resume(&self, file: &ResumeFile) -> Result<Vec<u8>, ClientError> {
        let endpoint = GENERATE_RESUME_ENDPOINT;
        let form = Self::single_file_form(endpoint, file)?;
        let response = self.post_form(endpoint, form).await?;

        // The service reports rejected uploads as a JSON body with a success status.
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        if is_json {
            let body = Self::read_json(endpoint, response).await?;
            let message = embedded_error(&body).unwrap_or_else(|| body.to_string());
            return Err(ClientError::Service { endpoint, message });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        app_log!(info, "Received generated resume: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn export_analysis(&self, file: &ResumeFile) -> Result<Value, ClientError> {
        let form = Self::single_file_form(EXPORT_ENDPOINT, file)?;
        let response = self.post_form(EXPORT_ENDPOINT, form).await?;
        let raw = Self::read_json(EXPORT_ENDPOINT, response).await?;

        if let Some(message) = embedded_error(&raw) {
            return Err(ClientError::Service {
                endpoint: EXPORT_ENDPOINT,
                message,
            });
        }
        Ok(raw)
    }

    async fn compare(&self, files: &[ResumeFile]) -> Result<ComparisonResult, ClientError> {
        if files.len() < MIN_COMPARE_FILES {
            return Err(ClientError::NotEnoughFiles {
                selected: files.len(),
                required: MIN_COMPARE_FILES,
            });
        }

        let mut form = Form::new();
        for file in files {
            form = form.part(FILES_FIELD, Self::file_part(COMPARE_ENDPOINT, file)?);
        }

        let response = self.post_form(COMPARE_ENDPOINT, form).await?;
        let raw = Self::read_json(COMPARE_ENDPOINT, response).await?;
        ComparisonResult::from_value(COMPARE_ENDPOINT, raw)
    }
}
