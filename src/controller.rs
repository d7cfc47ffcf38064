// src/controller.rs
//! Runs user actions against the analysis service.
//!
//! Each action is `Session::begin` -> one service call -> optional artifact
//! save -> one closing transition. The session lock is released while the
//! request is in flight, so actions on different busy slots overlap.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::app_log;
use crate::core::artifact::{EXPORTED_ANALYSIS_FILE, IMPROVED_RESUME_FILE};
use crate::core::{AnalysisService, ArtifactSink};
use crate::error::ClientError;
use crate::session::{Action, Mode, Session, Ticket};
use crate::types::analysis::pretty_json;
use crate::types::{AnalysisResult, ComparisonResult, ResumeFile};

#[derive(Clone)]
pub struct Controller {
    service: Arc<dyn AnalysisService>,
    sink: Arc<dyn ArtifactSink>,
    session: Arc<Mutex<Session>>,
}

/// Read resumes from disk in the given order.
pub async fn load_files(paths: &[PathBuf]) -> Result<Vec<ResumeFile>, ClientError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = ResumeFile::load(path).await?;
        if !file.is_supported() {
            app_log!(warn, "Uploading {} with an unrecognised extension", file.file_name);
        }
        files.push(file);
    }
    Ok(files)
}

impl Controller {
    pub fn new(service: Arc<dyn AnalysisService>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            service,
            sink,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    pub async fn select_files(&self, files: Vec<ResumeFile>) {
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        app_log!(info, "Selected files: {:?}", names);
        self.session.lock().await.select_files(files);
    }

    pub async fn set_mode(&self, mode: Mode) {
        self.session.lock().await.set_mode(mode);
    }

    // ===== Actions =====

    pub async fn analyze(&self) -> Result<AnalysisResult, ClientError> {
        let ticket = self.begin(Action::Analyze).await?;
        let outcome = self.service.analyze(ticket.primary()).await;

        let mut session = self.session.lock().await;
        match outcome {
            Ok(payload) => {
                let result = payload.result.clone();
                session.complete_analysis(ticket, payload);
                app_log!(info, "Analysis complete: {} skills detected", result.skills_detected.len());
                Ok(result)
            }
            Err(err) => {
                session.fail(ticket);
                Err(Self::failed(Action::Analyze, err))
            }
        }
    }

    /// Generate an improved resume and save it as `improved_resume.pdf`
    pub async fn download_improved_resume(&self) -> Result<PathBuf, ClientError> {
        let ticket = self.begin(Action::GenerateResume).await?;
        let outcome = match self.service.generate_resume(ticket.primary()).await {
            Ok(bytes) => self.sink.save(IMPROVED_RESUME_FILE, &bytes).await,
            Err(err) => Err(err),
        };
        self.finish_artifact(ticket, outcome).await
    }

    /// Export the service's analysis and save it as `resume_analysis.json`
    pub async fn export_analysis(&self) -> Result<PathBuf, ClientError> {
        let ticket = self.begin(Action::Export).await?;
        let outcome = match self.service.export_analysis(ticket.primary()).await {
            Ok(value) => match pretty_json(&value) {
                Ok(bytes) => self.sink.save(EXPORTED_ANALYSIS_FILE, &bytes).await,
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        self.finish_artifact(ticket, outcome).await
    }

    pub async fn compare(&self) -> Result<ComparisonResult, ClientError> {
        let ticket = self.begin(Action::Compare).await?;
        let outcome = self.service.compare(ticket.files()).await;

        let mut session = self.session.lock().await;
        match outcome {
            Ok(result) => {
                session.complete_comparison(ticket, result.clone());
                app_log!(info, "Comparison complete: {} resumes", result.comparison.len());
                Ok(result)
            }
            Err(err) => {
                session.fail(ticket);
                Err(Self::failed(Action::Compare, err))
            }
        }
    }

    /// Save the JSON last received from `/analyze` without contacting the
    /// service.
    pub async fn save_last_analysis(&self) -> Result<PathBuf, ClientError> {
        let bytes = {
            let session = self.session.lock().await;
            let snapshot = session.analysis().ok_or(ClientError::NoAnalysis)?;
            snapshot.payload.to_pretty_json()?
        };
        self.sink.save(EXPORTED_ANALYSIS_FILE, &bytes).await
    }

    // ===== Helpers =====

    async fn begin(&self, action: Action) -> Result<Ticket, ClientError> {
        self.session.lock().await.begin(action).inspect_err(|err| {
            app_log!(warn, "{} rejected: {}", action, err);
        })
    }

    async fn finish_artifact(
        &self,
        ticket: Ticket,
        outcome: Result<PathBuf, ClientError>,
    ) -> Result<PathBuf, ClientError> {
        let action = ticket.action();
        let mut session = self.session.lock().await;
        match outcome {
            Ok(path) => {
                session.complete_artifact(ticket);
                app_log!(info, "{} saved to {}", action, path.display());
                Ok(path)
            }
            Err(err) => {
                session.fail(ticket);
                Err(Self::failed(action, err))
            }
        }
    }

    fn failed(action: Action, err: ClientError) -> ClientError {
        if err.is_local() {
            app_log!(warn, "{} rejected: {}", action, err);
        } else {
            app_log!(error, "{} failed: {}", action, err);
        }
        err
    }
}

/// Path relative to the current directory when possible, for display.
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
