// src/core/mod.rs
//! Service boundary and artifact storage

pub mod artifact;
pub mod service_client;

pub use artifact::{ArtifactSink, DirectorySink, MemorySink};
pub use service_client::{AnalysisService, ServiceClient};
