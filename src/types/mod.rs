// src/types/mod.rs
//! Data exchanged with the resume analysis service

pub mod analysis;
pub mod comparison;
pub mod response;
pub mod upload;

pub use analysis::{AnalysisPayload, AnalysisResult, CategorizedSkill, ContentAnalysis, KeywordStat};
pub use comparison::{ComparisonResult, ResumeSummary};
pub use upload::ResumeFile;
