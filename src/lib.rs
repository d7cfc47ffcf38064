//! Client for the resume analysis service.
//!
//! Uploads PDF/DOCX resumes over multipart HTTP, keeps the results in an
//! explicit [`session::Session`], and renders them as text tabs.

pub mod logging;

pub mod cli;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod report;
pub mod session;
pub mod types;
pub mod utils;

pub use config::ClientConfig;
pub use controller::Controller;
pub use error::ClientError;
pub use session::{Action, Mode, Session};
