// src/session.rs
//! View state of the client as one explicit structure.
//!
//! Every user action goes through [`Session::begin`], which validates the
//! preconditions and marks the action's busy slot, and ends with exactly one
//! of the `complete_*` transitions or [`Session::fail`]. Results are only
//! replaced on success, so a failed request leaves the previous view intact.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::ClientError;
use crate::report::Tab;
use crate::types::{AnalysisPayload, ComparisonResult, ResumeFile};

pub const MIN_COMPARE_FILES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Analyze,
    GenerateResume,
    Export,
    Compare,
}

/// The two independent busy flags. Actions sharing a slot exclude each
/// other; actions on different slots may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Loading,
    Downloading,
}

impl Action {
    pub fn slot(self) -> Slot {
        match self {
            Action::Analyze | Action::Compare => Slot::Loading,
            Action::GenerateResume | Action::Export => Slot::Downloading,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Analyze => "analyze",
            Action::GenerateResume => "download",
            Action::Export => "export",
            Action::Compare => "compare",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Single,
    Compare,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSnapshot {
    pub file_name: String,
    pub payload: AnalysisPayload,
    pub analyzed_at: DateTime<Utc>,
}

/// Proof that an action was started. Holds the files captured at start so a
/// selection change mid-flight does not affect the running request.
#[derive(Debug)]
pub struct Ticket {
    action: Action,
    files: Vec<ResumeFile>,
}

impl Ticket {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn files(&self) -> &[ResumeFile] {
        &self.files
    }

    /// The file single-file actions upload. `begin` guarantees it exists.
    pub fn primary(&self) -> &ResumeFile {
        &self.files[0]
    }
}

#[derive(Debug, Default)]
pub struct Session {
    mode: Mode,
    files: Vec<ResumeFile>,
    analysis: Option<AnalysisSnapshot>,
    comparison: Option<ComparisonResult>,
    active_tab: Tab,
    loading: Option<Action>,
    downloading: Option<Action>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Selection and view =====

    /// Replace the selection. Allowed while requests are in flight; in
    /// single mode only the first file is kept.
    pub fn select_files(&mut self, mut files: Vec<ResumeFile>) {
        if self.mode == Mode::Single {
            files.truncate(1);
        }
        self.files = files;
    }

    pub fn clear_selection(&mut self) -> Result<(), ClientError> {
        if self.is_busy() {
            return Err(ClientError::SelectionLocked);
        }
        self.files.clear();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode == Mode::Single {
            self.files.truncate(1);
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn files(&self) -> &[ResumeFile] {
        &self.files
    }

    pub fn analysis(&self) -> Option<&AnalysisSnapshot> {
        self.analysis.as_ref()
    }

    pub fn comparison(&self) -> Option<&ComparisonResult> {
        self.comparison.as_ref()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading() || self.is_downloading()
    }

    /// Action currently holding `slot`, if any.
    pub fn busy_with(&self, slot: Slot) -> Option<Action> {
        match slot {
            Slot::Loading => self.loading,
            Slot::Downloading => self.downloading,
        }
    }

    // ===== Transitions =====

    /// `idle -> requesting`
    pub fn begin(&mut self, action: Action) -> Result<Ticket, ClientError> {
        if let Some(running) = self.busy_with(action.slot()) {
            return Err(ClientError::Busy(running));
        }

        let files = match action {
            Action::Compare => {
                if self.files.len() < MIN_COMPARE_FILES {
                    return Err(ClientError::NotEnoughFiles {
                        selected: self.files.len(),
                        required: MIN_COMPARE_FILES,
                    });
                }
                self.files.clone()
            }
            _ => {
                let primary = self.files.first().ok_or(ClientError::NoFileSelected)?;
                vec![primary.clone()]
            }
        };

        *self.slot_mut(action.slot()) = Some(action);
        Ok(Ticket { action, files })
    }

    /// `requesting -> idle-with-result`
    pub fn complete_analysis(&mut self, ticket: Ticket, payload: AnalysisPayload) {
        self.analysis = Some(AnalysisSnapshot {
            file_name: ticket.primary().file_name.clone(),
            payload,
            analyzed_at: Utc::now(),
        });
        self.release(&ticket);
    }

    /// `requesting -> idle-with-result`
    pub fn complete_comparison(&mut self, ticket: Ticket, result: ComparisonResult) {
        self.comparison = Some(result);
        self.release(&ticket);
    }

    /// `requesting -> idle` after an artifact was saved
    pub fn complete_artifact(&mut self, ticket: Ticket) {
        self.release(&ticket);
    }

    /// `requesting -> idle`, keeping every previous result
    pub fn fail(&mut self, ticket: Ticket) {
        self.release(&ticket);
    }

    fn release(&mut self, ticket: &Ticket) {
        let slot = self.slot_mut(ticket.action.slot());
        if *slot == Some(ticket.action) {
            *slot = None;
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Action> {
        match slot {
            Slot::Loading => &mut self.loading,
            Slot::Downloading => &mut self.downloading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resume(name: &str) -> ResumeFile {
        ResumeFile::new(name, name.as_bytes().to_vec())
    }

    fn payload(completeness: u32) -> AnalysisPayload {
        AnalysisPayload::from_value(
            "/analyze",
            json!({
                "text_snippet": "",
                "skills_detected": [],
                "found_sections": [],
                "completeness": completeness,
                "suggestions": []
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_begin_requires_selection() {
        let mut session = Session::new();
        assert!(matches!(
            session.begin(Action::Analyze),
            Err(ClientError::NoFileSelected)
        ));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_same_slot_is_exclusive() {
        let mut session = Session::new();
        session.select_files(vec![resume("a.pdf")]);

        let ticket = session.begin(Action::Analyze).unwrap();
        assert!(session.is_loading());
        assert!(matches!(
            session.begin(Action::Analyze),
            Err(ClientError::Busy(Action::Analyze))
        ));

        session.complete_analysis(ticket, payload(50));
        assert!(!session.is_loading());
        assert!(session.begin(Action::Analyze).is_ok());
    }

    #[test]
    fn test_different_slots_overlap() {
        let mut session = Session::new();
        session.select_files(vec![resume("a.pdf")]);

        let analyze = session.begin(Action::Analyze).unwrap();
        let download = session.begin(Action::GenerateResume).unwrap();
        assert!(session.is_loading() && session.is_downloading());

        // Export shares the download slot.
        assert!(matches!(
            session.begin(Action::Export),
            Err(ClientError::Busy(Action::GenerateResume))
        ));

        session.fail(download);
        session.complete_analysis(analyze, payload(10));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let mut session = Session::new();
        session.select_files(vec![resume("a.pdf")]);

        let ticket = session.begin(Action::Analyze).unwrap();
        session.complete_analysis(ticket, payload(70));

        let ticket = session.begin(Action::Analyze).unwrap();
        session.fail(ticket);

        let snapshot = session.analysis().unwrap();
        assert_eq!(snapshot.payload.result.completeness, 70.0);
        assert_eq!(snapshot.file_name, "a.pdf");
    }

    #[test]
    fn test_compare_needs_two_files() {
        let mut session = Session::new();
        session.set_mode(Mode::Compare);

        for count in 0..MIN_COMPARE_FILES {
            let files = (0..count).map(|i| resume(&format!("{i}.pdf"))).collect();
            session.select_files(files);
            match session.begin(Action::Compare) {
                Err(ClientError::NotEnoughFiles { selected, required }) => {
                    assert_eq!(selected, count);
                    assert_eq!(required, 2);
                }
                other => panic!("unexpected: {other:?}"),
            }
            assert!(!session.is_busy());
        }

        session.select_files(vec![resume("a.pdf"), resume("b.docx")]);
        let ticket = session.begin(Action::Compare).unwrap();
        assert_eq!(ticket.files().len(), 2);
        session.complete_comparison(ticket, ComparisonResult::default());
        assert!(session.comparison().is_some());
    }

    #[test]
    fn test_reselect_mid_flight_keeps_ticket_files() {
        let mut session = Session::new();
        session.select_files(vec![resume("first.pdf")]);

        let ticket = session.begin(Action::Analyze).unwrap();
        session.select_files(vec![resume("second.pdf")]);
        assert!(matches!(
            session.clear_selection(),
            Err(ClientError::SelectionLocked)
        ));

        assert_eq!(ticket.primary().file_name, "first.pdf");
        session.complete_analysis(ticket, payload(20));
        assert_eq!(session.analysis().unwrap().file_name, "first.pdf");
        assert_eq!(session.files()[0].file_name, "second.pdf");

        session.clear_selection().unwrap();
        assert!(session.files().is_empty());
    }

    #[test]
    fn test_single_mode_keeps_first_file() {
        let mut session = Session::new();
        session.select_files(vec![resume("a.pdf"), resume("b.pdf")]);
        assert_eq!(session.files().len(), 1);

        session.set_mode(Mode::Compare);
        session.select_files(vec![resume("a.pdf"), resume("b.pdf"), resume("c.pdf")]);
        assert_eq!(session.files().len(), 3);

        session.set_mode(Mode::Single);
        assert_eq!(session.files().len(), 1);
        assert_eq!(session.files()[0].file_name, "a.pdf");
    }
}
