//! Workflow controller for the verification pipeline.
//!
//! Owns the upload → analyze → export/handoff state machine. This module is
//! pure state: it never performs I/O itself. Upload and analyze share the
//! single pipeline stage and both mutate the server file list, so at most
//! one of the two is in flight at a time; export and handoff carry their own
//! busy flags and run independently of the pipeline and of each other. Each operation is split into a
//! `begin_*` half that validates preconditions and returns the request payload
//! for the backend dispatcher, and an `apply_*` half that folds the backend
//! result back into the state. Every failure surfaces as a status line; no
//! operation panics or propagates out of the event loop.

use std::path::Path;

use sdlcv_core::error::VerifierError;
use sdlcv_core::score::{format_score, overall_score};
use sdlcv_core::types::{AnalysisReport, ProjectFile};

use crate::backend::types::{ReportPackage, UploadOutcome};

/// Pipeline stage. Forward transitions only happen through the `begin_*` /
/// `apply_*` pairs; failures revert to the recorded pre-call stage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// Local files selected, nothing uploaded.
    FilesSelected,
    /// Upload request in flight.
    Uploading,
    /// Server holds a file set; analysis can start.
    Uploaded,
    /// Analyze request in flight.
    Analyzing,
    /// A report exists; export and handoff become available.
    Analyzed,
}

/// Severity of a status-line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One status-line message. The status line is the only error surface of the
/// workflow; it is replaced wholesale by each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }
    fn success(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, text: text.into() }
    }
    fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }
}

/// All mutable workflow state. Mutated only on the UI thread.
///
/// Export and handoff are independent busy flags rather than stages: both
/// operate on the `Analyzed` plateau and must never block each other or the
/// main pipeline.
pub struct WorkflowState {
    pub stage: Stage,
    /// Locally selected files, replaced wholesale by each selection.
    pub local_files: Vec<ProjectFile>,
    /// Names of the files the server currently holds, replaced wholesale by
    /// each successful upload.
    pub server_files: Vec<String>,
    /// The current analysis snapshot. At most one exists; a failed re-analysis
    /// leaves the previous report intact.
    pub report: Option<AnalysisReport>,
    /// True while a PDF export request is in flight.
    pub exporting: bool,
    /// True while a send-to-reviewer request is in flight.
    pub handing_off: bool,
    /// Stage to revert to when an in-flight upload fails.
    resume_stage: Stage,
    /// Latest status-line message, if any.
    pub status: Option<StatusLine>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            stage: Stage::Idle,
            local_files: Vec::new(),
            server_files: Vec::new(),
            report: None,
            exporting: false,
            handing_off: false,
            resume_stage: Stage::Idle,
            status: None,
        }
    }
}

impl WorkflowState {
    /// Replaces the local selection wholesale and clears the status line.
    ///
    /// Allowed in any stage. A non-empty selection moves to `FilesSelected`;
    /// clearing the selection from `FilesSelected` falls back to `Idle`.
    /// Server files and any existing report are untouched.
    pub fn select_files(&mut self, files: Vec<ProjectFile>) {
        self.local_files = files;
        self.status = None;
        if !self.local_files.is_empty() {
            self.stage = Stage::FilesSelected;
        } else if self.stage == Stage::FilesSelected {
            self.stage = Stage::Idle;
        }
    }

    /// Validates and starts an upload.
    ///
    /// Returns the files to send, or `None` when validation failed (empty
    /// selection or another pipeline request already in flight); the reason is
    /// recorded on the status line. At most one upload is in flight at a time.
    pub fn begin_upload(&mut self) -> Option<Vec<ProjectFile>> {
        if matches!(self.stage, Stage::Uploading | Stage::Analyzing) {
            self.status = Some(StatusLine::error("Please wait for the current operation to finish"));
            return None;
        }
        if self.local_files.is_empty() {
            self.status = Some(StatusLine::error("Please select files first"));
            return None;
        }
        self.resume_stage = self.stage;
        self.stage = Stage::Uploading;
        self.status = Some(StatusLine::info("Uploading files..."));
        Some(self.local_files.clone())
    }

    /// Folds the upload result back into the state.
    ///
    /// Success replaces the server file list wholesale and moves to
    /// `Uploaded`. Failure reverts to the pre-call stage and records the
    /// error; the local selection is kept so the user can retry.
    pub fn apply_upload(&mut self, result: Result<UploadOutcome, VerifierError>) {
        match result {
            Ok(outcome) => {
                self.server_files = outcome.files;
                self.stage = Stage::Uploaded;
                self.status = Some(StatusLine::success(outcome.message));
            }
            Err(err) => {
                self.stage = self.resume_stage;
                self.status = Some(StatusLine::error(err.to_string()));
            }
        }
    }

    /// Validates and starts an analysis of the uploaded file set.
    ///
    /// Returns `true` when a request should be dispatched. Requires a
    /// non-empty server file list and no pipeline request in flight.
    pub fn begin_analyze(&mut self) -> bool {
        if matches!(self.stage, Stage::Uploading | Stage::Analyzing) {
            self.status = Some(StatusLine::error("Please wait for the current operation to finish"));
            return false;
        }
        if self.server_files.is_empty() {
            self.status = Some(StatusLine::error("Please upload files before analyzing"));
            return false;
        }
        self.stage = Stage::Analyzing;
        self.status = Some(StatusLine::info(
            "Analyzing project... this may take 30-60 seconds",
        ));
        true
    }

    /// Folds the analysis result back into the state.
    ///
    /// Success replaces the report wholesale (and the server file list, when
    /// the backend echoed one) and moves to `Analyzed`. Failure always
    /// reverts to `Uploaded`, leaving any previous report intact.
    pub fn apply_analyze(&mut self, result: Result<AnalysisReport, VerifierError>) {
        match result {
            Ok(report) => {
                if !report.files_analyzed.is_empty() {
                    self.server_files = report.files_analyzed.clone();
                }
                self.report = Some(report);
                self.stage = Stage::Analyzed;
                self.status = Some(StatusLine::success("Analysis complete"));
            }
            Err(err) => {
                self.stage = Stage::Uploaded;
                self.status = Some(StatusLine::error(err.to_string()));
            }
        }
    }

    /// Validates and starts a PDF export of the current report.
    ///
    /// Returns the packaged report, or `None` when no report exists or an
    /// export is already in flight. Exporting does not block analysis or
    /// handoff.
    pub fn begin_export(&mut self) -> Option<ReportPackage> {
        if self.exporting {
            self.status = Some(StatusLine::error("Report export already in progress"));
            return None;
        }
        let package = match self.package_report() {
            Some(p) => p,
            None => {
                self.status = Some(StatusLine::error("Run an analysis before exporting"));
                return None;
            }
        };
        self.exporting = true;
        self.status = Some(StatusLine::info("Generating PDF report..."));
        Some(package)
    }

    /// Folds the export result back into the state.
    pub fn apply_export(&mut self, result: Result<std::path::PathBuf, VerifierError>) {
        self.exporting = false;
        match result {
            Ok(path) => {
                self.status = Some(StatusLine::success(format!(
                    "Report saved to {}",
                    path.display()
                )));
            }
            Err(err) => {
                self.status = Some(StatusLine::error(err.to_string()));
            }
        }
    }

    /// Validates and starts a handoff of the current report to the reviewer
    /// service.
    ///
    /// Returns the packaged report, or `None` when no report exists or a
    /// handoff is already in flight. The handoff never touches the local
    /// reviewer queue.
    pub fn begin_handoff(&mut self) -> Option<ReportPackage> {
        if self.handing_off {
            self.status = Some(StatusLine::error("Already sending to reviewer"));
            return None;
        }
        let package = match self.package_report() {
            Some(p) => p,
            None => {
                self.status = Some(StatusLine::error("Run an analysis before sending to a reviewer"));
                return None;
            }
        };
        self.handing_off = true;
        self.status = Some(StatusLine::info("Sending report to reviewer..."));
        Some(package)
    }

    /// Folds the handoff result back into the state.
    pub fn apply_handoff(&mut self, result: Result<String, VerifierError>) {
        self.handing_off = false;
        match result {
            Ok(message) => {
                self.status = Some(StatusLine::success(message));
            }
            Err(err) => {
                self.status = Some(StatusLine::error(err.to_string()));
            }
        }
    }

    /// Formatted overall score of the current report, `"0.0"` when none exists.
    pub fn overall_score_label(&self) -> String {
        match &self.report {
            Some(report) => format_score(overall_score(&report.phases)),
            None => format_score(0.0),
        }
    }

    fn package_report(&self) -> Option<ReportPackage> {
        if self.stage != Stage::Analyzed {
            return None;
        }
        let report = self.report.clone()?;
        let overall_score = format_score(overall_score(&report.phases));
        let files = self.server_files.clone();
        Some(ReportPackage { report, overall_score, files })
    }
}

/// Reads project files from `path` for selection.
///
/// A regular file yields itself. A directory yields its immediate regular
/// files (no recursion), sorted by name. I/O problems surface as
/// `Validation` errors on the status line, never as panics.
pub fn load_project_files(path: &Path) -> Result<Vec<ProjectFile>, VerifierError> {
    let meta = std::fs::metadata(path)
        .map_err(|e| VerifierError::Validation(format!("Cannot read {}: {e}", path.display())))?;

    let mut paths = Vec::new();
    if meta.is_dir() {
        let entries = std::fs::read_dir(path)
            .map_err(|e| VerifierError::Validation(format!("Cannot read {}: {e}", path.display())))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| VerifierError::Validation(format!("Cannot read {}: {e}", path.display())))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                paths.push(entry.path());
            }
        }
        paths.sort();
        if paths.is_empty() {
            return Err(VerifierError::Validation(format!(
                "No files found in {}",
                path.display()
            )));
        }
    } else {
        paths.push(path.to_path_buf());
    }

    let mut files = Vec::with_capacity(paths.len());
    for p in paths {
        let content = std::fs::read(&p)
            .map_err(|e| VerifierError::Validation(format!("Cannot read {}: {e}", p.display())))?;
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string());
        let size = content.len() as u64;
        files.push(ProjectFile { name, content, size });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use sdlcv_core::types::PhaseResult;

    fn file(name: &str) -> ProjectFile {
        ProjectFile { name: name.into(), content: b"x".to_vec(), size: 1 }
    }

    fn report(score: f64) -> AnalysisReport {
        let mut phases = BTreeMap::new();
        phases.insert(
            "requirements".to_string(),
            PhaseResult { score: Some(score), ..Default::default() },
        );
        AnalysisReport { phases, files_analyzed: vec!["a.txt".into()] }
    }

    #[test]
    fn selection_replaces_wholesale() {
        let mut wf = WorkflowState::default();
        wf.select_files(vec![file("a.txt"), file("b.txt")]);
        assert_eq!(wf.stage, Stage::FilesSelected);
        wf.select_files(vec![file("c.txt")]);
        assert_eq!(wf.local_files.len(), 1);
        assert_eq!(wf.local_files[0].name, "c.txt");
    }

    #[test]
    fn upload_with_empty_selection_produces_no_request() {
        let mut wf = WorkflowState::default();
        assert!(wf.begin_upload().is_none());
        assert_eq!(wf.stage, Stage::Idle);
        let status = wf.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Please select files first");
    }

    #[test]
    fn upload_failure_reverts_and_keeps_selection() {
        let mut wf = WorkflowState::default();
        wf.select_files(vec![file("a.txt")]);
        assert!(wf.begin_upload().is_some());
        assert_eq!(wf.stage, Stage::Uploading);
        wf.apply_upload(Err(VerifierError::Network("connection refused".into())));
        assert_eq!(wf.stage, Stage::FilesSelected);
        assert_eq!(wf.local_files.len(), 1);
        assert_eq!(wf.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn upload_success_replaces_server_files() {
        let mut wf = WorkflowState::default();
        wf.select_files(vec![file("a.txt")]);
        wf.begin_upload();
        wf.apply_upload(Ok(UploadOutcome {
            message: "2 files uploaded".into(),
            files: vec!["a.txt".into(), "b.txt".into()],
        }));
        assert_eq!(wf.stage, Stage::Uploaded);
        assert_eq!(wf.server_files, vec!["a.txt", "b.txt"]);
        assert_eq!(wf.status.as_ref().unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn upload_and_analyze_are_serialized_with_each_other() {
        let mut wf = WorkflowState::default();
        wf.select_files(vec![file("a.txt")]);
        assert!(wf.begin_upload().is_some());
        assert!(!wf.begin_analyze(), "analyze must wait for the in-flight upload");
        assert_eq!(
            wf.status.as_ref().unwrap().text,
            "Please wait for the current operation to finish"
        );

        wf.apply_upload(Ok(UploadOutcome { message: "ok".into(), files: vec!["a.txt".into()] }));
        assert!(wf.begin_analyze());
        assert!(wf.begin_upload().is_none(), "upload must wait for the in-flight analysis");
    }

    #[test]
    fn analyze_requires_uploaded_files() {
        let mut wf = WorkflowState::default();
        assert!(!wf.begin_analyze());
        assert_eq!(wf.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn analyze_failure_keeps_previous_report() {
        let mut wf = WorkflowState::default();
        wf.select_files(vec![file("a.txt")]);
        wf.begin_upload();
        wf.apply_upload(Ok(UploadOutcome { message: "ok".into(), files: vec!["a.txt".into()] }));
        assert!(wf.begin_analyze());
        wf.apply_analyze(Ok(report(80.0)));
        assert_eq!(wf.stage, Stage::Analyzed);

        // A failed re-analysis reverts to Uploaded but the old report stays.
        assert!(wf.begin_analyze());
        wf.apply_analyze(Err(VerifierError::Backend("analysis failed".into())));
        assert_eq!(wf.stage, Stage::Uploaded);
        assert!(wf.report.is_some());
        assert_eq!(wf.overall_score_label(), "80.0");
    }

    #[test]
    fn export_requires_report() {
        let mut wf = WorkflowState::default();
        assert!(wf.begin_export().is_none());
        assert!(!wf.exporting);
    }

    #[test]
    fn export_and_handoff_do_not_block_each_other() {
        let mut wf = WorkflowState::default();
        wf.select_files(vec![file("a.txt")]);
        wf.begin_upload();
        wf.apply_upload(Ok(UploadOutcome { message: "ok".into(), files: vec!["a.txt".into()] }));
        wf.begin_analyze();
        wf.apply_analyze(Ok(report(70.0)));

        let export = wf.begin_export();
        assert!(export.is_some());
        let handoff = wf.begin_handoff();
        assert!(handoff.is_some(), "handoff must start while export is in flight");
        assert_eq!(export.unwrap().overall_score, "70.0");

        // Second export while one is in flight is rejected.
        assert!(wf.begin_export().is_none());
        wf.apply_export(Ok(std::path::PathBuf::from("out.pdf")));
        assert!(!wf.exporting);
        assert!(wf.handing_off);
    }
}
