//! Request and result types crossing the UI/backend boundary.
//!
//! Requests flow from the keybinding dispatcher to the backend task over a
//! tokio mpsc channel; results come back as `AppEvent::Backend` messages.
//! Everything here is fully owned and `Send`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sdlcv_core::error::VerifierError;
use sdlcv_core::types::{AnalysisReport, AuthSession, PhaseResult, ProjectFile, ReviewFeedback};

/// A unit of backend work requested by the UI.
#[derive(Debug)]
pub enum BackendRequest {
    /// Upload the selected files to the analysis server.
    Upload { files: Vec<ProjectFile> },
    /// Analyze the file set the server currently holds.
    Analyze,
    /// Generate a PDF for the packaged report and save it locally.
    GeneratePdf(ReportPackage),
    /// Hand the packaged report off to the reviewer service.
    SendToReviewer(ReportPackage),
    /// Ask the assistant a question.
    Chat { message: String },
    /// Sign in with an email/password credential. `reviewer` marks the
    /// pre-provisioned reviewer account so the session gets the role tag.
    SignIn { email: String, password: String, reviewer: bool },
    /// Register a new account.
    Register { email: String, password: String },
    /// Transmit composed reviewer feedback.
    SubmitReview(ReviewFeedback),
}

/// A report snapshot packaged for export or handoff.
///
/// The overall score is formatted at packaging time so the artifact carries
/// exactly what the user saw.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPackage {
    pub report: AnalysisReport,
    pub overall_score: String,
    pub files: Vec<String>,
}

/// Successful upload response, reduced to what the workflow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub message: String,
    pub files: Vec<String>,
}

/// A completed backend request, one variant per request family.
#[derive(Debug)]
pub enum BackendResult {
    Upload(Result<UploadOutcome, VerifierError>),
    Analyze(Result<AnalysisReport, VerifierError>),
    Export(Result<PathBuf, VerifierError>),
    Handoff(Result<String, VerifierError>),
    Chat(Result<String, VerifierError>),
    SignIn(Result<AuthSession, VerifierError>),
    Register(Result<String, VerifierError>),
    Review(Result<String, VerifierError>),
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// `POST /upload` response body.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// `POST /analyze` response body. `phases` absent or null marks a failed
/// analysis even on HTTP 200.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub phases: Option<BTreeMap<String, PhaseResult>>,
    #[serde(default)]
    pub files_analyzed: Option<Vec<String>>,
}

/// `POST /chat` response body. Backends answer under either key.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic acknowledgement body for handoff and review submission.
#[derive(Debug, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// JSON body for `POST /generate-pdf` and `POST /send-to-reviewer`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest<'a> {
    pub analysis_results: &'a BTreeMap<String, PhaseResult>,
    pub overall_score: &'a str,
    pub files_analyzed: &'a [String],
    /// Present only on handoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// JSON body for the auth endpoints.
#[derive(Debug, Serialize)]
pub struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `POST /auth/sign-in` response body.
#[derive(Debug, Deserialize)]
pub struct SignInResponse {
    pub user_id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Auth failure body carrying a provider error code.
#[derive(Debug, Deserialize)]
pub struct AuthFailure {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
