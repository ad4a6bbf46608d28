//! Owned data types for the verification workflow.
//!
//! All types in this module are fully owned (no borrowed lifetimes) and
//! implement `Send` so they can be carried on the event channel between the
//! backend tasks and the main UI thread without arena allocation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// A locally selected project file, held in memory until uploaded.
///
/// Selection always replaces the previous batch wholesale; there is no
/// incremental accumulation across selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    /// Base name of the file (no directory components).
    pub name: String,
    /// Raw file bytes, read at selection time.
    pub content: Vec<u8>,
    /// Size in bytes, recorded at selection time.
    pub size: u64,
}

/// One lifecycle phase's analysis result as returned by the backend.
///
/// The phase-key set is backend-defined and open; a result either carries a
/// free-form `analysis` text or structured strengths/recommendations lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    /// Score in the backend's 0–100 contract. `None` when the backend omitted
    /// it or sent something non-numeric; aggregation treats `None` as 0.
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Free-form analysis text. When present, it replaces the structured
    /// strengths/recommendations display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// Accepts a score as a JSON number, a numeric string, or absent/other.
///
/// The backend's own contract is numeric, but responses with stringly-typed
/// scores must not fail the whole report; anything non-numeric decodes to
/// `None`.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// The current analysis snapshot: one result per phase plus the server-side
/// file list the analysis covered.
///
/// Replaced wholesale by each successful analyze call - there is never more
/// than one current report, and the overall score is always derived from it
/// (see [`crate::score::overall_score`]), never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub phases: BTreeMap<String, PhaseResult>,
    #[serde(default)]
    pub files_analyzed: Vec<String>,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ai,
    User,
}

/// One entry in the append-only conversation transcript.
///
/// Messages are never edited, removed, or reordered after being appended -
/// failure fallbacks are appended like any other assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Review status of a shared bundle. Transitions one way: Pending → Reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStatus {
    Pending,
    Reviewed,
}

/// A file attached to a shared verification bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    pub id: String,
    pub name: String,
    /// Document category, e.g. "Requirements" or "Test results".
    pub kind: String,
}

/// A packaged verification report shared with a reviewer for feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewBundle {
    pub bundle_id: String,
    pub project_name: String,
    pub model_name: String,
    pub domain: String,
    pub status: BundleStatus,
    /// Backend-supplied share timestamp, kept verbatim for display.
    pub shared_at: String,
    pub sharer_id: String,
    pub notes: String,
    pub shared_files: Vec<SharedFile>,
}

/// Overall impression a reviewer reports about a verification report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feeling {
    Great,
    Good,
    Unclear,
}

/// Keyword tags a reviewer can attach to their feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackTag {
    Clear,
    Thorough,
    Realistic,
    TooHarsh,
    TooSoft,
}

/// Structured reviewer feedback, immutable once composed.
///
/// Submission hands this to the reviewer backend; it never mutates the
/// originating [`ReviewBundle`] locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFeedback {
    pub bundle_id: String,
    pub reviewer_id: String,
    pub feeling: Feeling,
    pub comfortable: bool,
    pub keywords: BTreeSet<FeedbackTag>,
    /// Non-empty by construction - validated before the feedback is composed.
    pub comment: String,
}

/// The process-wide authentication identity.
///
/// Written only by the session manager on sign-in/out; all other components
/// read it through the manager's accessor rather than ambient storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Opaque user id issued by the identity provider.
    pub user_id: String,
    /// Optional role tag; the pre-provisioned reviewer account carries
    /// `"reviewer"`.
    pub role: Option<String>,
    /// Unix timestamp (seconds) of the sign-in that produced this session.
    pub signed_in_at: i64,
}

impl AuthSession {
    /// Returns `true` when the session carries the reviewer role tag.
    pub fn is_reviewer(&self) -> bool {
        self.role.as_deref() == Some("reviewer")
    }
}
