//! Reviewer worklist and feedback drafting.
//!
//! Models the reviewer-facing side: a queue of shared bundles, a selection,
//! and one feedback draft bound to the current selection. Submission composes
//! an immutable `ReviewFeedback` and delegates transmission to the backend
//! dispatcher; it never mutates the bundle's status locally.

use sdlcv_core::error::VerifierError;
use sdlcv_core::types::{
    BundleStatus, FeedbackTag, Feeling, ReviewBundle, ReviewFeedback, SharedFile,
};
use std::collections::BTreeSet;

/// The in-progress feedback form.
///
/// Defaults match a fresh form: good impression, comfortable relying on the
/// report, clear + thorough pre-ticked, empty comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub feeling: Feeling,
    pub comfortable: bool,
    pub keywords: BTreeSet<FeedbackTag>,
    pub comment: String,
}

impl Default for FeedbackDraft {
    fn default() -> Self {
        Self {
            feeling: Feeling::Good,
            comfortable: true,
            keywords: BTreeSet::from([FeedbackTag::Clear, FeedbackTag::Thorough]),
            comment: String::new(),
        }
    }
}

/// The reviewer's worklist plus the single active draft.
pub struct ReviewQueue {
    pub bundles: Vec<ReviewBundle>,
    /// Index into `bundles`; always valid while the queue is non-empty.
    pub selected: usize,
    pub draft: FeedbackDraft,
    /// Latest submit outcome shown under the form.
    pub status: Option<String>,
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self {
            bundles: Vec::new(),
            selected: 0,
            draft: FeedbackDraft::default(),
            status: None,
        }
    }
}

impl ReviewQueue {
    /// Builds the demo worklist loaded when a reviewer signs in.
    pub fn demo() -> Self {
        Self {
            bundles: vec![
                ReviewBundle {
                    bundle_id: "BUNDLE-001".into(),
                    project_name: "ICU DSS Evaluation".into(),
                    model_name: "sepsis-triage-v2".into(),
                    domain: "Healthcare".into(),
                    status: BundleStatus::Pending,
                    shared_at: "2024-01-15".into(),
                    sharer_id: "dr_singh".into(),
                    notes: "Please focus on the testing phase coverage.".into(),
                    shared_files: vec![
                        SharedFile {
                            id: "F-01".into(),
                            name: "requirements.docx".into(),
                            kind: "Requirements".into(),
                        },
                        SharedFile {
                            id: "F-02".into(),
                            name: "validation_results.xlsx".into(),
                            kind: "Test results".into(),
                        },
                    ],
                },
                ReviewBundle {
                    bundle_id: "BUNDLE-002".into(),
                    project_name: "Credit Risk DSS".into(),
                    model_name: "credit-score-ensemble".into(),
                    domain: "Finance".into(),
                    status: BundleStatus::Reviewed,
                    shared_at: "2024-01-10".into(),
                    sharer_id: "risk_team".into(),
                    notes: "Second-round check after remediation.".into(),
                    shared_files: vec![SharedFile {
                        id: "F-03".into(),
                        name: "model_card.pdf".into(),
                        kind: "Documentation".into(),
                    }],
                },
            ],
            selected: 0,
            draft: FeedbackDraft::default(),
            status: None,
        }
    }

    /// The currently selected bundle, if any.
    pub fn current(&self) -> Option<&ReviewBundle> {
        self.bundles.get(self.selected)
    }

    /// Retargets the selection. The draft follows the selection without being
    /// cleared, so half-written feedback survives browsing the queue.
    pub fn select(&mut self, index: usize) {
        if index < self.bundles.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if !self.bundles.is_empty() {
            self.select((self.selected + 1).min(self.bundles.len() - 1));
        }
    }

    pub fn select_prev(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    pub fn set_feeling(&mut self, feeling: Feeling) {
        self.draft.feeling = feeling;
    }

    pub fn toggle_comfortable(&mut self) {
        self.draft.comfortable = !self.draft.comfortable;
    }

    pub fn toggle_keyword(&mut self, tag: FeedbackTag) {
        if !self.draft.keywords.remove(&tag) {
            self.draft.keywords.insert(tag);
        }
    }

    /// Validates the draft and composes the feedback for transmission.
    ///
    /// A blank comment fails validation and leaves the draft untouched. On
    /// success the comment is trimmed into the feedback, and only the comment
    /// is cleared from the draft; the structured answers stay for the next
    /// bundle. A later backend failure does not restore the comment.
    pub fn submit(&mut self, reviewer_id: &str) -> Result<ReviewFeedback, VerifierError> {
        let bundle = self.current().ok_or_else(|| {
            VerifierError::Validation("No report selected for review".into())
        })?;
        let comment = self.draft.comment.trim();
        if comment.is_empty() {
            return Err(VerifierError::Validation(
                "Please add a short comment so your feedback is useful".into(),
            ));
        }
        let feedback = ReviewFeedback {
            bundle_id: bundle.bundle_id.clone(),
            reviewer_id: reviewer_id.to_string(),
            feeling: self.draft.feeling,
            comfortable: self.draft.comfortable,
            keywords: self.draft.keywords.clone(),
            comment: comment.to_string(),
        };
        self.draft.comment.clear();
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_match_fresh_form() {
        let draft = FeedbackDraft::default();
        assert_eq!(draft.feeling, Feeling::Good);
        assert!(draft.comfortable);
        assert_eq!(
            draft.keywords,
            BTreeSet::from([FeedbackTag::Clear, FeedbackTag::Thorough])
        );
        assert!(draft.comment.is_empty());
    }

    #[test]
    fn empty_comment_blocks_submit_and_keeps_draft() {
        let mut queue = ReviewQueue::demo();
        queue.draft.feeling = Feeling::Great;
        queue.draft.comment = "   ".into();
        let err = queue.submit("reviewer-1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please add a short comment so your feedback is useful"
        );
        assert_eq!(queue.draft.feeling, Feeling::Great);
        assert_eq!(queue.draft.comment, "   ");
    }

    #[test]
    fn submit_clears_only_the_comment() {
        let mut queue = ReviewQueue::demo();
        queue.draft.comment = "  Solid coverage of testing.  ".into();
        queue.toggle_keyword(FeedbackTag::Realistic);
        let feedback = queue.submit("reviewer-1").unwrap();
        assert_eq!(feedback.bundle_id, "BUNDLE-001");
        assert_eq!(feedback.comment, "Solid coverage of testing.");
        assert!(feedback.keywords.contains(&FeedbackTag::Realistic));
        assert!(queue.draft.comment.is_empty());
        assert!(queue.draft.keywords.contains(&FeedbackTag::Realistic));
        assert!(queue.draft.comfortable);
    }

    #[test]
    fn submit_never_mutates_bundle_status() {
        let mut queue = ReviewQueue::demo();
        queue.draft.comment = "ok".into();
        queue.submit("reviewer-1").unwrap();
        assert_eq!(queue.bundles[0].status, BundleStatus::Pending);
    }

    #[test]
    fn selection_retargets_without_clearing_draft() {
        let mut queue = ReviewQueue::demo();
        queue.draft.comment = "half written".into();
        queue.select_next();
        assert_eq!(queue.selected, 1);
        assert_eq!(queue.draft.comment, "half written");
        queue.select_next();
        assert_eq!(queue.selected, 1, "selection clamps at the end");
        queue.select_prev();
        assert_eq!(queue.selected, 0);
    }
}
