//! Central application state for sdlcv.
//!
//! This module owns all mutable UI state: the current mode and view, the
//! workflow controller, the chat transcript, the reviewer queue, the session
//! manager, input buffers, and per-view scroll offsets. No ratatui rendering
//! logic lives here: `app.rs` is pure state that is read by the render module
//! and mutated by the keybinding dispatcher and backend results.

use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use sdlcv_core::types::AuthSession;

use crate::backend::types::{BackendRequest, BackendResult};
use crate::chat::Conversation;
use crate::review::ReviewQueue;
use crate::session::SessionManager;
use crate::workflow::WorkflowState;

/// Editor mode controlling which keybinding set is active.
///
/// The default mode is `Normal`. Transitions are driven by the keybinding
/// dispatcher.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal vim-style navigation mode (default).
    #[default]
    Normal,
    /// Text insertion mode for the active input buffer.
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown when an unsubmitted feedback comment exists.
    ConfirmQuit,
}

/// Which screen is currently shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Sign-in / registration screen (no session yet).
    #[default]
    Login,
    /// The verification workflow: sidebar + results panel.
    Analyzer,
    /// The assistant chat, replacing the results panel.
    Chat,
    /// The reviewer worklist and feedback form.
    Review,
}

/// Which login form field currently receives typed characters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
    /// Repeat-password field, present only while registering.
    Repeat,
}

impl LoginField {
    /// Cycles to the next field. `Repeat` participates only while registering.
    pub fn next(self, registering: bool) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password if registering => LoginField::Repeat,
            LoginField::Password => LoginField::Email,
            LoginField::Repeat => LoginField::Email,
        }
    }
}

/// State of the sign-in / registration form.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub repeat: String,
    /// True when the form is in registration mode (repeat field shown).
    pub registering: bool,
    pub field: LoginField,
    /// Latest auth status or error message.
    pub status: Option<String>,
    /// True while a sign-in or register request is in flight.
    pub busy: bool,
}

impl LoginForm {
    /// Local validation before any network call.
    ///
    /// Returns the validation message to display, or `None` when the form is
    /// ready to submit.
    pub fn validate(&self) -> Option<String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Some("Please fill in all fields".to_string());
        }
        if self.registering {
            if self.repeat.is_empty() {
                return Some("Please fill in all fields".to_string());
            }
            if self.password != self.repeat {
                return Some("Passwords do not match!".to_string());
            }
        }
        None
    }

    /// The input buffer for the active field.
    pub fn active_buffer(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::Repeat => &mut self.repeat,
        }
    }
}

/// All mutable application state passed through every render cycle.
///
/// The render function receives a single mutable reference (scroll state is
/// cached during render) and the keybinding dispatcher mutates it in place.
pub struct AppState {
    pub mode: Mode,
    pub view: View,
    pub workflow: WorkflowState,
    pub chat: Conversation,
    pub review: ReviewQueue,
    pub session: SessionManager,
    pub login: LoginForm,

    /// Path typed into the file-selection prompt.
    pub path_input: String,
    /// Message being composed in the chat input.
    pub chat_input: String,

    /// Stateful list widget backing the reviewer queue.
    pub queue_state: ListState,
    /// Vertical scroll offset of the results panel.
    pub results_scroll: u16,
    /// Vertical scroll offset of the chat transcript.
    pub chat_scroll: u16,
    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,

    /// Request channel into the backend dispatcher task.
    backend_tx: mpsc::UnboundedSender<BackendRequest>,
}

/// Persistence side effect produced by folding a backend result.
///
/// The event loop owns the database connection, so `apply_backend` reports
/// what should be persisted instead of doing the write itself.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEffect {
    /// A sign-in succeeded; persist this session.
    Persist(AuthSession),
}

impl AppState {
    /// Builds the initial state from a restored session (if any).
    ///
    /// A restored reviewer session opens directly on the review worklist; any
    /// other session opens the analyzer; no session opens the login screen.
    pub fn new(
        backend_tx: mpsc::UnboundedSender<BackendRequest>,
        restored: Option<AuthSession>,
    ) -> Self {
        let session = SessionManager::restore(restored);
        let (view, review) = if session.is_reviewer() {
            (View::Review, ReviewQueue::demo())
        } else if session.is_signed_in() {
            (View::Analyzer, ReviewQueue::default())
        } else {
            (View::Login, ReviewQueue::default())
        };
        let mut queue_state = ListState::default();
        if !review.bundles.is_empty() {
            queue_state.select(Some(0));
        }
        Self {
            mode: Mode::default(),
            view,
            workflow: WorkflowState::default(),
            chat: Conversation::default(),
            review,
            session,
            login: LoginForm::default(),
            path_input: String::new(),
            chat_input: String::new(),
            queue_state,
            results_scroll: 0,
            chat_scroll: 0,
            help_scroll: 0,
            backend_tx,
        }
    }

    /// Sends a request to the backend dispatcher.
    ///
    /// A send failure means the dispatcher is gone, which only happens during
    /// shutdown; the request is silently dropped.
    pub fn dispatch(&self, request: BackendRequest) {
        let _ = self.backend_tx.send(request);
    }

    /// Switches between the analyzer and the chat without touching either
    /// view's content.
    pub fn toggle_chat(&mut self) {
        self.view = match self.view {
            View::Analyzer => View::Chat,
            View::Chat => View::Analyzer,
            other => other,
        };
    }

    /// Signs the user out in memory and returns to the login screen.
    ///
    /// Clearing the persisted session is the event loop's job (it owns the
    /// database connection).
    pub fn sign_out(&mut self) {
        self.session.clear();
        self.login = LoginForm::default();
        self.view = View::Login;
        self.mode = Mode::Normal;
    }

    /// Folds a completed backend request into the state.
    ///
    /// Returns a persistence effect when the session store should be updated.
    pub fn apply_backend(&mut self, result: BackendResult) -> Option<SessionEffect> {
        match result {
            BackendResult::Upload(result) => {
                self.workflow.apply_upload(result);
                None
            }
            BackendResult::Analyze(result) => {
                self.workflow.apply_analyze(result);
                None
            }
            BackendResult::Export(result) => {
                self.workflow.apply_export(result);
                None
            }
            BackendResult::Handoff(result) => {
                self.workflow.apply_handoff(result);
                None
            }
            BackendResult::Chat(result) => {
                self.chat.apply_reply(result);
                None
            }
            BackendResult::SignIn(result) => {
                self.login.busy = false;
                match result {
                    Ok(session) => {
                        self.session.set(session.clone());
                        self.login = LoginForm::default();
                        if self.session.is_reviewer() {
                            self.review = ReviewQueue::demo();
                            self.queue_state.select(Some(0));
                            self.view = View::Review;
                        } else {
                            self.view = View::Analyzer;
                        }
                        Some(SessionEffect::Persist(session))
                    }
                    Err(err) => {
                        self.login.status = Some(err.to_string());
                        None
                    }
                }
            }
            BackendResult::Register(result) => {
                self.login.busy = false;
                match result {
                    Ok(message) => {
                        self.login.status = Some(message);
                        self.login.registering = false;
                        self.login.repeat.clear();
                        self.login.field = LoginField::Email;
                    }
                    Err(err) => {
                        self.login.status = Some(err.to_string());
                    }
                }
                None
            }
            BackendResult::Review(result) => {
                self.review.status = Some(match result {
                    Ok(message) => message,
                    Err(err) => err.to_string(),
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use sdlcv_core::types::{AnalysisReport, PhaseResult};

    fn test_state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        state.view = View::Analyzer;
        state
    }

    #[test]
    fn toggling_chat_preserves_transcript_and_report() {
        let mut state = test_state();
        let mut phases = BTreeMap::new();
        phases.insert(
            "design".to_string(),
            PhaseResult { score: Some(75.0), ..Default::default() },
        );
        state.workflow.report = Some(AnalysisReport { phases, files_analyzed: vec![] });
        state.chat.send("hello").unwrap();
        state.chat.apply_reply(Ok("hi there".into()));

        state.toggle_chat();
        assert_eq!(state.view, View::Chat);
        state.toggle_chat();
        assert_eq!(state.view, View::Analyzer);

        assert_eq!(state.chat.messages.len(), 3);
        assert!(state.workflow.report.is_some());
    }

    #[test]
    fn reviewer_sign_in_opens_review_view_and_persists() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        assert_eq!(state.view, View::Login);

        let session = AuthSession {
            user_id: "rev-1".into(),
            role: Some("reviewer".into()),
            signed_in_at: 0,
        };
        let effect = state.apply_backend(BackendResult::SignIn(Ok(session.clone())));
        assert_eq!(effect, Some(SessionEffect::Persist(session)));
        assert_eq!(state.view, View::Review);
        assert_eq!(state.review.bundles.len(), 2);
    }

    #[test]
    fn failed_sign_in_surfaces_status() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        state.login.busy = true;
        let effect = state.apply_backend(BackendResult::SignIn(Err(
            sdlcv_core::error::AuthError::WrongPassword.into(),
        )));
        assert!(effect.is_none());
        assert!(!state.login.busy);
        assert_eq!(state.login.status.as_deref(), Some("Incorrect password!"));
        assert_eq!(state.view, View::Login);
    }

    #[test]
    fn restored_reviewer_session_opens_on_worklist() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let state = AppState::new(
            tx,
            Some(AuthSession {
                user_id: "rev-1".into(),
                role: Some("reviewer".into()),
                signed_in_at: 0,
            }),
        );
        assert_eq!(state.view, View::Review);
        assert_eq!(state.queue_state.selected(), Some(0));
    }

    #[test]
    fn login_form_validation() {
        let mut form = LoginForm::default();
        assert_eq!(form.validate().as_deref(), Some("Please fill in all fields"));
        form.email = "a@b.com".into();
        form.password = "secret".into();
        assert!(form.validate().is_none());
        form.registering = true;
        form.repeat = "different".into();
        assert_eq!(form.validate().as_deref(), Some("Passwords do not match!"));
    }
}
