//! Keybinding dispatcher for sdlcv.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns
//! a `KeyAction` telling the event loop whether to continue, quit, or sign
//! out. The dispatcher branches first on `state.mode` so that HelpOverlay,
//! ConfirmQuit, Insert, and Normal all have isolated handler functions, then
//! on `state.view` within a mode.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent};

use sdlcv_core::types::{FeedbackTag, Feeling};

use crate::app::{AppState, Mode, View};
use crate::backend::types::BackendRequest;
use crate::session::{REVIEWER_EMAIL, REVIEWER_PASSWORD};
use crate::workflow::{load_project_files, StatusKind, StatusLine};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
    /// The user signed out; the event loop clears the persisted session.
    SignOut,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Mutates `state` in place and returns a `KeyAction` signalling whether to
/// continue or quit. The event loop should call this once per received key.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.view {
        View::Login => handle_login_normal(key, state),
        View::Analyzer => handle_analyzer_normal(key, state),
        View::Chat => handle_chat_normal(key, state),
        View::Review => handle_review_normal(key, state),
    }
}

fn handle_login_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('I') => {
            state.mode = Mode::Insert;
            KeyAction::Continue
        }
        KeyCode::Tab => {
            state.login.field = state.login.field.next(state.login.registering);
            KeyAction::Continue
        }
        KeyCode::Enter => {
            submit_login(state);
            KeyAction::Continue
        }
        KeyCode::Char('r') => {
            state.login.registering = !state.login.registering;
            state.login.status = None;
            KeyAction::Continue
        }
        KeyCode::Char('v') => {
            if !state.login.busy {
                state.login.busy = true;
                state.login.status = None;
                state.dispatch(BackendRequest::SignIn {
                    email: REVIEWER_EMAIL.to_string(),
                    password: REVIEWER_PASSWORD.to_string(),
                    reviewer: true,
                });
            }
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

fn handle_analyzer_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    match key.code {
        KeyCode::Char('o') => {
            state.path_input.clear();
            state.mode = Mode::Insert;
            KeyAction::Continue
        }
        KeyCode::Char('u') => {
            if let Some(files) = state.workflow.begin_upload() {
                state.dispatch(BackendRequest::Upload { files });
            }
            KeyAction::Continue
        }
        KeyCode::Char('a') => {
            if state.workflow.begin_analyze() {
                state.dispatch(BackendRequest::Analyze);
            }
            KeyAction::Continue
        }
        KeyCode::Char('p') => {
            if let Some(package) = state.workflow.begin_export() {
                state.dispatch(BackendRequest::GeneratePdf(package));
            }
            KeyAction::Continue
        }
        KeyCode::Char('s') => {
            if let Some(package) = state.workflow.begin_handoff() {
                state.dispatch(BackendRequest::SendToReviewer(package));
            }
            KeyAction::Continue
        }
        KeyCode::Char('c') => {
            state.toggle_chat();
            KeyAction::Continue
        }
        KeyCode::Char('R') => {
            if state.session.is_reviewer() {
                state.view = View::Review;
            }
            KeyAction::Continue
        }
        KeyCode::Char('S') => {
            state.sign_out();
            KeyAction::SignOut
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => quit_or_confirm(state),
        _ => KeyAction::Continue,
    }
}

fn handle_chat_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('I') => {
            state.mode = Mode::Insert;
            KeyAction::Continue
        }
        KeyCode::Char('c') => {
            state.toggle_chat();
            KeyAction::Continue
        }
        KeyCode::Char('j') => {
            state.chat_scroll = state.chat_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            state.chat_scroll = state.chat_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('g') => {
            state.chat_scroll = 0;
            KeyAction::Continue
        }
        KeyCode::Char('G') => {
            state.chat_scroll = u16::MAX;
            KeyAction::Continue
        }
        KeyCode::Char('S') => {
            state.sign_out();
            KeyAction::SignOut
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => quit_or_confirm(state),
        _ => KeyAction::Continue,
    }
}

fn handle_review_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            state.review.select_next();
            state.queue_state.select(Some(state.review.selected));
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            state.review.select_prev();
            state.queue_state.select(Some(state.review.selected));
            KeyAction::Continue
        }
        KeyCode::Char('1') => {
            state.review.set_feeling(Feeling::Great);
            KeyAction::Continue
        }
        KeyCode::Char('2') => {
            state.review.set_feeling(Feeling::Good);
            KeyAction::Continue
        }
        KeyCode::Char('3') => {
            state.review.set_feeling(Feeling::Unclear);
            KeyAction::Continue
        }
        KeyCode::Char('y') => {
            state.review.toggle_comfortable();
            KeyAction::Continue
        }
        KeyCode::Char('c') => {
            state.review.toggle_keyword(FeedbackTag::Clear);
            KeyAction::Continue
        }
        KeyCode::Char('t') => {
            state.review.toggle_keyword(FeedbackTag::Thorough);
            KeyAction::Continue
        }
        KeyCode::Char('r') => {
            state.review.toggle_keyword(FeedbackTag::Realistic);
            KeyAction::Continue
        }
        KeyCode::Char('h') => {
            state.review.toggle_keyword(FeedbackTag::TooHarsh);
            KeyAction::Continue
        }
        KeyCode::Char('s') => {
            state.review.toggle_keyword(FeedbackTag::TooSoft);
            KeyAction::Continue
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            state.mode = Mode::Insert;
            KeyAction::Continue
        }
        KeyCode::Enter => {
            let reviewer_id = state
                .session
                .current()
                .map(|s| s.user_id.clone())
                .unwrap_or_default();
            match state.review.submit(&reviewer_id) {
                Ok(feedback) => {
                    state.review.status = Some("Submitting feedback...".to_string());
                    state.dispatch(BackendRequest::SubmitReview(feedback));
                }
                Err(err) => {
                    state.review.status = Some(err.to_string());
                }
            }
            KeyAction::Continue
        }
        KeyCode::Char('R') => {
            state.view = View::Analyzer;
            KeyAction::Continue
        }
        KeyCode::Char('S') => {
            state.sign_out();
            KeyAction::SignOut
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => quit_or_confirm(state),
        _ => KeyAction::Continue,
    }
}

/// Handles scroll keys for the results panel: j / k / g / G.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when the key
/// should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('j') => {
            state.results_scroll = state.results_scroll.saturating_add(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('k') => {
            state.results_scroll = state.results_scroll.saturating_sub(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('g') => {
            state.results_scroll = 0;
            Some(KeyAction::Continue)
        }
        KeyCode::Char('G') => {
            state.results_scroll = u16::MAX;
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

/// Quits immediately unless an unsubmitted feedback comment exists, in which
/// case the confirmation dialog is shown first.
fn quit_or_confirm(state: &mut AppState) -> KeyAction {
    if !state.review.draft.comment.trim().is_empty() {
        state.mode = Mode::ConfirmQuit;
        KeyAction::Continue
    } else {
        KeyAction::Quit
    }
}

/// Validates the login form locally and dispatches the auth request.
fn submit_login(state: &mut AppState) {
    if state.login.busy {
        return;
    }
    if let Some(message) = state.login.validate() {
        state.login.status = Some(message);
        return;
    }
    state.login.busy = true;
    state.login.status = None;
    let email = state.login.email.trim().to_string();
    let password = state.login.password.clone();
    if state.login.registering {
        state.dispatch(BackendRequest::Register { email, password });
    } else {
        state.dispatch(BackendRequest::SignIn { email, password, reviewer: false });
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Any of `?`, `Esc`, or `q` dismisses the overlay; j/k/g/G scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            state.help_scroll = state.help_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('g') => {
            state.help_scroll = 0;
            KeyAction::Continue
        }
        KeyCode::Char('G') => {
            state.help_scroll = u16::MAX;
            KeyAction::Continue
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// `y` / `Y` confirms the quit; `n` / `N` / `Esc` cancels.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Routes typed text to the buffer owned by the current view.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.view {
        View::Login => handle_login_insert(key, state),
        View::Analyzer => handle_path_insert(key, state),
        View::Chat => handle_chat_insert(key, state),
        View::Review => handle_comment_insert(key, state),
    }
}

fn handle_login_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        KeyCode::Tab => {
            state.login.field = state.login.field.next(state.login.registering);
        }
        KeyCode::Enter => {
            submit_login(state);
        }
        KeyCode::Backspace => {
            state.login.active_buffer().pop();
        }
        KeyCode::Char(c) => {
            state.login.active_buffer().push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Path-prompt editing. Enter reads the path and replaces the selection.
fn handle_path_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            let path = state.path_input.trim().to_string();
            if path.is_empty() {
                return KeyAction::Continue;
            }
            match load_project_files(Path::new(&path)) {
                Ok(files) => {
                    let count = files.len();
                    state.workflow.select_files(files);
                    state.workflow.status = Some(StatusLine {
                        kind: StatusKind::Info,
                        text: format!("{count} file(s) selected"),
                    });
                }
                Err(err) => {
                    state.workflow.status = Some(StatusLine {
                        kind: StatusKind::Error,
                        text: err.to_string(),
                    });
                }
            }
        }
        KeyCode::Backspace => {
            state.path_input.pop();
        }
        KeyCode::Char(c) => {
            state.path_input.push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Chat-input editing. Enter sends the message and returns to Normal mode.
fn handle_chat_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            let input = state.chat_input.clone();
            if let Ok(message) = state.chat.send(&input) {
                state.chat_input.clear();
                state.chat_scroll = u16::MAX;
                state.dispatch(BackendRequest::Chat { message });
                state.mode = Mode::Normal;
            }
        }
        KeyCode::Backspace => {
            state.chat_input.pop();
        }
        KeyCode::Char(c) => {
            state.chat_input.push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Comment editing for the feedback form. Enter inserts a newline; Esc ends
/// editing (submission happens from Normal mode).
fn handle_comment_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            state.review.draft.comment.push('\n');
        }
        KeyCode::Backspace => {
            state.review.draft.comment.pop();
        }
        KeyCode::Char(c) => {
            state.review.draft.comment.push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn analyzer_state() -> (AppState, mpsc::UnboundedReceiver<BackendRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        state.view = View::Analyzer;
        (state, rx)
    }

    #[test]
    fn upload_without_selection_sends_no_request() {
        let (mut state, mut rx) = analyzer_state();
        assert_eq!(handle_key(press(KeyCode::Char('u')), &mut state), KeyAction::Continue);
        assert!(rx.try_recv().is_err(), "no backend request expected");
    }

    #[test]
    fn quit_guard_triggers_on_unsubmitted_comment() {
        let (mut state, _rx) = analyzer_state();
        state.review.draft.comment = "half written".into();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::ConfirmQuit);
        assert_eq!(handle_key(press(KeyCode::Char('n')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
        state.mode = Mode::ConfirmQuit;
        assert_eq!(handle_key(press(KeyCode::Char('y')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn quit_without_draft_is_immediate() {
        let (mut state, _rx) = analyzer_state();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn blank_chat_message_is_not_sent() {
        let (mut state, mut rx) = analyzer_state();
        state.view = View::Chat;
        state.mode = Mode::Insert;
        state.chat_input = "   ".into();
        handle_key(press(KeyCode::Enter), &mut state);
        assert!(rx.try_recv().is_err());
        assert_eq!(state.chat.messages.len(), 1, "transcript unchanged");
    }

    #[test]
    fn reviewer_shortcut_dispatches_sign_in() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        handle_key(press(KeyCode::Char('v')), &mut state);
        assert!(state.login.busy);
        match rx.try_recv() {
            Ok(BackendRequest::SignIn { email, reviewer, .. }) => {
                assert_eq!(email, REVIEWER_EMAIL);
                assert!(reviewer);
            }
            other => panic!("expected sign-in request, got {other:?}"),
        }
    }

    #[test]
    fn empty_feedback_comment_blocks_submission() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        state.view = View::Review;
        state.review = crate::review::ReviewQueue::demo();
        handle_key(press(KeyCode::Enter), &mut state);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            state.review.status.as_deref(),
            Some("Please add a short comment so your feedback is useful")
        );
    }
}
