//! UI rendering module for sdlcv.
//!
//! This is the module root for `ui/`. It re-exports `render()` as the single
//! entry point called by the event loop's `terminal.draw()` closure.
//!
//! All layout arithmetic lives in `layout.rs`. The workflow sidebar lives in
//! `sidebar.rs`, the results panel in `results.rs`, the chat in
//! `chat_view.rs`, the reviewer screen in `review_view.rs`, and the login
//! form in `login.rs`.

mod layout;
pub mod chat_view;
pub mod help;
pub mod keybindings;
pub mod login;
pub mod results;
pub mod review_view;
pub mod sidebar;

use ratatui::{
    layout::Constraint,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode, View};
use crate::theme::Theme;
use layout::{compute_layout, full_layout, inner_rect, panel_block, render_status_bar};

/// Renders one complete frame.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`. This
/// is the only location where `terminal.draw()` is called in the application;
/// never call it from anywhere else.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    match state.view {
        View::Login => {
            let [main, status_bar] = full_layout(frame);
            login::render_login(frame, main, state, theme);
            render_status_bar(frame, status_bar, state, theme);
        }
        View::Review => {
            let [main, status_bar] = full_layout(frame);
            review_view::render_review(frame, main, state, theme);
            render_status_bar(frame, status_bar, state, theme);
        }
        View::Analyzer | View::Chat => {
            let [sidebar, main, status_bar] = compute_layout(frame);
            if sidebar.width > 0 {
                sidebar::render_sidebar(frame, sidebar, state, theme);
            }
            match state.view {
                View::Chat => chat_view::render_chat(frame, main, state, theme),
                _ => results::render_results(frame, main, state, theme),
            }
            render_status_bar(frame, status_bar, state, theme);

            // Path prompt sits on top of the analyzer while typing a selection.
            if state.view == View::Analyzer && state.mode == Mode::Insert {
                render_path_prompt(frame, state, theme);
            }
        }
    }

    // Overlays render after all panels so they sit on top.
    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
    if state.mode == Mode::ConfirmQuit {
        render_confirm_quit(frame, theme);
    }
}

/// Renders the file-selection prompt as a small centred modal.
fn render_path_prompt(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame
        .area()
        .centered(Constraint::Percentage(60), Constraint::Length(3));
    frame.render_widget(Clear, area);

    let block = panel_block(" Project path (Enter to select, Esc to cancel) ", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            state.path_input.clone(),
            Style::default().fg(theme.text),
        ))),
        inner,
    );
    let x = inner.x + state.path_input.chars().count() as u16;
    frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
}

/// Renders the quit-confirmation dialog.
fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame
        .area()
        .centered(Constraint::Length(46), Constraint::Length(4));
    frame.render_widget(Clear, area);

    let block = panel_block(" Quit? ", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(" Your feedback comment has not been submitted."),
            Line::from(Span::styled(
                " y quit anyway · n keep working",
                Style::default().fg(theme.text_dim),
            )),
        ]),
        inner,
    );
}
