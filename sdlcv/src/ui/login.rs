//! Sign-in / registration screen.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::{AppState, LoginField, Mode};
use crate::theme::Theme;

use super::layout::{inner_rect, panel_block};

/// Renders the login screen as a centred form.
pub fn render_login(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let form_area = area.centered(Constraint::Length(52), Constraint::Length(16));
    frame.render_widget(Clear, form_area);

    let title = if state.login.registering { " Register " } else { " Sign in " };
    let block = panel_block(title, true, theme);
    let inner = inner_rect(form_area);
    frame.render_widget(block, form_area);

    let dim = Style::default().fg(theme.text_dim);

    let mut lines = vec![
        Line::from(Span::styled(
            " SDLC Verification Assistant",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field_row("Email", &state.login.email, false, state.login.field == LoginField::Email, state, theme),
        field_row("Password", &state.login.password, true, state.login.field == LoginField::Password, state, theme),
    ];

    if state.login.registering {
        lines.push(field_row(
            "Repeat",
            &state.login.repeat,
            true,
            state.login.field == LoginField::Repeat,
            state,
            theme,
        ));
    }

    lines.push(Line::from(""));
    if state.login.busy {
        lines.push(Line::from(Span::styled(" Please wait...", dim)));
    } else if let Some(status) = &state.login.status {
        lines.push(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(theme.status_error),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Tab next field · Enter submit", dim)));
    let toggle = if state.login.registering {
        " r switch to sign-in"
    } else {
        " r switch to registration"
    };
    lines.push(Line::from(Span::styled(toggle, dim)));
    lines.push(Line::from(Span::styled(" v sign in as the demo reviewer", dim)));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_row(
    label: &str,
    value: &str,
    mask: bool,
    active: bool,
    state: &AppState,
    theme: &Theme,
) -> Line<'static> {
    let shown = if mask { "•".repeat(value.chars().count()) } else { value.to_string() };
    let marker = if active && state.mode == Mode::Insert { "▌" } else { "" };
    let label_style = if active {
        Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(format!(" {label:>8}: "), label_style),
        Span::styled(shown, Style::default().fg(theme.text)),
        Span::styled(marker, Style::default().fg(theme.highlight)),
    ])
}
