//! Chat panel: the assistant transcript and the input line.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use sdlcv_core::types::Role;

use crate::app::{AppState, Mode};
use crate::theme::Theme;

use super::layout::{clamp_scroll, inner_rect, panel_block};

/// Renders the chat view: scrolling transcript above a 3-row input box.
pub fn render_chat(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [transcript_area, input_area] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]));

    render_transcript(frame, transcript_area, state, theme);
    render_input(frame, input_area, state, theme);
}

fn render_transcript(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block(" SDLC Assistant ", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for message in &state.chat.messages {
        let (label, fg) = match message.role {
            Role::Ai => ("assistant", theme.chat_ai),
            Role::User => ("you", theme.chat_user),
        };
        lines.push(Line::from(Span::styled(
            format!("{label}:"),
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        )));
        for row in message.content.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {row}"),
                Style::default().fg(theme.text),
            )));
        }
        lines.push(Line::from(""));
    }
    if state.chat.awaiting_reply {
        lines.push(Line::from(Span::styled(
            "assistant is thinking...",
            Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
        )));
    }

    let scroll = clamp_scroll(state.chat_scroll, lines.len(), inner.height);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        inner,
    );
}

fn render_input(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let focused = state.mode == Mode::Insert;
    let title = if focused {
        " Message (Enter to send, Esc to cancel) "
    } else {
        " Message (press i to type) "
    };
    let block = panel_block(title, focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let text = if state.chat_input.is_empty() && !focused {
        Span::styled("Ask about your analysis results...", Style::default().fg(theme.text_dim))
    } else {
        Span::styled(state.chat_input.clone(), Style::default().fg(theme.text))
    };
    frame.render_widget(Paragraph::new(Line::from(text)), inner);

    if focused {
        let x = inner.x + state.chat_input.chars().count() as u16;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc;

    use crate::app::View;

    fn rendered_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn jump_to_bottom_keeps_transcript_on_screen() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, None);
        state.view = View::Chat;
        state.chat.send("hello there").unwrap();
        state.chat.apply_reply(Ok("hi back".into()));
        state.chat_scroll = u16::MAX;
        let theme = Theme::dark();

        terminal
            .draw(|frame| crate::ui::render(frame, &mut state, &theme))
            .unwrap();

        let content = rendered_text(&terminal);
        assert!(
            content.contains("hi back"),
            "latest reply must stay visible after jumping to the bottom"
        );
    }
}
