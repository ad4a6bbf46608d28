//! Help overlay renderer.
//!
//! Draws a centred modal box over the existing layout using ratatui's `Clear`
//! widget to erase the background first. The overlay is rendered inside the
//! same `terminal.draw()` closure as all other panels.

use ratatui::{
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

use super::layout::clamp_scroll;

/// Renders the help overlay as a centred modal on top of the current view.
///
/// Erases the overlay area with `Clear`, then draws a bordered `Paragraph`
/// containing all keybinding descriptions, scrolled by `help_scroll` rows.
///
/// If the terminal is narrower than 60 columns the overlay is skipped to
/// avoid a zero-height `Rect` panic.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to dismiss) ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    let text = build_help_text();
    let scroll = clamp_scroll(
        help_scroll,
        text.lines.len(),
        overlay_area.height.saturating_sub(2),
    );
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        overlay_area,
    );
}

/// Builds the help text as a multi-line `Text` value, grouped by view.
fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Analyzer"),
        Line::from("  o             Enter a file or directory path to select"),
        Line::from("  u             Upload the selected files"),
        Line::from("  a             Analyze the uploaded files"),
        Line::from("  p             Save the report as a PDF"),
        Line::from("  s             Send the report to a reviewer"),
        Line::from("  c             Open / close the assistant chat"),
        Line::from("  j / k         Scroll results down / up"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from(""),
        Line::from("Chat"),
        Line::from("  i             Compose a message (Enter sends, Esc cancels)"),
        Line::from("  c             Back to the analyzer"),
        Line::from(""),
        Line::from("Review (reviewer accounts)"),
        Line::from("  j / k         Select the previous / next shared report"),
        Line::from("  1 / 2 / 3     Impression: very helpful / mostly okay / confusing"),
        Line::from("  y             Toggle \"comfortable relying on this report\""),
        Line::from("  c t r h s     Toggle keyword tags"),
        Line::from("  i             Edit the comment (Enter adds a newline)"),
        Line::from("  Enter         Submit the feedback"),
        Line::from("  R             Back to the analyzer"),
        Line::from(""),
        Line::from("General"),
        Line::from("  R             Open the review worklist (reviewer accounts)"),
        Line::from("  S             Sign out"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit (confirms if a feedback comment is unsubmitted)"),
    ])
}
