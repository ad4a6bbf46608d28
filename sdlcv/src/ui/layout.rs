//! Responsive layout engine for sdlcv.
//!
//! This module is pure layout arithmetic, no mutable application state lives
//! here. It is called inside `terminal.draw()` on every render so every frame
//! gets a fresh layout that automatically reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 80` columns the analyzer and chat views show a fixed-width workflow
//! sidebar next to the main panel. Below 80 columns the sidebar collapses and
//! the main panel fills the full width. Login and review views always use the
//! full area.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column and merge their
//! corner/junction Unicode box-drawing characters automatically.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::workflow::StatusKind;

/// Returns `[sidebar, main, status_bar]` `Rect`s for the current frame.
///
/// Called inside `terminal.draw()` on every render. The returned rects are
/// valid only for the current draw closure; never store them across frames.
///
/// # Responsive behaviour
///
/// | Terminal width | Layout |
/// |----------------|--------|
/// | `< 80` cols    | Sidebar collapsed; main panel fills full width |
/// | `>= 80` cols   | 34-column sidebar + main panel |
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    let term_width = frame.area().width;

    // Vertical split: main area (fills remaining height) + 1-row status bar.
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let horizontal = if term_width >= 80 {
        Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1))
    } else {
        Layout::horizontal([Constraint::Length(0), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1))
    };

    let [sidebar, main] = main_area.layout(&horizontal);

    [sidebar, main, status_bar]
}

/// Returns the full-height area above the status bar, for single-panel views.
pub fn full_layout(frame: &Frame) -> [Rect; 2] {
    frame
        .area()
        .layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]))
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on
/// each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Clamps a scroll offset to the last useful position for the content.
///
/// The keybindings use `u16::MAX` as a jump-to-bottom sentinel; an unclamped
/// offset passed to `Paragraph::scroll` would push every line above the
/// viewport and render the panel blank. Content shorter than the viewport
/// always clamps to zero.
pub fn clamp_scroll(offset: u16, line_count: usize, viewport_height: u16) -> u16 {
    let max = line_count.saturating_sub(viewport_height as usize);
    offset.min(max.min(u16::MAX as usize) as u16)
}

/// Builds a bordered `Block` for a panel.
///
/// Applies `BorderType::Thick` when the panel is focused (distinct active
/// border) and `BorderType::Plain` otherwise. Uses `MergeStrategy::Fuzzy`
/// because `Exact` produces incorrect junctions when mixing `Thick` and
/// `Plain` borders.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Always shows a mode indicator (`NORMAL` or `INSERT`) followed by the
/// latest workflow status message, colored by its kind. `HelpOverlay` and
/// `ConfirmQuit` both display `NORMAL` because the underlying mode is
/// `Normal`; the overlay is a transient visual layer, not a mode change.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::ConfirmQuit | Mode::HelpOverlay => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    if let Some(status) = &state.workflow.status {
        let fg = match status.kind {
            StatusKind::Info => theme.status_info,
            StatusKind::Success => theme.status_success,
            StatusKind::Error => theme.status_error,
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(fg)));
    }

    let status_line = Line::from(spans);

    frame.render_widget(
        Paragraph::new(status_line)
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_scroll_bounds_the_offset() {
        // Within range: unchanged.
        assert_eq!(clamp_scroll(3, 50, 20), 3);
        // Jump-to-bottom sentinel lands on the last page.
        assert_eq!(clamp_scroll(u16::MAX, 50, 20), 30);
        // Content shorter than the viewport never scrolls.
        assert_eq!(clamp_scroll(u16::MAX, 10, 20), 0);
        assert_eq!(clamp_scroll(5, 0, 20), 0);
    }
}
