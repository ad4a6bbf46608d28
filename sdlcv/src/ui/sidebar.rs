//! Workflow sidebar: pipeline progress, selected files, and key hints.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::workflow::Stage;

use super::layout::{inner_rect, panel_block};

/// Renders the workflow sidebar.
///
/// Shows the pipeline steps with the current one highlighted, the selected
/// and uploaded file lists, and the overall score once a report exists.
pub fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block(" Workflow ", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();

    for (label, reached, active) in pipeline_steps(state.workflow.stage) {
        let marker = if active {
            "▶"
        } else if reached {
            "●"
        } else {
            "○"
        };
        let style = if active {
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else if reached {
            Style::default().fg(theme.status_success)
        } else {
            Style::default().fg(theme.text_dim)
        };
        lines.push(Line::from(Span::styled(format!(" {marker} {label}"), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Selected files ({})", state.workflow.local_files.len()),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    if state.workflow.local_files.is_empty() {
        lines.push(Line::from(Span::styled(
            "   none (press o)",
            Style::default().fg(theme.text_dim),
        )));
    }
    for file in &state.workflow.local_files {
        lines.push(Line::from(Span::styled(
            format!("   {} ({} B)", file.name, file.size),
            Style::default().fg(theme.text),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Uploaded ({})", state.workflow.server_files.len()),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    for name in &state.workflow.server_files {
        lines.push(Line::from(Span::styled(
            format!("   {name}"),
            Style::default().fg(theme.text),
        )));
    }

    if state.workflow.report.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Overall score: ", Style::default().fg(theme.text)),
            Span::styled(
                state.workflow.overall_score_label(),
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    lines.push(Line::from(""));
    for hint in [
        " o select  u upload  a analyze",
        " p save pdf  s send to reviewer",
        " c chat  ? help  q quit",
    ] {
        lines.push(Line::from(Span::styled(hint, Style::default().fg(theme.text_dim))));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// `(label, reached, active)` for each pipeline step at `stage`.
fn pipeline_steps(stage: Stage) -> [(&'static str, bool, bool); 4] {
    let rank = match stage {
        Stage::Idle => 0,
        Stage::FilesSelected => 1,
        Stage::Uploading => 1,
        Stage::Uploaded => 2,
        Stage::Analyzing => 2,
        Stage::Analyzed => 3,
    };
    let busy = matches!(stage, Stage::Uploading | Stage::Analyzing);
    [
        ("Select files", rank >= 1, rank == 0),
        ("Upload", rank >= 2, rank == 1 && !busy || stage == Stage::Uploading),
        ("Analyze", rank >= 3, rank == 2 && !busy || stage == Stage::Analyzing),
        ("Export / share", false, rank == 3),
    ]
}
