//! Results panel: the welcome screen or the per-phase analysis report.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use sdlcv_core::types::{AnalysisReport, PhaseResult};

use crate::app::AppState;
use crate::theme::{phase_visual, Theme};

use super::layout::{clamp_scroll, inner_rect, panel_block};

/// Renders the results panel.
///
/// Before the first analysis this is a welcome screen with usage steps; once
/// a report exists it shows the overall score and one card per phase. The
/// panel scrolls by `results_scroll` rows.
pub fn render_results(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block(" Analysis Results ", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let lines = match &state.workflow.report {
        Some(report) => report_lines(report, state, theme),
        None => welcome_lines(theme),
    };

    let scroll = clamp_scroll(state.results_scroll, lines.len(), inner.height);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        inner,
    );
}

fn welcome_lines(theme: &Theme) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme.text_dim);
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome to the SDLC Verification Assistant",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Analyze your project's lifecycle documentation phase by phase:",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled("  1. Press o and enter a file or directory path", dim)),
        Line::from(Span::styled("  2. Press u to upload the selected files", dim)),
        Line::from(Span::styled("  3. Press a to run the analysis", dim)),
        Line::from(Span::styled("  4. Press p to save a PDF report, or s to share it", dim)),
        Line::from(""),
        Line::from(Span::styled(
            "  Press c at any time to ask the analysis assistant a question.",
            dim,
        )),
    ]
}

fn report_lines(report: &AnalysisReport, state: &AppState, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Overall score: ", Style::default().fg(theme.text)),
        Span::styled(
            state.workflow.overall_score_label(),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" / 100", Style::default().fg(theme.text_dim)),
    ]));
    if !report.files_analyzed.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  Files analyzed: {}", report.files_analyzed.join(", ")),
            Style::default().fg(theme.text_dim),
        )));
    }
    lines.push(Line::from(""));

    for (key, phase) in &report.phases {
        lines.extend(phase_card(key, phase, theme));
    }

    lines
}

/// Renders one phase as a titled card of lines.
fn phase_card(key: &str, phase: &PhaseResult, theme: &Theme) -> Vec<Line<'static>> {
    let visual = phase_visual(key);
    let accent = Style::default().fg(visual.color).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(theme.text_dim);
    let body = Style::default().fg(theme.text);

    let mut title = title_case(key);
    if let Some(score) = phase.score {
        title = format!("{title}  {score:.0}/100");
    }

    let mut lines = vec![Line::from(Span::styled(
        format!("  {} {}", visual.icon, title),
        accent,
    ))];

    // Free-form analysis text replaces the structured lists when present.
    if let Some(analysis) = &phase.analysis {
        for row in analysis.lines() {
            lines.push(Line::from(Span::styled(format!("    {row}"), body)));
        }
    } else {
        lines.push(Line::from(Span::styled("    Strengths", body)));
        if phase.strengths.is_empty() {
            lines.push(Line::from(Span::styled("      No strengths identified", dim)));
        }
        for item in &phase.strengths {
            lines.push(Line::from(Span::styled(format!("      + {item}"), body)));
        }
        lines.push(Line::from(Span::styled("    Recommendations", body)));
        if phase.recommendations.is_empty() {
            lines.push(Line::from(Span::styled("      No recommendations", dim)));
        }
        for item in &phase.recommendations {
            lines.push(Line::from(Span::styled(format!("      - {item}"), body)));
        }
    }

    lines.push(Line::from(""));
    lines
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
