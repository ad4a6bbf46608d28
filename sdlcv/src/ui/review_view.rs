//! Reviewer view: shared-bundle worklist, bundle details, and feedback form.

use ratatui::{
    layout::{Constraint, Layout, Rect, Spacing},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use sdlcv_core::types::{BundleStatus, FeedbackTag, Feeling};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

use super::layout::{inner_rect, panel_block};

/// Renders the reviewer screen: worklist on the left, details and feedback
/// form on the right.
pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [queue_area, detail_area] = area.layout(
        &Layout::horizontal([Constraint::Length(38), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1)),
    );

    render_queue(frame, queue_area, state, theme);
    render_detail(frame, detail_area, state, theme);
}

fn render_queue(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let block = panel_block(" Shared Reports ", false, theme);

    let items: Vec<ListItem> = state
        .review
        .bundles
        .iter()
        .map(|bundle| {
            let (badge, badge_fg) = match bundle.status {
                BundleStatus::Pending => ("PENDING", theme.badge_pending),
                BundleStatus::Reviewed => ("REVIEWED", theme.badge_reviewed),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        bundle.project_name.clone(),
                        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(badge, Style::default().fg(badge_fg)),
                ]),
                Line::from(Span::styled(
                    format!("{} · {} · {}", bundle.bundle_id, bundle.domain, bundle.shared_at),
                    Style::default().fg(theme.text_dim),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");

    frame.render_stateful_widget(list, area, &mut state.queue_state);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block(" Review ", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let bundle = match state.review.current() {
        Some(b) => b,
        None => {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  No reports have been shared with you yet.",
                    Style::default().fg(theme.text_dim),
                ))),
                inner,
            );
            return;
        }
    };

    let bold = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let body = Style::default().fg(theme.text);
    let dim = Style::default().fg(theme.text_dim);

    let mut lines = vec![
        Line::from(Span::styled(format!("  {}", bundle.project_name), bold)),
        Line::from(Span::styled(
            format!("  {} · {} · shared by {}", bundle.model_name, bundle.domain, bundle.sharer_id),
            dim,
        )),
        Line::from(""),
        Line::from(Span::styled(format!("  Notes: {}", bundle.notes), body)),
        Line::from(Span::styled("  Attached files:", body)),
    ];
    for file in &bundle.shared_files {
        lines.push(Line::from(Span::styled(
            format!("    {} ({})", file.name, file.kind),
            dim,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Your feedback", bold)));
    lines.push(feeling_row(state, theme));
    lines.push(Line::from(vec![
        Span::styled("  [y] Comfortable relying on this report: ", body),
        Span::styled(
            if state.review.draft.comfortable { "yes" } else { "no" },
            Style::default().fg(theme.highlight),
        ),
    ]));
    lines.push(keywords_row(state, theme));

    lines.push(Line::from(""));
    let comment_title = if state.mode == Mode::Insert {
        "  Comment (Enter for newline, Esc when done):"
    } else {
        "  Comment (press i to edit):"
    };
    lines.push(Line::from(Span::styled(comment_title, body)));
    if state.review.draft.comment.is_empty() {
        lines.push(Line::from(Span::styled("    (required)", dim)));
    }
    for row in state.review.draft.comment.lines() {
        lines.push(Line::from(Span::styled(format!("    {row}"), body)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Enter submits · j/k select report · R back", dim)));
    if let Some(status) = &state.review.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(theme.status_info),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn feeling_row(state: &AppState, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "  Impression: ",
        Style::default().fg(theme.text),
    )];
    for (key, feeling, label) in [
        ("1", Feeling::Great, "Very helpful"),
        ("2", Feeling::Good, "Mostly okay"),
        ("3", Feeling::Unclear, "Confusing"),
    ] {
        let selected = state.review.draft.feeling == feeling;
        let style = if selected {
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };
        spans.push(Span::styled(format!("[{key}] {label}  "), style));
    }
    Line::from(spans)
}

fn keywords_row(state: &AppState, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled("  Keywords: ", Style::default().fg(theme.text))];
    for (key, tag, label) in [
        ("c", FeedbackTag::Clear, "clear"),
        ("t", FeedbackTag::Thorough, "thorough"),
        ("r", FeedbackTag::Realistic, "realistic"),
        ("h", FeedbackTag::TooHarsh, "too harsh"),
        ("s", FeedbackTag::TooSoft, "too soft"),
    ] {
        let selected = state.review.draft.keywords.contains(&tag);
        let style = if selected {
            Style::default().fg(theme.highlight)
        } else {
            Style::default().fg(theme.text_dim)
        };
        spans.push(Span::styled(format!("[{key}] {label}  "), style));
    }
    Line::from(spans)
}
