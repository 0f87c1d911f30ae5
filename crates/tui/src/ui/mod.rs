pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::{ListStatus, SortDirection, SortSpec};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Section, TransactionsMode};

use components::hints::{self, KeyHint};

pub use terminal::{DashboardTerminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    // Info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Transactions => screens::transactions::render(frame, layout[2], state, &theme),
        Section::Reports => screens::reports::render(frame, layout[2], state, &theme),
        Section::Organisations => screens::organisations::render(frame, layout[2], state, &theme),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled("API", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Organisation", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.organisation_label())),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints::hints_to_spans(
        &[KeyHint::new("Tab/1-3", "nav"), KeyHint::new("j/k", "select")],
        theme,
    );

    let context: Vec<KeyHint> = match state.section {
        Section::Transactions => match state.transactions.mode {
            TransactionsMode::List => {
                let mut hints = hints::common::transactions_list();
                hints.extend(hints::common::paging());
                hints
            }
            TransactionsMode::Detail => hints::common::transaction_detail(),
        },
        Section::Reports => {
            let mut hints = hints::common::reports();
            hints.extend(hints::common::paging());
            hints
        }
        Section::Organisations => hints::common::organisations(),
    };
    parts.push(hints::hint_separator(theme));
    parts.extend(hints::hints_to_spans(&context, theme));

    parts.push(hints::hint_separator(theme));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Column header with an arrow when the list is sorted by `field`.
pub(crate) fn sort_header(label: &str, field: &str, sort: Option<&SortSpec>) -> String {
    match sort {
        Some(spec) if spec.field == field => {
            let arrow = match spec.direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            };
            format!("{label} {arrow}")
        }
        _ => label.to_string(),
    }
}

/// Status line shared by the paged views.
pub(crate) fn paging_line(
    status: ListStatus,
    page_index: usize,
    page_count: usize,
    total: u64,
    error: Option<&str>,
    theme: &Theme,
) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(
        "Page {} of {page_count} ({total} items)",
        page_index + 1
    ))];
    match status {
        ListStatus::Loading => {
            spans.push(Span::styled("  loading…", Style::default().fg(theme.dim)));
        }
        ListStatus::Empty => {
            spans.push(Span::styled("  no data", Style::default().fg(theme.dim)));
        }
        ListStatus::Idle | ListStatus::Ready => {}
    }
    if let Some(err) = error {
        spans.push(Span::styled(
            format!("  {err}"),
            Style::default().fg(theme.error),
        ));
    }
    Line::from(spans)
}
