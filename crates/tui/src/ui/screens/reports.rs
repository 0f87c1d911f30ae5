use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use engine::{GroupOrder, ListFilter, humanize, item_label};

use crate::{
    app::AppState,
    ui::{
        Theme,
        components::{
            card::Card,
            money::{styled_amount, styled_total},
        },
        paging_line, sort_header,
    },
};

const COLUMNS: [(&str, &str); 4] = [
    ("Year", "year"),
    ("Period", "period"),
    ("Type", "type"),
    ("Ver", "version"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    render_header(frame, layout[0], state, theme);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[1]);
    render_list(frame, body[0], state, theme);
    render_summary(frame, body[1], state, theme);
}

fn order_label(order: GroupOrder) -> &'static str {
    match order {
        GroupOrder::Encounter => "as published",
        GroupOrder::Alphabetical => "by name",
        GroupOrder::TotalDescending => "by total",
    }
}

fn filter_line(filter: &ListFilter, order: GroupOrder, theme: &Theme) -> Line<'static> {
    let any = |value: Option<String>| value.unwrap_or_else(|| "any".to_string());
    Line::from(vec![
        Span::styled("Year", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", any(filter.year.clone()))),
        Span::styled("Period", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", any(filter.period.map(|p| p.to_string())))),
        Span::styled("Type", Style::default().fg(theme.dim)),
        Span::raw(format!(
            ": {}  ",
            any(filter.report_type.as_deref().map(humanize))
        )),
        Span::styled("Groups", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}", order_label(order))),
    ])
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let table = &state.reports.table;
    let page = table.page();
    let lines = vec![
        paging_line(
            table.status(),
            page.page_index,
            page.page_count(),
            page.total_count,
            table.error(),
            theme,
        ),
        filter_line(table.filter(), state.reports.group_order, theme),
    ];
    Card::new("Reports", theme).render_with(frame, area, Paragraph::new(lines));
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let table = &state.reports.table;
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(label, field)| Cell::from(sort_header(label, field, table.sort()))),
    )
    .style(Style::default().fg(theme.dim));

    let rows = table.items().iter().map(|report| {
        Row::new(vec![
            Cell::from(report.year.clone()),
            Cell::from(report.period.to_string()),
            Cell::from(humanize(&report.report_type)),
            Cell::from(report.ver.clone()),
        ])
    });
    let widths = [
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(5),
    ];

    let mut table_state = TableState::default();
    if !table.items().is_empty() {
        table_state.select(Some(state.reports.selected));
    }

    let widget = Table::new(rows, widths)
        .header(header)
        .block(Card::new("Published", theme).focused(true).block())
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(widget, area, &mut table_state);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let reports = &state.reports;
    let (Some(report), Some(summary)) = (reports.selected_item(), reports.summary.as_ref()) else {
        Card::new("Report", theme).render_with(
            frame,
            area,
            Paragraph::new(Line::from(Span::styled(
                "No report selected.",
                Style::default().fg(theme.dim),
            ))),
        );
        return;
    };

    let currency = Some(report.currency.as_str()).filter(|code| !code.trim().is_empty());
    let mut lines = Vec::new();

    if !summary.malformed.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                "{} field(s) were not numeric and count as 0",
                summary.malformed.len()
            ),
            Style::default().fg(theme.warning),
        )));
    }
    if summary.groups.is_empty() {
        lines.push(Line::from(Span::styled(
            "no data",
            Style::default().fg(theme.dim),
        )));
    }

    for group in &summary.groups {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ({})  ", humanize(&group.key), group.items.len()),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            styled_total(group.total, currency, theme),
        ]));
        if reports.expanded {
            for item in &group.items {
                lines.push(Line::from(vec![
                    Span::raw(format!("    {}  ", item_label(&item.path))),
                    styled_amount(item.value, currency, theme),
                ]));
            }
        }
    }

    let title = format!(
        "{} {}/{} v{}",
        humanize(&report.report_type),
        report.year,
        report.period,
        report.ver
    );
    Card::new(title, theme).render_with(frame, area, Paragraph::new(lines));
}

#[cfg(test)]
mod tests {
    use api_types::{report::ReportField, reports::ReportView};
    use engine::ListPage;

    use crate::{config::AppConfig, ui::tests::draw};

    use super::*;

    fn loaded(fields: &str) -> AppState {
        let mut state = AppState::new(&AppConfig::default());
        state.section = crate::app::Section::Reports;
        let report = ReportView {
            currency: "USD".to_string(),
            year: "2024".to_string(),
            period: 3,
            report_type: "BALANCE_SHEET".to_string(),
            ver: "2".to_string(),
            fields: serde_json::from_str::<ReportField>(fields).unwrap(),
            ..ReportView::default()
        };
        let reports = &mut state.reports;
        let req = reports.table.refresh();
        let page = ListPage::new(vec![report], 0, 10, 1).unwrap();
        reports.table.apply(req.seq, Ok::<_, String>(page));
        reports.summary = reports
            .selected_item()
            .map(|report| engine::summarize(&report.fields));
        state
    }

    #[test]
    fn groups_show_labels_counts_and_totals() {
        let state = loaded(
            r#"{ "assets": { "cash": "100.00", "bank": "50" }, "liabilities": { "loan": "30" } }"#,
        );
        let screen = draw(&state);
        assert!(screen.contains("Balance Sheet 2024/3 v2"));
        assert!(screen.contains("Assets (2)"));
        assert!(screen.contains("$150.00"));
        assert!(screen.contains("Liabilities (1)"));
        assert!(screen.contains("$30.00"));
        assert!(!screen.contains("Cash"));
    }

    #[test]
    fn expanded_groups_list_items() {
        let mut state = loaded(r#"{ "assets": { "current_assets": { "cash_on_hand": "12" } } }"#);
        state.reports.expanded = true;
        let screen = draw(&state);
        assert!(screen.contains("Current Assets → Cash On Hand"));
    }

    #[test]
    fn malformed_fields_are_flagged() {
        let state = loaded(r#"{ "assets": { "cash": "n/a", "bank": "5" } }"#);
        let screen = draw(&state);
        assert!(screen.contains("1 field(s) were not numeric"));
        assert!(screen.contains("$5.00"));
    }

    #[test]
    fn filters_are_described() {
        let mut state = loaded("{}");
        let filter = ListFilter {
            year: Some("2024".to_string()),
            report_type: Some("INCOME_STATEMENT".to_string()),
            ..ListFilter::default()
        };
        let _ = state.reports.table.set_filter(filter);
        let screen = draw(&state);
        assert!(screen.contains("Year: 2024"));
        assert!(screen.contains("Period: any"));
        assert!(screen.contains("Type: Income Statement"));
        assert!(screen.contains("Groups: as published"));
        assert!(screen.contains("no data"));
    }
}
