use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table, TableState},
};

use api_types::transaction::TransactionView;
use engine::{
    format::{explorer_url, format_entry_date, truncate_hash},
    parse_or_zero,
};

use crate::{
    app::{AppState, TransactionsMode},
    ui::{Theme, components::card::Card, components::money::styled_amount, paging_line, sort_header},
};

const COLUMNS: [(&str, &str); 5] = [
    ("Number", "number"),
    ("Date", "date"),
    ("Type", "type"),
    ("Tx hash", "tx_hash"),
    ("Amount", "amount"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, theme);
    match state.transactions.mode {
        TransactionsMode::List => render_list(frame, layout[1], state, theme),
        TransactionsMode::Detail => render_detail(frame, layout[1], state, theme),
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let table = &state.transactions.table;
    let page = table.page();
    let line = paging_line(
        table.status(),
        page.page_index,
        page.page_count(),
        page.total_count,
        table.error(),
        theme,
    );
    Card::new("Transactions", theme).render_with(frame, area, Paragraph::new(line));
}

fn currency(tx: &TransactionView) -> Option<&str> {
    tx.document_currency_customer_code.as_deref()
}

fn amount(tx: &TransactionView) -> f64 {
    parse_or_zero(&tx.amount_lcy)
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let table = &state.transactions.table;
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(label, field)| Cell::from(sort_header(label, field, table.sort()))),
    )
    .style(Style::default().fg(theme.dim));

    let rows = table.items().iter().map(|tx| {
        Row::new(vec![
            Cell::from(tx.transaction_internal_number.clone()),
            Cell::from(format_entry_date(&tx.entry_date)),
            Cell::from(tx.transaction_type.clone()),
            Cell::from(truncate_hash(&tx.block_chain_hash)),
            Cell::from(Line::from(styled_amount(amount(tx), currency(tx), theme))),
        ])
    });

    let widths = [
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Min(14),
    ];

    let mut table_state = TableState::default();
    if !table.items().is_empty() {
        table_state.select(Some(state.transactions.selected));
    }

    let widget = Table::new(rows, widths)
        .header(header)
        .block(Card::new("List", theme).focused(true).block())
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(widget, area, &mut table_state);
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(tx) = state.transactions.selected_item() else {
        Card::new("Transaction", theme).render_with(
            frame,
            area,
            Paragraph::new(Line::from("No transaction selected.")),
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(theme.dim)),
            Span::raw(format!(": {value}")),
        ])
    };
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let lines = vec![
        field("Number", tx.transaction_internal_number.clone()),
        field("Date", format_entry_date(&tx.entry_date)),
        field("Type", tx.transaction_type.clone()),
        Line::from(vec![
            Span::styled("Amount", Style::default().fg(theme.dim)),
            Span::raw(": "),
            styled_amount(amount(tx), currency(tx), theme),
        ]),
        field("Tx hash", tx.block_chain_hash.clone()),
        field(
            "Explorer",
            explorer_url(&state.explorer_url, &tx.block_chain_hash),
        ),
        field("Document", optional(&tx.document_num)),
        field("FX rate", optional(&tx.fx_rate)),
    ];
    Card::new("Transaction Detail", theme)
        .focused(true)
        .render_with(frame, layout[0], Paragraph::new(lines));

    let items = tx
        .items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(
                    "{:<20} ",
                    item.document_number.as_deref().unwrap_or(item.id.as_str())
                )),
                styled_amount(
                    parse_or_zero(&item.amount),
                    item.currency.as_deref().or(currency(tx)),
                    theme,
                ),
            ]))
        })
        .collect::<Vec<_>>();

    let title = format!("Items ({})", items.len());
    Card::new(title, theme).render_with(frame, layout[1], List::new(items));
}

#[cfg(test)]
mod tests {
    use api_types::transaction::TransactionItemView;
    use engine::{FetchRequest, ListPage, SortDirection};

    use crate::{app::AppState, config::AppConfig, ui::tests::draw};

    use super::*;

    fn tx(number: &str, amount: &str) -> TransactionView {
        TransactionView {
            transaction_internal_number: number.to_string(),
            entry_date: "2024-03-31".to_string(),
            transaction_type: "Journal".to_string(),
            block_chain_hash: "abc123def456ghi789jkl012".to_string(),
            amount_lcy: amount.to_string(),
            document_currency_customer_code: Some("EUR".to_string()),
            ..TransactionView::default()
        }
    }

    fn loaded(rows: Vec<TransactionView>, total: u64) -> AppState {
        let mut state = AppState::new(&AppConfig::default());
        let table = &mut state.transactions.table;
        let FetchRequest { seq, .. } = table.refresh();
        let page = ListPage::new(rows, 0, 10, total).unwrap();
        table.apply(seq, Ok::<_, String>(page));
        state
    }

    #[test]
    fn list_shows_paging_and_truncated_hash() {
        let state = loaded(vec![tx("FX-1", "1234.5"), tx("FX-2", "-3")], 42);
        let screen = draw(&state);
        assert!(screen.contains("Page 1 of 5 (42 items)"));
        assert!(screen.contains("abc123def456..."));
        assert!(!screen.contains("abc123def456ghi"));
        assert!(screen.contains("€1,234.50"));
        assert!(screen.contains("Mar 31, 2024"));
    }

    #[test]
    fn list_shows_local_amount_not_item_sum() {
        let mut row = tx("FX-3", "500");
        row.items = vec![TransactionItemView {
            id: "item-1".to_string(),
            amount: "10".to_string(),
            ..TransactionItemView::default()
        }];
        let screen = draw(&loaded(vec![row], 1));
        assert!(screen.contains("€500.00"));
        assert!(!screen.contains("€10.00"));
    }

    #[test]
    fn sorted_column_has_an_arrow() {
        let mut state = loaded(vec![tx("FX-1", "1")], 1);
        let table = &mut state.transactions.table;
        let req = table.set_sort("amount", SortDirection::Descending);
        let page = ListPage::new(vec![tx("FX-1", "1")], 0, 10, 1).unwrap();
        table.apply(req.seq, Ok::<_, String>(page));
        assert!(draw(&state).contains("Amount ▼"));
    }

    #[test]
    fn empty_and_loading_are_distinct() {
        let state = loaded(Vec::new(), 0);
        assert!(draw(&state).contains("no data"));

        let mut state = loaded(Vec::new(), 0);
        let _ = state.transactions.table.refresh();
        let screen = draw(&state);
        assert!(screen.contains("loading"));
        assert!(!screen.contains("no data"));
    }

    #[test]
    fn detail_links_full_hash() {
        let mut row = tx("FX-9", "900");
        row.items = vec![TransactionItemView {
            id: "item-1".to_string(),
            amount: "75.25".to_string(),
            ..TransactionItemView::default()
        }];
        let mut state = loaded(vec![row], 1);
        state.transactions.mode = TransactionsMode::Detail;

        let screen = draw(&state);
        assert!(screen.contains("https://explorer.cardano.org/transaction/abc123def456ghi789jkl012"));
        assert!(screen.contains("Items (1)"));
        assert!(screen.contains("€75.25"));
        assert!(screen.contains("Amount: €900.00"));
    }
}
