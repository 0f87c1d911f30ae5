use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{Theme, components::card::Card},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let orgs = &state.organisations;
    let card = Card::new("Organisations", theme).focused(true);

    if orgs.items.is_empty() {
        let line = if let Some(err) = &orgs.error {
            Line::from(Span::styled(err.clone(), Style::default().fg(theme.error)))
        } else if orgs.loading {
            Line::from(Span::styled("loading…", Style::default().fg(theme.dim)))
        } else {
            Line::from(Span::styled("no data", Style::default().fg(theme.dim)))
        };
        card.render_with(frame, area, Paragraph::new(line));
        return;
    }

    let items = orgs
        .items
        .iter()
        .map(|org| {
            let active = state.organisation_id.as_deref() == Some(org.id.as_str());
            let marker = if active { "● " } else { "  " };
            let currency = org
                .currency_id
                .as_deref()
                .map(|id| id.rsplit(':').next().unwrap_or(id))
                .unwrap_or("-");
            let country = org.country_code.as_deref().unwrap_or("-");
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.positive)),
                Span::raw(format!("{:<32} ", org.name)),
                Span::styled(
                    format!("{currency:<5} {country:<3} {}", org.id),
                    Style::default().fg(theme.dim),
                ),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(orgs.selected));

    let list = List::new(items)
        .block(card.block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}
