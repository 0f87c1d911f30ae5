use engine::format::format_currency;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

fn amount_color(value: f64, theme: &Theme) -> ratatui::style::Color {
    if value > 0.0 {
        theme.positive
    } else if value < 0.0 {
        theme.negative
    } else {
        theme.text
    }
}

/// Amount in `currency`, green when positive and red when negative.
#[must_use]
pub fn styled_amount(value: f64, currency: Option<&str>, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_currency(value, currency),
        Style::default().fg(amount_color(value, theme)),
    )
}

/// Bold variant for group totals.
#[must_use]
pub fn styled_total(value: f64, currency: Option<&str>, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_currency(value, currency),
        Style::default()
            .fg(amount_color(value, theme))
            .add_modifier(Modifier::BOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_picks_color() {
        let theme = Theme::default();
        let gain = styled_amount(12.5, Some("EUR"), &theme);
        assert_eq!(gain.content, "€12.50");
        assert_eq!(gain.style.fg, Some(theme.positive));

        let loss = styled_total(-1500.0, None, &theme);
        assert_eq!(loss.content, "-$1,500.00");
        assert_eq!(loss.style.fg, Some(theme.negative));
        assert!(loss.style.add_modifier.contains(Modifier::BOLD));

        assert_eq!(styled_amount(0.0, None, &theme).style.fg, Some(theme.text));
    }
}
