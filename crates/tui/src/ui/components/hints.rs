use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hint groups per view.
pub mod common {
    use super::KeyHint;

    pub fn paging() -> Vec<KeyHint> {
        vec![
            KeyHint::new("n/p", "page"),
            KeyHint::new("g/G", "first/last"),
            KeyHint::new("+/-", "size"),
            KeyHint::new("r", "refresh"),
        ]
    }

    pub fn transactions_list() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Enter", "detail"),
            KeyHint::new("#/d/t/h/a", "sort"),
        ]
    }

    pub fn transaction_detail() -> Vec<KeyHint> {
        vec![KeyHint::new("b", "back"), KeyHint::new("Esc", "back")]
    }

    pub fn reports() -> Vec<KeyHint> {
        vec![
            KeyHint::new("e", "items"),
            KeyHint::new("o", "order"),
            KeyHint::new("y/m/t/v", "sort"),
            KeyHint::new("Y/P/T", "filter"),
            KeyHint::new("c", "clear"),
        ]
    }

    pub fn organisations() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Enter", "select"),
            KeyHint::new("x", "all"),
            KeyHint::new("r", "reload"),
        ]
    }
}
