/// Turns `snake_case`/`SCREAMING_CASE` identifiers into display labels.
///
/// Segments are split on `_`, capitalised and joined with a space. Empty input
/// is returned as is.
///
/// ```rust
/// assert_eq!(engine::humanize("account_event_code"), "Account Event Code");
/// assert_eq!(engine::humanize("BALANCE_SHEET"), "Balance Sheet");
/// assert_eq!(engine::humanize(""), "");
/// ```
#[must_use]
pub fn humanize(identifier: &str) -> String {
    if identifier.is_empty() {
        return String::new();
    }
    identifier
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Label of a flattened item inside its group.
///
/// The group key is already shown in the group header, so only the remaining
/// segments are rendered, joined with an arrow. Single-segment paths fall back
/// to the key itself.
#[must_use]
pub fn item_label(path: &[String]) -> String {
    match path {
        [] => String::new(),
        [key] => humanize(key),
        [_, rest @ ..] => rest
            .iter()
            .map(|segment| humanize(segment))
            .collect::<Vec<_>>()
            .join(" → "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_snake_case() {
        assert_eq!(humanize("account_event_code"), "Account Event Code");
        assert_eq!(humanize("cash"), "Cash");
        assert_eq!(humanize("INCOME_STATEMENT"), "Income Statement");
        assert_eq!(humanize("mIxEd_CASE"), "Mixed Case");
    }

    #[test]
    fn humanize_empty_is_unchanged() {
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn humanize_non_ascii() {
        assert_eq!(humanize("équité_propre"), "Équité Propre");
    }

    #[test]
    fn item_label_skips_group_key() {
        let path = |segments: &[&str]| -> Vec<String> {
            segments.iter().map(|s| s.to_string()).collect()
        };
        assert_eq!(
            item_label(&path(&["assets", "current_assets", "cash_on_hand"])),
            "Current Assets → Cash On Hand"
        );
        assert_eq!(item_label(&path(&["net_income"])), "Net Income");
        assert_eq!(item_label(&[]), "");
    }
}
