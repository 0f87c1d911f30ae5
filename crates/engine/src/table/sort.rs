use std::cmp::Ordering;

use api_types::{reports::ReportView, transaction::TransactionView};
use chrono::{DateTime, Utc};

use crate::{
    coerce::{parse_or_zero, transaction_amount},
    format::parse_entry_date,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Value used in the `sort=field,dir` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// `field,asc` / `field,desc`.
    #[must_use]
    pub fn query_value(&self) -> String {
        format!("{},{}", self.field, self.direction.as_str())
    }
}

/// Comparable projection of one row field.
///
/// Keys of different kinds never compare by value: `Missing` sorts first, then
/// numbers, instants and text.
#[derive(Clone, Debug, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    /// `None` when the date could not be read; sorts before every instant.
    Instant(Option<DateTime<Utc>>),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::Instant(_) => 2,
            Self::Text(_) => 3,
        }
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Rows that can be ordered by a named column.
pub trait Sortable {
    fn sort_key(&self, field: &str) -> SortKey;
}

/// Stable sort of `rows` by `spec`.
pub fn sort_rows<T: Sortable>(rows: &mut [T], spec: &SortSpec) {
    rows.sort_by(|a, b| {
        let ord = a
            .sort_key(&spec.field)
            .compare(&b.sort_key(&spec.field));
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

impl Sortable for TransactionView {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "number" => SortKey::Text(self.transaction_internal_number.clone()),
            "date" => SortKey::Instant(parse_entry_date(&self.entry_date)),
            "type" => SortKey::Text(self.transaction_type.clone()),
            "tx_hash" => SortKey::Text(self.block_chain_hash.clone()),
            "amount" => SortKey::Number(transaction_amount(self)),
            _ => SortKey::Missing,
        }
    }
}

impl Sortable for ReportView {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "year" => SortKey::Number(parse_or_zero(&self.year)),
            "period" => SortKey::Number(f64::from(self.period)),
            "type" => SortKey::Text(self.report_type.clone()),
            "version" => SortKey::Number(parse_or_zero(&self.ver)),
            _ => SortKey::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::transaction::TransactionItemView;

    fn item(amount: &str) -> TransactionItemView {
        TransactionItemView {
            amount: amount.to_string(),
            ..TransactionItemView::default()
        }
    }

    fn tx(number: &str, date: &str, amount: &str) -> TransactionView {
        TransactionView {
            transaction_internal_number: number.to_string(),
            entry_date: date.to_string(),
            items: vec![item(amount)],
            ..TransactionView::default()
        }
    }

    fn numbers(rows: &[TransactionView]) -> Vec<&str> {
        rows.iter()
            .map(|row| row.transaction_internal_number.as_str())
            .collect()
    }

    #[test]
    fn direction_toggles() {
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.toggled(), SortDirection::Ascending);
        assert_eq!(
            SortSpec::new("date", SortDirection::Descending).query_value(),
            "date,desc"
        );
    }

    #[test]
    fn dates_compare_as_instants() {
        // Plain dates and timestamps mixed in one page.
        let mut rows = vec![
            tx("b", "2023-10-01", "0"),
            tx("a", "2023-09-30T23:00:00Z", "0"),
            tx("c", "2023-10-01T00:00:01+00:00", "0"),
            tx("x", "not a date", "0"),
        ];
        sort_rows(&mut rows, &SortSpec::new("date", SortDirection::Ascending));
        assert_eq!(numbers(&rows), vec!["x", "a", "b", "c"]);
    }

    #[test]
    fn amounts_compare_as_line_item_sums() {
        let mut big = tx("big", "2024-01-01", "60");
        big.items.push(item("50"));
        let mut rows = vec![big, tx("mid", "2024-01-01", "100"), tx("neg", "2024-01-01", "-5")];

        sort_rows(&mut rows, &SortSpec::new("amount", SortDirection::Descending));
        assert_eq!(numbers(&rows), vec!["big", "mid", "neg"]);

        // "9" > "100" lexically; numeric order must win.
        let mut rows = vec![tx("nine", "", "9"), tx("hundred", "", "100")];
        sort_rows(&mut rows, &SortSpec::new("amount", SortDirection::Ascending));
        assert_eq!(numbers(&rows), vec!["nine", "hundred"]);
    }

    #[test]
    fn rows_without_items_sort_as_zero() {
        let itemless = TransactionView {
            transaction_internal_number: "no-items".to_string(),
            amount_lcy: "500".to_string(),
            ..TransactionView::default()
        };
        let mut rows = vec![itemless, tx("items", "", "10")];
        sort_rows(&mut rows, &SortSpec::new("amount", SortDirection::Ascending));
        assert_eq!(numbers(&rows), vec!["no-items", "items"]);
    }

    #[test]
    fn sort_is_stable() {
        let mut rows = vec![tx("1", "", "5"), tx("2", "", "5"), tx("3", "", "1")];
        sort_rows(&mut rows, &SortSpec::new("amount", SortDirection::Descending));
        assert_eq!(numbers(&rows), vec!["1", "2", "3"]);
    }

    #[test]
    fn unknown_field_keeps_order() {
        let mut rows = vec![tx("2", "", "0"), tx("1", "", "0")];
        sort_rows(&mut rows, &SortSpec::new("nope", SortDirection::Ascending));
        assert_eq!(numbers(&rows), vec!["2", "1"]);
    }

    #[test]
    fn reports_sort_by_numeric_year_and_period() {
        let report = |year: &str, period: u32| ReportView {
            year: year.to_string(),
            period,
            ..ReportView::default()
        };
        let mut rows = vec![report("2024", 1), report("2023", 12), report("2024", 3)];
        sort_rows(&mut rows, &SortSpec::new("period", SortDirection::Ascending));
        sort_rows(&mut rows, &SortSpec::new("year", SortDirection::Descending));
        let order: Vec<(String, u32)> = rows.iter().map(|r| (r.year.clone(), r.period)).collect();
        assert_eq!(
            order,
            vec![
                ("2024".to_string(), 1),
                ("2024".to_string(), 3),
                ("2023".to_string(), 12)
            ]
        );
    }
}
