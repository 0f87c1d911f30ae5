use api_types::{report::Scalar, transaction::TransactionView};

/// Result of coercing one report leaf.
///
/// `malformed` is set when the leaf held text that is not a decimal number
/// (or a non-finite value); `value` is then `0.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coerced {
    pub value: f64,
    pub malformed: bool,
}

impl Coerced {
    const MALFORMED: Coerced = Coerced {
        value: 0.0,
        malformed: true,
    };

    fn finite(value: f64) -> Self {
        if value.is_finite() {
            Self {
                value,
                malformed: false,
            }
        } else {
            Self::MALFORMED
        }
    }
}

/// Turns a report leaf into a number, zero when it cannot be read.
///
/// Upstream reports are not validated, so totals must stay computable with
/// garbage in a few fields.
///
/// ```rust
/// use api_types::report::Scalar;
/// use engine::coerce;
///
/// assert_eq!(coerce(&Scalar::Text("12.50".into())), 12.5);
/// assert_eq!(coerce(&Scalar::Text("abc".into())), 0.0);
/// assert_eq!(coerce(&Scalar::Number(-3.0)), -3.0);
/// ```
#[must_use]
pub fn coerce(value: &Scalar) -> f64 {
    coerce_checked(value).value
}

/// Like [`coerce`] but reports whether the zero was substituted.
#[must_use]
pub fn coerce_checked(value: &Scalar) -> Coerced {
    match value {
        Scalar::Number(number) => Coerced::finite(*number),
        Scalar::Text(text) => parse_checked(text),
    }
}

/// Parses a decimal string (optional sign, fraction and exponent), `0.0` on
/// failure.
#[must_use]
pub fn parse_or_zero(text: &str) -> f64 {
    parse_checked(text).value
}

fn parse_checked(text: &str) -> Coerced {
    // `f64::from_str` also takes "inf"/"NaN"; those fail the finiteness check.
    match text.trim().parse::<f64>() {
        Ok(value) => Coerced::finite(value),
        Err(_) => Coerced::MALFORMED,
    }
}

/// Sum of a transaction's line-item amounts, the key rows are sorted by.
///
/// A row without items is worth `0.0` whatever its `amount_lcy` says.
#[must_use]
pub fn transaction_amount(tx: &TransactionView) -> f64 {
    tx.items.iter().map(|item| parse_or_zero(&item.amount)).sum()
}
