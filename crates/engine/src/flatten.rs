use api_types::report::{ReportField, ReportNode};

use crate::coerce::coerce_checked;

/// One numeric leaf of a report tree.
///
/// `path` is the walk from the report root to the leaf and is never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatItem {
    pub path: Vec<String>,
    pub value: f64,
}

impl FlatItem {
    /// Top-level section the item belongs to.
    #[must_use]
    pub fn key(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}

/// Flattened leaves plus the paths whose text could not be read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flattened {
    pub items: Vec<FlatItem>,
    pub malformed: Vec<Vec<String>>,
}

/// Walks `node` depth-first in document order, one [`FlatItem`] per leaf.
#[must_use]
pub fn flatten(node: &ReportField) -> Vec<FlatItem> {
    flatten_report(node).items
}

/// [`flatten`] with every path starting with `prefix`.
#[must_use]
pub fn flatten_with_prefix(node: &ReportField, prefix: &[String]) -> Vec<FlatItem> {
    let mut out = Flattened::default();
    let mut path = prefix.to_vec();
    walk(node, &mut path, &mut out);
    out.items
}

/// [`flatten`] that also collects zero-substituted paths.
#[must_use]
pub fn flatten_report(node: &ReportField) -> Flattened {
    let mut out = Flattened::default();
    walk(node, &mut Vec::new(), &mut out);
    out
}

fn walk(node: &ReportField, path: &mut Vec<String>, out: &mut Flattened) {
    for (key, child) in node.iter() {
        path.push(key.to_string());
        match child {
            ReportNode::Nested(inner) => walk(inner, path, out),
            ReportNode::Scalar(scalar) => {
                let coerced = coerce_checked(scalar);
                if coerced.malformed {
                    out.malformed.push(path.clone());
                }
                out.items.push(FlatItem {
                    path: path.clone(),
                    value: coerced.value,
                });
            }
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn report(raw: &str) -> ReportField {
        serde_json::from_str(raw).unwrap()
    }

    fn paths(items: &[FlatItem]) -> Vec<String> {
        items.iter().map(|item| item.path.join(".")).collect()
    }

    #[test]
    fn one_item_per_leaf_in_document_order() {
        let tree = report(
            r#"{
                "assets": {
                    "current": { "cash": "100.00", "bank": 50 },
                    "fixed": "20"
                },
                "liabilities": { "loan": "30" },
                "empty": {}
            }"#,
        );

        let items = flatten(&tree);
        assert_eq!(
            paths(&items),
            vec![
                "assets.current.cash",
                "assets.current.bank",
                "assets.fixed",
                "liabilities.loan",
            ]
        );
        assert_eq!(items[0].value, 100.0);
        assert_eq!(items[1].value, 50.0);
        assert_eq!(items[0].key(), "assets");
    }

    #[test]
    fn paths_are_unique() {
        let tree = report(
            r#"{"a": {"x": 1, "y": {"x": 2}}, "b": {"x": 3}, "x": 4, "lines": [1, 2]}"#,
        );
        let items = flatten(&tree);
        let unique: HashSet<_> = items.iter().map(|item| item.path.clone()).collect();
        assert_eq!(unique.len(), items.len());
        assert_eq!(items.len(), 6);
    }

    #[test]
    fn repeated_calls_are_stable() {
        let tree = report(r#"{"z": {"b": 1, "a": 2}, "y": 3}"#);
        assert_eq!(flatten(&tree), flatten(&tree));
    }

    #[test]
    fn prefix_is_prepended() {
        let tree = report(r#"{"cash": "1"}"#);
        let items = flatten_with_prefix(&tree, &["assets".to_string()]);
        assert_eq!(paths(&items), vec!["assets.cash"]);
    }

    #[test]
    fn malformed_leaves_are_reported_and_zeroed() {
        let tree = report(r#"{"income": {"sales": "n/a", "fees": "3"}}"#);
        let flat = flatten_report(&tree);
        assert_eq!(flat.items.len(), 2);
        assert_eq!(flat.items[0].value, 0.0);
        assert_eq!(
            flat.malformed,
            vec![vec!["income".to_string(), "sales".to_string()]]
        );
    }

    #[test]
    fn empty_report_has_no_items() {
        assert!(flatten(&ReportField::new()).is_empty());
    }
}
