//! Schema-less report trees.
//!
//! Reports published on chain carry a `fields` object whose shape depends on
//! the report type (balance sheet, income statement, …). The tree is kept as
//! an ordered map of [`ReportNode`]s so that traversal follows the order the
//! sections appear in the document.
//!
//! Decoding rules:
//! - numbers and strings become [`Scalar`] leaves;
//! - objects become nested [`ReportField`]s;
//! - arrays become nested fields keyed by element index (`"0"`, `"1"`, …);
//! - `null` and booleans carry no amount and are dropped.

use std::{collections::HashMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess},
    ser::SerializeMap,
};

/// A leaf value as found in the report document.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportNode {
    Scalar(Scalar),
    Nested(ReportField),
}

/// Ordered mapping from section/field names to nodes.
///
/// Keys are unique: inserting an existing key replaces its node in place.
/// `index` maps each key to its position in `entries`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportField {
    entries: Vec<(String, ReportNode)>,
    index: HashMap<String, usize>,
}

impl ReportField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, node: ReportNode) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = node,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, node));
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, node: impl Into<ReportNode>) -> Self {
        self.insert(key, node.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ReportNode> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportNode)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ReportNode)> for ReportField {
    fn from_iter<I: IntoIterator<Item = (K, ReportNode)>>(iter: I) -> Self {
        let mut field = ReportField::new();
        for (key, node) in iter {
            field.insert(key, node);
        }
        field
    }
}

impl From<f64> for ReportNode {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Number(value))
    }
}

impl From<&str> for ReportNode {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for ReportNode {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::Text(value))
    }
}

impl From<ReportField> for ReportNode {
    fn from(value: ReportField) -> Self {
        Self::Nested(value)
    }
}

/// Visitor for one map value: `None` for values that carry no amount.
struct NodeVisitor;

impl<'de> de::Visitor<'de> for NodeVisitor {
    type Value = Option<ReportNode>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, string, object or array")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(ReportNode::Scalar(Scalar::Number(v as f64))))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(ReportNode::Scalar(Scalar::Number(v as f64))))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(ReportNode::Scalar(Scalar::Number(v))))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(ReportNode::Scalar(Scalar::Text(v.to_owned()))))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(ReportNode::Scalar(Scalar::Text(v))))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        FieldVisitor.visit_map(map).map(|field| Some(ReportNode::Nested(field)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        FieldVisitor.visit_seq(seq).map(|field| Some(ReportNode::Nested(field)))
    }
}

struct MaybeNode(Option<ReportNode>);

impl<'de> Deserialize<'de> for MaybeNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor).map(MaybeNode)
    }
}

struct FieldVisitor;

impl<'de> de::Visitor<'de> for FieldVisitor {
    type Value = ReportField;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a report object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ReportField::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ReportField::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut field = ReportField::new();
        while let Some((key, MaybeNode(node))) = map.next_entry::<String, MaybeNode>()? {
            if let Some(node) = node {
                field.insert(key, node);
            }
        }
        Ok(field)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut field = ReportField::new();
        let mut index = 0usize;
        while let Some(MaybeNode(node)) = seq.next_element::<MaybeNode>()? {
            if let Some(node) = node {
                field.insert(index.to_string(), node);
            }
            index += 1;
        }
        Ok(field)
    }
}

impl<'de> Deserialize<'de> for ReportField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldVisitor)
    }
}

impl<'de> Deserialize<'de> for ReportNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let MaybeNode(node) = MaybeNode::deserialize(deserializer)?;
        node.ok_or_else(|| de::Error::custom("expected a number, string, object or array"))
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Number(value) => serializer.serialize_f64(*value),
            Scalar::Text(value) => serializer.serialize_str(value),
        }
    }
}

impl Serialize for ReportNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportNode::Scalar(scalar) => scalar.serialize(serializer),
            ReportNode::Nested(field) => field.serialize(serializer),
        }
    }
}

impl Serialize for ReportField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}
