//! Generic value tree
//!
//! [`ValueTree`] is the currency between the configuration store and every
//! codec. It is a strict tree (no sharing, no cycles) with structural equality.
//! Mappings keep insertion order so that encoders emit keys in the order they
//! were written.

use std::{collections::HashMap, fmt};

use serde::{
    de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor},
    ser::{Serialize, SerializeMap, SerializeSeq, Serializer},
};

/// Recursive value model shared by the store and the codecs
#[derive(Debug, Clone, Default)]
pub enum ValueTree {
    /// Absent value
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Signed 64-bit integer scalar
    Int(i64),
    /// 64-bit floating point scalar
    Float(f64),
    /// String scalar
    String(String),
    /// Ordered list of values
    Sequence(Vec<ValueTree>),
    /// Insertion-ordered mapping with unique string keys
    Mapping(Mapping),
}

impl ValueTree {
    /// Empty mapping value
    pub fn empty_mapping() -> Self {
        ValueTree::Mapping(Mapping::new())
    }

    /// Name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueTree::Null => "null",
            ValueTree::Bool(_) => "bool",
            ValueTree::Int(_) => "int",
            ValueTree::Float(_) => "float",
            ValueTree::String(_) => "string",
            ValueTree::Sequence(_) => "sequence",
            ValueTree::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ValueTree::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ValueTree::String(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ValueTree::Mapping(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ValueTree::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValueTree::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ValueTree::Int(i) => Some(*i as f64),
            ValueTree::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueTree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ValueTree]> {
        match self {
            ValueTree::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ValueTree::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&ValueTree> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Dotted path to the first NaN or infinite float, if any
    ///
    /// The path is empty when `self` is itself such a float; sequence
    /// positions appear as indices.
    pub fn non_finite_path(&self) -> Option<String> {
        match self {
            ValueTree::Float(f) if !f.is_finite() => Some(String::new()),
            ValueTree::Sequence(items) => items.iter().enumerate().find_map(|(index, item)| {
                item.non_finite_path()
                    .map(|rest| join_path(&index.to_string(), &rest))
            }),
            ValueTree::Mapping(map) => map
                .iter()
                .find_map(|(key, value)| value.non_finite_path().map(|rest| join_path(key, &rest))),
            _ => None,
        }
    }

    /// Compact single-line JSON rendering
    pub fn to_compact_json(&self) -> String {
        // Serializing a ValueTree into memory cannot fail: every key is a string.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("null"))
    }

    /// Text of a scalar as it appears inside markup or CSV cells
    ///
    /// Strings are emitted raw; everything else uses its compact JSON form.
    pub fn to_cell_text(&self) -> String {
        match self {
            ValueTree::String(s) => s.clone(),
            other => other.to_compact_json(),
        }
    }
}

pub(crate) fn join_path(head: &str, rest: &str) -> String {
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{}.{}", head, rest)
    }
}

impl PartialEq for ValueTree {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueTree::Null, ValueTree::Null) => true,
            (ValueTree::Bool(a), ValueTree::Bool(b)) => a == b,
            (ValueTree::Int(a), ValueTree::Int(b)) => a == b,
            (ValueTree::Float(a), ValueTree::Float(b)) => a == b,
            (ValueTree::String(a), ValueTree::String(b)) => a == b,
            (ValueTree::Sequence(a), ValueTree::Sequence(b)) => a == b,
            (ValueTree::Mapping(a), ValueTree::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ValueTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_compact_json())
    }
}

/// Insertion-ordered string-keyed mapping
///
/// Equality ignores order: two mappings are equal when they hold the same keys
/// with equal values. Lookups and inserts go through a key index; `remove`
/// shifts the later entries and is linear.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, ValueTree)>,
    index: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or overwrite a key; an overwritten key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: ValueTree) -> Option<ValueTree> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ValueTree> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<ValueTree> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for (k, _) in &self.entries[position..] {
            if let Some(slot) = self.index.get_mut(k) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueTree)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|o| o == value))
    }
}

impl<K: Into<String>> FromIterator<(K, ValueTree)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, ValueTree)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (String, ValueTree);
    type IntoIter = std::vec::IntoIter<(String, ValueTree)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ============ Conversions ============

impl From<bool> for ValueTree {
    fn from(value: bool) -> Self {
        ValueTree::Bool(value)
    }
}

impl From<i32> for ValueTree {
    fn from(value: i32) -> Self {
        ValueTree::Int(i64::from(value))
    }
}

impl From<i64> for ValueTree {
    fn from(value: i64) -> Self {
        ValueTree::Int(value)
    }
}

impl From<u32> for ValueTree {
    fn from(value: u32) -> Self {
        ValueTree::Int(i64::from(value))
    }
}

impl From<f64> for ValueTree {
    fn from(value: f64) -> Self {
        ValueTree::Float(value)
    }
}

impl From<&str> for ValueTree {
    fn from(value: &str) -> Self {
        ValueTree::String(value.to_string())
    }
}

impl From<String> for ValueTree {
    fn from(value: String) -> Self {
        ValueTree::String(value)
    }
}

impl From<Mapping> for ValueTree {
    fn from(value: Mapping) -> Self {
        ValueTree::Mapping(value)
    }
}

impl<T: Into<ValueTree>> From<Vec<T>> for ValueTree {
    fn from(value: Vec<T>) -> Self {
        ValueTree::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ValueTree>> From<Option<T>> for ValueTree {
    fn from(value: Option<T>) -> Self {
        value.map_or(ValueTree::Null, Into::into)
    }
}

impl<K: Into<String>, const N: usize> From<[(K, ValueTree); N]> for ValueTree {
    fn from(entries: [(K, ValueTree); N]) -> Self {
        ValueTree::Mapping(entries.into_iter().collect())
    }
}

impl From<serde_json::Value> for ValueTree {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ValueTree::Null,
            serde_json::Value::Bool(b) => ValueTree::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ValueTree::Int(i),
                None => ValueTree::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ValueTree::String(s),
            serde_json::Value::Array(items) => {
                ValueTree::Sequence(items.into_iter().map(ValueTree::from).collect())
            }
            serde_json::Value::Object(map) => ValueTree::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ValueTree::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&ValueTree> for serde_json::Value {
    fn from(value: &ValueTree) -> Self {
        match value {
            ValueTree::Null => serde_json::Value::Null,
            ValueTree::Bool(b) => serde_json::Value::Bool(*b),
            ValueTree::Int(i) => serde_json::Value::from(*i),
            ValueTree::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            ValueTree::String(s) => serde_json::Value::String(s.clone()),
            ValueTree::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            ValueTree::Mapping(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ============ Serde ============

impl Serialize for ValueTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ValueTree::Null => serializer.serialize_unit(),
            ValueTree::Bool(b) => serializer.serialize_bool(*b),
            ValueTree::Int(i) => serializer.serialize_i64(*i),
            ValueTree::Float(f) => serializer.serialize_f64(*f),
            ValueTree::String(s) => serializer.serialize_str(s),
            ValueTree::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ValueTree::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

struct ValueTreeVisitor;

impl<'de> Visitor<'de> for ValueTreeVisitor {
    type Value = ValueTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ValueTree, E> {
        Ok(ValueTree::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ValueTree, E> {
        Ok(ValueTree::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ValueTree, D::Error> {
        ValueTree::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ValueTree, E> {
        Ok(ValueTree::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ValueTree, E> {
        Ok(ValueTree::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ValueTree, E> {
        Ok(i64::try_from(v).map_or(ValueTree::Float(v as f64), ValueTree::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ValueTree, E> {
        Ok(ValueTree::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ValueTree, E> {
        Ok(ValueTree::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ValueTree, E> {
        Ok(ValueTree::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ValueTree, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ValueTree::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ValueTree, A::Error> {
        let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, ValueTree>()? {
            map.insert(key, value);
        }
        Ok(ValueTree::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for ValueTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueTreeVisitor)
    }
}
