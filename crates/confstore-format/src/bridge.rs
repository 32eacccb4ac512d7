//! ValueTree <-> YAML node bridge
//!
//! Scalars read from YAML are probed in the fixed order bool, int, float,
//! string; the first successful parse wins. A quoted `"true"` therefore loads
//! as a boolean and a quoted `"42"` as an integer.

use serde_yaml::Value as YamlValue;

use crate::{
    error::FormatResult,
    value::{Mapping, ValueTree},
};

/// Convert a value tree into a YAML node
pub fn to_yaml(value: &ValueTree) -> YamlValue {
    match value {
        ValueTree::Null => YamlValue::Null,
        ValueTree::Bool(b) => YamlValue::Bool(*b),
        ValueTree::Int(i) => YamlValue::Number((*i).into()),
        ValueTree::Float(f) => YamlValue::Number((*f).into()),
        ValueTree::String(s) => YamlValue::String(s.clone()),
        ValueTree::Sequence(items) => YamlValue::Sequence(items.iter().map(to_yaml).collect()),
        ValueTree::Mapping(map) => YamlValue::Mapping(
            map.iter()
                .map(|(k, v)| (YamlValue::String(k.to_string()), to_yaml(v)))
                .collect(),
        ),
    }
}

/// Convert a YAML node into a value tree
pub fn from_yaml(node: &YamlValue) -> ValueTree {
    match node {
        YamlValue::Null => ValueTree::Null,
        YamlValue::Bool(b) => ValueTree::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueTree::Int(i)
            } else if let Some(u) = n.as_u64() {
                ValueTree::Float(u as f64)
            } else {
                ValueTree::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        YamlValue::String(s) => probe_scalar(s),
        YamlValue::Sequence(items) => ValueTree::Sequence(items.iter().map(from_yaml).collect()),
        YamlValue::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key_text(key), from_yaml(value));
            }
            ValueTree::Mapping(out)
        }
        YamlValue::Tagged(tagged) => from_yaml(&tagged.value),
    }
}

/// Parse a YAML document into a value tree
pub fn parse_yaml(text: &str) -> FormatResult<ValueTree> {
    let node: YamlValue = serde_yaml::from_str(text)?;
    Ok(from_yaml(&node))
}

/// Emit a value tree as a YAML document
pub fn emit_yaml(value: &ValueTree) -> FormatResult<String> {
    Ok(serde_yaml::to_string(&to_yaml(value))?)
}

/// Interpret a scalar's text: bool, then int, then float, then string
pub fn probe_scalar(text: &str) -> ValueTree {
    if let Some(b) = parse_bool(text) {
        return ValueTree::Bool(b);
    }
    if let Ok(i) = text.parse::<i64>() {
        return ValueTree::Int(i);
    }
    if let Some(f) = parse_float(text) {
        return ValueTree::Float(f);
    }
    ValueTree::String(text.to_string())
}

/// YAML 1.1 boolean spellings in lower, upper and capitalized case
fn parse_bool(text: &str) -> Option<bool> {
    const TRUE: [&str; 4] = ["true", "yes", "on", "y"];
    const FALSE: [&str; 4] = ["false", "no", "off", "n"];

    let lower = text.to_ascii_lowercase();
    let canonical_case = text == lower
        || text == text.to_ascii_uppercase()
        || text == capitalize(&lower);
    if !canonical_case {
        return None;
    }
    if TRUE.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust also accepts "inf" and "nan" words, which YAML treats as strings.
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

fn key_text(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
