//! JSON codec

use super::{
    ensure_finite, ensure_finite_entries, Codec, EntriesRef, DEFAULT_JSON_INDENT,
    MAX_JSON_INDENT,
};
use crate::{
    error::FormatResult,
    format::OutputFormat,
    value::{Mapping, ValueTree},
};

/// Pretty-printed JSON output
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    indent: usize,
}

impl JsonCodec {
    /// Widths above [`MAX_JSON_INDENT`] are clamped
    pub fn new(indent: usize) -> Self {
        Self {
            indent: indent.min(MAX_JSON_INDENT),
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JSON_INDENT)
    }
}

impl Codec for JsonCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    /// Bare strings are wrapped as `{"output": "<text>"}`
    fn encode_text(&self, text: &str) -> FormatResult<String> {
        let wrapped: Mapping = [("output", ValueTree::from(text))].into_iter().collect();
        self.encode_tree(&ValueTree::Mapping(wrapped))
    }

    fn encode_tree(&self, value: &ValueTree) -> FormatResult<String> {
        ensure_finite(value)?;
        Ok(format!("{}\n", super::to_pretty_json(value, self.indent)?))
    }

    fn encode_entries(&self, entries: &[(&str, &ValueTree)]) -> FormatResult<String> {
        ensure_finite_entries(entries.iter().copied())?;
        Ok(format!(
            "{}\n",
            super::to_pretty_json(&EntriesRef(entries), self.indent)?
        ))
    }

    fn unsupported(&self) -> String {
        "{\"unsupported_type\": \"No custom JSON format available.\"}".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_bare_string() {
        let out = JsonCodec::default().encode_text("Hello, World!").unwrap();
        assert_eq!(out, "{\n    \"output\": \"Hello, World!\"\n}\n");
    }

    #[test]
    fn test_escapes_strings() {
        let out = JsonCodec::default().encode_text("say \"hi\"").unwrap();
        let parsed: ValueTree = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.get("output"), Some(&ValueTree::from("say \"hi\"")));
    }

    #[test]
    fn test_custom_indent() {
        let value = ValueTree::from([("key", ValueTree::from("value"))]);
        let out = JsonCodec::new(2).encode_tree(&value).unwrap();
        assert_eq!(out, "{\n  \"key\": \"value\"\n}\n");
    }

    #[test]
    fn test_entries_keep_order() {
        let b = ValueTree::from(2);
        let a = ValueTree::from(1);
        let out = JsonCodec::default()
            .encode_entries(&[("b", &b), ("a", &a)])
            .unwrap();
        assert_eq!(out, "{\n    \"b\": 2,\n    \"a\": 1\n}\n");
    }

    #[test]
    fn test_indent_is_clamped() {
        assert_eq!(JsonCodec::new(usize::MAX).indent(), MAX_JSON_INDENT);
    }

    #[test]
    fn test_rejects_non_finite_floats() {
        let value = ValueTree::from([("x", ValueTree::from(f64::INFINITY))]);
        assert!(matches!(
            JsonCodec::default().encode_tree(&value),
            Err(crate::error::FormatError::NonFiniteFloat { path }) if path == "x"
        ));
        let nan = ValueTree::from(f64::NAN);
        assert!(JsonCodec::default().encode_entries(&[("y", &nan)]).is_err());
    }
}
