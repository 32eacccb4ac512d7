//! Plain text codec

use super::Codec;
use crate::{error::FormatResult, format::OutputFormat, value::ValueTree};

/// Raw text output
///
/// Strings are written as-is, trees as compact JSON, entries as one
/// `key: value` line each.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextCodec;

impl Codec for PlainTextCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::PlainText
    }

    fn encode_text(&self, text: &str) -> FormatResult<String> {
        Ok(format!("{}\n", text))
    }

    fn encode_tree(&self, value: &ValueTree) -> FormatResult<String> {
        Ok(format!("{}\n", super::to_compact_json(value)?))
    }

    fn encode_entries(&self, entries: &[(&str, &ValueTree)]) -> FormatResult<String> {
        let mut out = String::new();
        for (key, value) in entries {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(&super::to_compact_json(value)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn unsupported(&self) -> String {
        "No custom plain text format available.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(PlainTextCodec.encode_text("Hello").unwrap(), "Hello\n");
    }

    #[test]
    fn test_plain_entries() {
        let nested = ValueTree::from([("a", ValueTree::from(1))]);
        let name = ValueTree::from("example");
        let out = PlainTextCodec
            .encode_entries(&[("name", &name), ("nested", &nested)])
            .unwrap();
        assert_eq!(out, "name: \"example\"\nnested: {\"a\":1}\n");
    }
}
