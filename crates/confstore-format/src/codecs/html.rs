//! HTML codec

use super::{
    ensure_finite, ensure_finite_entries, Codec, EntriesRef, DEFAULT_JSON_INDENT,
    MAX_JSON_INDENT,
};
use crate::{error::FormatResult, format::OutputFormat, value::ValueTree};

/// Minimal HTML page wrapping the content
///
/// Structured data is rendered as pretty JSON inside `<pre>`.
#[derive(Debug, Clone, Copy)]
pub struct HtmlCodec {
    indent: usize,
}

impl HtmlCodec {
    /// Widths above [`MAX_JSON_INDENT`] are clamped
    pub fn new(indent: usize) -> Self {
        Self {
            indent: indent.min(MAX_JSON_INDENT),
        }
    }

    fn page(body: &str) -> String {
        format!("<html><body>{}</body></html>\n", body)
    }
}

impl Default for HtmlCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JSON_INDENT)
    }
}

impl Codec for HtmlCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn encode_text(&self, text: &str) -> FormatResult<String> {
        Ok(Self::page(&format!("<p>{}</p>", text)))
    }

    fn encode_tree(&self, value: &ValueTree) -> FormatResult<String> {
        ensure_finite(value)?;
        let body = super::to_pretty_json(value, self.indent)?;
        Ok(Self::page(&format!("<pre>{}</pre>", body)))
    }

    fn encode_entries(&self, entries: &[(&str, &ValueTree)]) -> FormatResult<String> {
        ensure_finite_entries(entries.iter().copied())?;
        let body = super::to_pretty_json(&EntriesRef(entries), self.indent)?;
        Ok(Self::page(&format!("<pre>{}</pre>", body)))
    }

    fn unsupported(&self) -> String {
        "<html><body><p>No custom HTML format available.</p></body></html>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_paragraph() {
        assert_eq!(
            HtmlCodec::default().encode_text("hi").unwrap(),
            "<html><body><p>hi</p></body></html>\n"
        );
    }

    #[test]
    fn test_tree_pre_block() {
        let value = ValueTree::from([("k", ValueTree::from(1))]);
        assert_eq!(
            HtmlCodec::default().encode_tree(&value).unwrap(),
            "<html><body><pre>{\n    \"k\": 1\n}</pre></body></html>\n"
        );
    }
}
