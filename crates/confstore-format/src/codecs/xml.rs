//! XML codec
//!
//! Element text is written verbatim and is not escaped, so values containing
//! markup characters produce output that is not well-formed XML.

use super::Codec;
use crate::{error::FormatResult, format::OutputFormat, value::ValueTree};

/// Flat XML output under an `<output>` root
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl XmlCodec {
    fn element(out: &mut String, name: &str, value: &ValueTree) {
        out.push_str(&format!("  <{name}>{}</{name}>\n", value.to_cell_text()));
    }
}

impl Codec for XmlCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xml
    }

    fn encode_text(&self, text: &str) -> FormatResult<String> {
        Ok(format!("<output>\n {}\n</output>\n", text))
    }

    fn encode_tree(&self, value: &ValueTree) -> FormatResult<String> {
        match value {
            ValueTree::Mapping(map) => {
                let entries: Vec<_> = map.iter().collect();
                self.encode_entries(&entries)
            }
            ValueTree::Sequence(items) => self.encode_items(items),
            scalar => self.encode_text(&scalar.to_cell_text()),
        }
    }

    fn encode_entries(&self, entries: &[(&str, &ValueTree)]) -> FormatResult<String> {
        let mut out = String::from("<output>\n");
        for (key, value) in entries {
            Self::element(&mut out, key, value);
        }
        out.push_str("</output>\n");
        Ok(out)
    }

    fn encode_items(&self, items: &[ValueTree]) -> FormatResult<String> {
        let mut out = String::from("<output>\n");
        for item in items {
            Self::element(&mut out, "item", item);
        }
        out.push_str("</output>\n");
        Ok(out)
    }

    fn unsupported(&self) -> String {
        "<unsupported_type>No custom XML format available.</unsupported_type>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string() {
        assert_eq!(
            XmlCodec.encode_text("Hello").unwrap(),
            "<output>\n Hello\n</output>\n"
        );
    }

    #[test]
    fn test_mapping_elements() {
        let value = ValueTree::from([
            ("name", ValueTree::from("example")),
            ("port", ValueTree::from(5432)),
        ]);
        assert_eq!(
            XmlCodec.encode_tree(&value).unwrap(),
            "<output>\n  <name>example</name>\n  <port>5432</port>\n</output>\n"
        );
    }

    #[test]
    fn test_values_are_not_escaped() {
        let value = ValueTree::from([("html", ValueTree::from("<b>&</b>"))]);
        let out = XmlCodec.encode_tree(&value).unwrap();
        assert!(out.contains("<html><b>&</b></html>"));
    }

    #[test]
    fn test_sequence_items() {
        let items = vec![ValueTree::from("a"), ValueTree::from(true)];
        assert_eq!(
            XmlCodec.encode_items(&items).unwrap(),
            "<output>\n  <item>a</item>\n  <item>true</item>\n</output>\n"
        );
    }
}
