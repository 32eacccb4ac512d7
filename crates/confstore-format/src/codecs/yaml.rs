//! YAML codec

use super::Codec;
use crate::{
    bridge,
    error::FormatResult,
    format::OutputFormat,
    value::{Mapping, ValueTree},
};

/// YAML output through the value tree bridge
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Yaml
    }

    /// Bare strings are written as `output: <text>`
    fn encode_text(&self, text: &str) -> FormatResult<String> {
        let wrapped: Mapping = [("output", ValueTree::from(text))].into_iter().collect();
        self.encode_tree(&ValueTree::Mapping(wrapped))
    }

    fn encode_tree(&self, value: &ValueTree) -> FormatResult<String> {
        bridge::emit_yaml(value)
    }

    fn encode_entries(&self, entries: &[(&str, &ValueTree)]) -> FormatResult<String> {
        let mapping: serde_yaml::Mapping = entries
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.to_string()), bridge::to_yaml(v)))
            .collect();
        Ok(serde_yaml::to_string(&serde_yaml::Value::Mapping(mapping))?)
    }

    fn unsupported(&self) -> String {
        "unsupported_type: No custom YAML format available.\n".to_string()
    }
}
