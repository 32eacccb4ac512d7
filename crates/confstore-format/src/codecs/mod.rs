//! Output codecs, one per [`OutputFormat`]
//!
//! A codec turns a [`Payload`] into text. Codecs are one-way; the only format
//! read back into a value tree is YAML (see [`crate::bridge`]) and JSON, which
//! deserializes directly into [`ValueTree`].

mod csv;
mod html;
mod json;
mod plain;
mod xml;
mod yaml;

pub use self::csv::CsvCodec;
pub use html::HtmlCodec;
pub use json::JsonCodec;
pub use plain::PlainTextCodec;
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::{FormatError, FormatResult},
    format::OutputFormat,
    payload::Payload,
    value::{join_path, ValueTree},
};

/// Indentation used by pretty JSON output unless configured otherwise
pub const DEFAULT_JSON_INDENT: usize = 4;

/// Widest indentation pretty JSON output will use; larger widths are clamped
pub const MAX_JSON_INDENT: usize = 16;

/// Encoder for one output format
pub trait Codec: Send + Sync {
    /// Format produced by this codec
    fn format(&self) -> OutputFormat;

    /// Encode a bare string
    fn encode_text(&self, text: &str) -> FormatResult<String>;

    /// Encode a single value tree
    fn encode_tree(&self, value: &ValueTree) -> FormatResult<String>;

    /// Encode key/value entries as a top-level mapping
    fn encode_entries(&self, entries: &[(&str, &ValueTree)]) -> FormatResult<String>;

    /// Encode a list of values
    fn encode_items(&self, items: &[ValueTree]) -> FormatResult<String> {
        self.encode_tree(&ValueTree::Sequence(items.to_vec()))
    }

    /// Placeholder emitted for payloads no codec understands
    fn unsupported(&self) -> String;

    /// Dispatch on the payload kind
    fn encode(&self, payload: &Payload<'_>) -> FormatResult<String> {
        match payload {
            Payload::Text(text) => self.encode_text(text),
            Payload::Tree(value) => self.encode_tree(value),
            Payload::Entries(entries) => self.encode_entries(entries),
            Payload::Items(items) => self.encode_items(items),
            Payload::Unsupported => Ok(self.unsupported()),
        }
    }
}

/// Serializes borrowed entries as a map without cloning them into a tree
pub(crate) struct EntriesRef<'a>(pub &'a [(&'a str, &'a ValueTree)]);

impl Serialize for EntriesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Pretty JSON with a configurable indent width, at most [`MAX_JSON_INDENT`]
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T, indent: usize) -> FormatResult<String> {
    let indent = " ".repeat(indent.min(MAX_JSON_INDENT));
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Reject NaN and infinite floats, which serde_json writes as `null`
pub fn ensure_finite(value: &ValueTree) -> FormatResult<()> {
    match value.non_finite_path() {
        Some(path) => Err(FormatError::non_finite(path)),
        None => Ok(()),
    }
}

/// [`ensure_finite`] over key/value entries; the reported path starts with the key
pub fn ensure_finite_entries<'a, I>(entries: I) -> FormatResult<()>
where
    I: IntoIterator<Item = (&'a str, &'a ValueTree)>,
{
    for (key, value) in entries {
        if let Some(rest) = value.non_finite_path() {
            return Err(FormatError::non_finite(join_path(key, &rest)));
        }
    }
    Ok(())
}

/// Compact single-line JSON
pub fn to_compact_json<T: Serialize + ?Sized>(value: &T) -> FormatResult<String> {
    Ok(serde_json::to_string(value)?)
}
