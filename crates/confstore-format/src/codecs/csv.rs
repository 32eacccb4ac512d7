//! CSV codec
//!
//! Every cell is quoted. Entries produce `"key","value"` rows; strings are
//! written raw and other values as compact JSON.

use ::csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use super::Codec;
use crate::{
    error::{FormatError, FormatResult},
    format::OutputFormat,
    value::ValueTree,
};

/// Quoted two-column CSV output
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl CsvCodec {
    fn writer() -> Writer<Vec<u8>> {
        WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(Vec::new())
    }

    fn finish(writer: Writer<Vec<u8>>) -> FormatResult<String> {
        let bytes = writer
            .into_inner()
            .map_err(|e| FormatError::Io(e.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Codec for CsvCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn encode_text(&self, text: &str) -> FormatResult<String> {
        let mut writer = Self::writer();
        writer.write_record(["output", text])?;
        Self::finish(writer)
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
        let mut writer = Self::writer();
        for (key, value) in entries {
            writer.write_record([*key, value.to_cell_text().as_str()])?;
        }
        Self::finish(writer)
    }

    fn encode_items(&self, items: &[ValueTree]) -> FormatResult<String> {
        let mut writer = Self::writer();
        for item in items {
            writer.write_record([item.to_cell_text()])?;
        }
        Self::finish(writer)
    }

    fn unsupported(&self) -> String {
        "key,value\nNo custom CSV format available,".to_string()
    }
}
