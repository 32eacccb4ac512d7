//! Format dispatch
//!
//! [`SerializerFactory`] is a lookup table from [`OutputFormat`] to [`Codec`].
//! `serialize` is strict and returns codec failures to the caller; `render`
//! and `apply_output_format` are lenient: failures are logged and produce no
//! output rather than aborting the caller.

use std::{collections::HashMap, io::Write};

use once_cell::sync::Lazy;
use tracing::error;

use crate::{
    codecs::{
        Codec, CsvCodec, HtmlCodec, JsonCodec, PlainTextCodec, XmlCodec, YamlCodec,
        DEFAULT_JSON_INDENT,
    },
    error::{FormatError, FormatResult},
    format::OutputFormat,
    manager::get_output_format,
    payload::Serializable,
};

/// Lookup table of codecs by format
pub struct SerializerFactory {
    codecs: HashMap<OutputFormat, Box<dyn Codec>>,
}

impl SerializerFactory {
    /// Factory with every built-in codec registered
    pub fn new() -> Self {
        Self::with_json_indent(DEFAULT_JSON_INDENT)
    }

    /// Factory whose JSON and HTML codecs use the given indent width
    pub fn with_json_indent(indent: usize) -> Self {
        let mut factory = Self::empty();
        factory.register(Box::new(PlainTextCodec));
        factory.register(Box::new(JsonCodec::new(indent)));
        factory.register(Box::new(XmlCodec));
        factory.register(Box::new(YamlCodec));
        factory.register(Box::new(HtmlCodec::new(indent)));
        factory.register(Box::new(CsvCodec));
        factory
    }

    /// Factory with no codecs registered
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register a codec, replacing any previous codec for its format
    pub fn register(&mut self, codec: Box<dyn Codec>) -> Option<Box<dyn Codec>> {
        self.codecs.insert(codec.format(), codec)
    }

    pub fn codec(&self, format: OutputFormat) -> FormatResult<&dyn Codec> {
        self.codecs
            .get(&format)
            .map(|codec| &**codec)
            .ok_or_else(|| FormatError::unsupported(format.name()))
    }

    /// Encode data in the given format
    pub fn serialize<T: Serializable + ?Sized>(
        &self,
        data: &T,
        format: OutputFormat,
    ) -> FormatResult<String> {
        self.codec(format)?.encode(&data.payload())
    }

    /// Encode data, logging failures and returning empty text on error
    pub fn render<T: Serializable + ?Sized>(&self, data: &T, format: OutputFormat) -> String {
        match self.serialize(data, format) {
            Ok(text) => text,
            Err(e) => {
                error!("Error applying output format {}: {}", format, e);
                String::new()
            }
        }
    }

    /// Encode data and write it to `writer`; failures are logged, not returned
    pub fn apply_output_format<W, T>(&self, writer: &mut W, data: &T, format: OutputFormat)
    where
        W: Write + ?Sized,
        T: Serializable + ?Sized,
    {
        let result = self
            .serialize(data, format)
            .and_then(|text| writer.write_all(text.as_bytes()).map_err(FormatError::from));
        if let Err(e) = result {
            error!("Error applying output format {}: {}", format, e);
        }
    }
}

impl Default for SerializerFactory {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_FACTORY: Lazy<SerializerFactory> = Lazy::new(SerializerFactory::new);

/// Shared factory with the built-in codecs
pub fn default_factory() -> &'static SerializerFactory {
    &DEFAULT_FACTORY
}

/// Encode data in the given format with the built-in codecs
pub fn serialize<T: Serializable + ?Sized>(data: &T, format: OutputFormat) -> FormatResult<String> {
    default_factory().serialize(data, format)
}

/// Lenient counterpart of [`serialize`]
pub fn render<T: Serializable + ?Sized>(data: &T, format: OutputFormat) -> String {
    default_factory().render(data, format)
}

/// Write data in the given format; failures are logged
pub fn apply_output_format<W, T>(writer: &mut W, data: &T, format: OutputFormat)
where
    W: Write + ?Sized,
    T: Serializable + ?Sized,
{
    default_factory().apply_output_format(writer, data, format);
}

/// Write data in the process-wide current format; failures are logged
pub fn apply_current_format<W, T>(writer: &mut W, data: &T)
where
    W: Write + ?Sized,
    T: Serializable + ?Sized,
{
    apply_output_format(writer, data, get_output_format());
}
