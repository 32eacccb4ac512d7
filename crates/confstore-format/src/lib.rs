//! Confstore value model and output formats
//!
//! This crate provides the generic [`ValueTree`] shared by the configuration
//! store and every encoder, the per-format [`Codec`] set, the YAML bridge used
//! to read YAML documents back into value trees, and the process-wide
//! [`FormatManager`] that selects the current output format.
//!
//! ```ignore
//! use confstore_format::{serialize, OutputFormat, ValueTree};
//!
//! let value = ValueTree::from([("key", ValueTree::from("value"))]);
//! let yaml = serialize(&value, OutputFormat::Yaml)?;
//! assert_eq!(yaml, "key: value\n");
//! ```

pub mod bridge;
pub mod codecs;
pub mod error;
pub mod format;
pub mod manager;
pub mod payload;
pub mod serializer;
pub mod value;

pub use bridge::{emit_yaml, from_yaml, parse_yaml, probe_scalar, to_yaml};
pub use codecs::{
    ensure_finite, ensure_finite_entries, to_compact_json, to_pretty_json, Codec, CsvCodec,
    HtmlCodec, JsonCodec, PlainTextCodec, XmlCodec, YamlCodec, DEFAULT_JSON_INDENT,
    MAX_JSON_INDENT,
};
pub use error::{FormatError, FormatResult};
pub use format::OutputFormat;
pub use manager::{
    format_manager, get_output_format, list_output_formats, reset_output_format,
    set_output_format, FormatManager,
};
pub use payload::{Payload, Serializable};
pub use serializer::{
    apply_current_format, apply_output_format, default_factory, render, serialize,
    SerializerFactory,
};
pub use value::{Mapping, ValueTree};
