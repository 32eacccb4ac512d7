//! Configuration document persistence
//!
//! Documents are a single top-level mapping encoded as JSON (`.json`) or YAML
//! (`.yaml`, `.yml`). Any other extension is rejected before the file is
//! touched.

use std::path::Path;

use confstore_format::{bridge, codecs, FormatError, Mapping, ValueTree};
use tracing::debug;

use crate::error::{IoOperation, StoreError, StoreResult};

/// On-disk encoding selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistFormat {
    Json,
    Yaml,
}

impl PersistFormat {
    /// Map a file extension to a persistence format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(PersistFormat::Json),
            "yaml" | "yml" => Some(PersistFormat::Yaml),
            _ => None,
        }
    }

    /// Detect the format of a path from its extension
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
            .ok_or_else(|| StoreError::unsupported_format(path.to_path_buf(), extension))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PersistFormat::Json => "JSON",
            PersistFormat::Yaml => "YAML",
        }
    }

    /// Parse document text into its top-level mapping
    ///
    /// An empty YAML document is an empty mapping; any other non-mapping
    /// top level is a parse error.
    pub fn parse(&self, content: &str, path: &Path) -> StoreResult<Mapping> {
        let tree = match self {
            PersistFormat::Json => serde_json::from_str::<ValueTree>(content)
                .map_err(|e| StoreError::parse_error(path.to_path_buf(), self.name(), e.to_string()))?,
            PersistFormat::Yaml => bridge::parse_yaml(content)
                .map_err(|e| StoreError::parse_error(path.to_path_buf(), self.name(), e.to_string()))?,
        };

        match tree {
            ValueTree::Mapping(map) => Ok(map),
            ValueTree::Null => Ok(Mapping::new()),
            other => Err(StoreError::parse_error(
                path.to_path_buf(),
                self.name(),
                format!("top-level value must be a mapping, found {}", other.type_name()),
            )),
        }
    }

    /// Encode a top-level mapping as document text
    ///
    /// JSON has no spelling for NaN or infinite floats, so documents holding
    /// them fail to encode as JSON rather than saving `null`.
    pub fn encode(&self, document: &Mapping, json_indent: usize, path: &Path) -> StoreResult<String> {
        let encoded = match self {
            PersistFormat::Json => codecs::ensure_finite_entries(document.iter())
                .and_then(|()| codecs::to_pretty_json(document, json_indent))
                .map(|text| text + "\n"),
            PersistFormat::Yaml => {
                let mapping: serde_yaml::Mapping = document
                    .iter()
                    .map(|(k, v)| (serde_yaml::Value::String(k.to_string()), bridge::to_yaml(v)))
                    .collect();
                serde_yaml::to_string(&serde_yaml::Value::Mapping(mapping)).map_err(FormatError::from)
            }
        };
        encoded.map_err(|e| StoreError::parse_error(path.to_path_buf(), self.name(), e.to_string()))
    }
}

/// Read and parse a document
pub fn read_document(path: &Path, format: PersistFormat) -> StoreResult<Mapping> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StoreError::io_error(path.to_path_buf(), IoOperation::Read, e))?;
    let document = format.parse(&content, path)?;
    debug!(
        "Read {} keys from {} ({})",
        document.len(),
        path.display(),
        format.name()
    );
    Ok(document)
}

/// Encode and write a document
pub fn write_document(
    path: &Path,
    format: PersistFormat,
    document: &Mapping,
    json_indent: usize,
) -> StoreResult<()> {
    let content = format.encode(document, json_indent, path)?;
    std::fs::write(path, content)
        .map_err(|e| StoreError::io_error(path.to_path_buf(), IoOperation::Write, e))?;
    debug!(
        "Wrote {} keys to {} ({})",
        document.len(),
        path.display(),
        format.name()
    );
    Ok(())
}
