//! Supported output formats

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Output format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Raw text
    #[default]
    PlainText,
    Json,
    Xml,
    Yaml,
    Html,
    Csv,
}

impl OutputFormat {
    /// All formats in declaration order
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::PlainText,
            OutputFormat::Json,
            OutputFormat::Xml,
            OutputFormat::Yaml,
            OutputFormat::Html,
            OutputFormat::Csv,
        ]
    }

    /// Human-readable name of the format
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::PlainText => "Plain Text",
            OutputFormat::Json => "JSON",
            OutputFormat::Xml => "XML",
            OutputFormat::Yaml => "YAML",
            OutputFormat::Html => "HTML",
            OutputFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::all()
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::unsupported(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for format in OutputFormat::all() {
            assert_eq!(format.name().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "TOML".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormat(name) if name == "TOML"));
    }

    #[test]
    fn test_default_is_plain_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::PlainText);
        assert_eq!(OutputFormat::PlainText.to_string(), "Plain Text");
    }
}
