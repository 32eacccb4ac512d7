//! Current output format selection
//!
//! [`FormatManager`] holds the "current" output format behind a reader-writer
//! lock: reads run concurrently, writes are exclusive and last-writer-wins.
//! A process-wide instance is available through [`format_manager`] together
//! with the `*_output_format` convenience functions.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::format::OutputFormat;

/// Holder of the currently selected output format
#[derive(Debug, Default)]
pub struct FormatManager {
    current: RwLock<OutputFormat>,
}

impl FormatManager {
    /// Create a manager starting at plain text
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager starting at the given format
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            current: RwLock::new(format),
        }
    }

    pub fn set_format(&self, format: OutputFormat) {
        *self.current.write() = format;
        debug!("Output format set to {}", format);
    }

    pub fn get_format(&self) -> OutputFormat {
        *self.current.read()
    }

    /// All supported formats
    pub fn list_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::all().to_vec()
    }

    /// Restore the default plain text format
    pub fn reset(&self) {
        self.set_format(OutputFormat::default());
    }
}

static FORMAT_MANAGER: Lazy<FormatManager> = Lazy::new(FormatManager::new);

/// Process-wide format manager
pub fn format_manager() -> &'static FormatManager {
    &FORMAT_MANAGER
}

pub fn set_output_format(format: OutputFormat) {
    format_manager().set_format(format);
}

pub fn get_output_format() -> OutputFormat {
    format_manager().get_format()
}

pub fn list_output_formats() -> Vec<OutputFormat> {
    format_manager().list_formats()
}

pub fn reset_output_format() {
    format_manager().reset();
}
