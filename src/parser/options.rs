//! Extraction options and configuration.

use crate::validate::MAX_FILE_SIZE;

/// Options for loading and extracting PDF documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Check the input (size, extension, `%PDF` header) before loading it
    pub validate: bool,

    /// Largest accepted input in bytes
    pub max_file_size: u64,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable input validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Skip input validation.
    pub fn unchecked(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Set the maximum input size in bytes.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            validate: true,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new().unchecked().with_max_file_size(1024);
        assert!(!options.validate);
        assert_eq!(options.max_file_size, 1024);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert!(options.validate);
        assert_eq!(options.max_file_size, 500 * 1024 * 1024);
        assert_eq!(options.with_validation(false), ExtractOptions::new().unchecked());
    }
}
