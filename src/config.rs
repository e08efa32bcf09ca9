//! Editor configuration
//!
//! All fields have defaults, so an empty YAML file (or no file at all) is a
//! valid configuration.

use crate::error::EditorResult;
use crate::types::RaggedPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name used for exports when no file has been loaded
pub const DEFAULT_EXPORT_NAME: &str = "updated_excel_file.xlsx";

/// Worksheet name written on export
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Worksheet name of the exported document
    pub sheet_name: String,
    /// File name used by export when nothing has been imported
    pub default_export_name: String,
    /// Handling of rows whose length differs from the header
    pub ragged_rows: RaggedPolicy,
    /// Allow editing cells of row 0
    pub editable_header: bool,
    /// Write numeric-looking strings as number cells on export
    pub typed_numbers: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            default_export_name: DEFAULT_EXPORT_NAME.to_string(),
            ragged_rows: RaggedPolicy::default(),
            editable_header: false,
            typed_numbers: true,
        }
    }
}

impl EditorConfig {
    pub fn from_yaml_str(yaml: &str) -> EditorResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> EditorResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.sheet_name, "Sheet1");
        assert_eq!(config.default_export_name, "updated_excel_file.xlsx");
        assert_eq!(config.ragged_rows, RaggedPolicy::Pad);
        assert!(!config.editable_header);
        assert!(config.typed_numbers);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            EditorConfig::from_yaml_str("").unwrap(),
            EditorConfig::default()
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EditorConfig::from_yaml_str("ragged_rows: reject\neditable_header: true\n")
            .unwrap();
        assert_eq!(config.ragged_rows, RaggedPolicy::Reject);
        assert!(config.editable_header);
        assert_eq!(config.sheet_name, "Sheet1");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(EditorConfig::from_yaml_str("colour: blue\n").is_err());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sheet_name: Data").unwrap();
        writeln!(file, "typed_numbers: false").unwrap();

        let config = EditorConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.sheet_name, "Data");
        assert!(!config.typed_numbers);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EditorConfig::from_yaml_file(Path::new("/nonexistent/gridedit.yaml"));
        assert!(matches!(result, Err(crate::error::EditorError::Io(_))));
    }
}
