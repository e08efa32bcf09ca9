use crate::types::CellRef;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Spreadsheet parse error: {0}")]
    Parse(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    #[error("Cell {0} is outside the grid")]
    OutOfBounds(CellRef),

    #[error("Header cell {0} is not editable")]
    HeaderNotEditable(CellRef),

    #[error("No cell is being edited")]
    NotEditing,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
