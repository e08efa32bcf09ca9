//! gridedit - spreadsheet grid editor
//!
//! Loads the first worksheet of a spreadsheet as a grid of text cells, lets
//! single cells be edited in place, and writes the grid back out as .xlsx.
//!
//! # Features
//!
//! - Import .xlsx / .xls / .xlsb / .ods (first sheet, row 0 is the header)
//! - One cell open for editing at a time; switching cells commits the draft
//! - Export to a single-sheet .xlsx under the loaded file name
//! - Stale imports (after a clear or a newer import) are discarded
//!
//! # Example
//!
//! ```no_run
//! use gridedit::editor::SpreadsheetEditor;
//! use gridedit::types::CellRef;
//! use std::path::Path;
//!
//! let mut editor = SpreadsheetEditor::default();
//! editor.import_path(Path::new("prices.xlsx"));
//!
//! editor.begin_edit(CellRef::new(1, 1))?;
//! editor.set_draft("4.50")?;
//! editor.commit_edit()?;
//!
//! editor.export_to_dir(Path::new("."))?;
//! # Ok::<(), gridedit::error::EditorError>(())
//! ```

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod excel;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::{EditorSession, ImportOutcome, SpreadsheetEditor};
pub use error::{EditorError, EditorResult};
pub use types::{CellRef, Grid, RaggedPolicy};
