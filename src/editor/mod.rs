//! Spreadsheet editor state
//!
//! [`SpreadsheetEditor`] owns the loaded grid together with the file name,
//! loading flag, error banner and edit cursor. Every user action is a method
//! on it; rendering goes through the read-only [`GridView`] projection.
//!
//! Imports are split into [`SpreadsheetEditor::begin_import`] and
//! [`SpreadsheetEditor::complete_import`] so the file read can happen without
//! holding the editor. Each import gets a generation-tagged [`ImportTicket`];
//! a completion whose ticket was superseded by a newer import or by
//! [`SpreadsheetEditor::clear`] is discarded.

pub mod session;
mod view;

pub use session::EditorSession;
pub use view::{Controls, DataRow, GridView, TableView};

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::{CellRef, Grid};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FILE_READ_MESSAGE: &str = "An error occurred while reading the file.";
pub const PARSE_ERROR_MESSAGE: &str =
    "Failed to read the Excel file. Please ensure it is a valid Excel file.";
pub const EXPORT_ERROR_MESSAGE: &str = "Failed to save the Excel file.";

/// Error banner shown to the user. Only the fixed message is kept; the cause is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorState {
    FileRead,
    Parse,
    Export,
}

impl ErrorState {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorState::FileRead => FILE_READ_MESSAGE,
            ErrorState::Parse => PARSE_ERROR_MESSAGE,
            ErrorState::Export => EXPORT_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The cell currently open for editing and the text typed into it so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    pub cell: CellRef,
    pub draft: String,
}

/// Handle for one in-flight import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Loaded { rows: usize, cols: usize },
    Failed(ErrorState),
    /// Superseded by a newer import or a clear; state untouched
    Stale,
    /// No file was selected
    Skipped,
}

pub struct SpreadsheetEditor {
    config: EditorConfig,
    importer: ExcelImporter,
    exporter: ExcelExporter,
    grid: Grid,
    file_name: String,
    error: Option<ErrorState>,
    edit: Option<EditCursor>,
    generation: u64,
    pending_import: Option<u64>,
}

impl Default for SpreadsheetEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl SpreadsheetEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            importer: ExcelImporter::new(config.ragged_rows),
            exporter: ExcelExporter::new(config.sheet_name.clone(), config.typed_numbers),
            config,
            grid: Grid::new(),
            file_name: String::new(),
            error: None,
            edit: None,
            generation: 0,
            pending_import: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn error(&self) -> Option<ErrorState> {
        self.error
    }

    pub fn is_loading(&self) -> bool {
        self.pending_import.is_some()
    }

    pub fn edit_cursor(&self) -> Option<&EditCursor> {
        self.edit.as_ref()
    }

    //==========================================================================
    // Import
    //==========================================================================

    /// Start an import: set loading, clear the error banner, record the file name
    pub fn begin_import(&mut self, file_name: impl Into<String>) -> ImportTicket {
        self.generation += 1;
        self.pending_import = Some(self.generation);
        self.error = None;
        self.file_name = file_name.into();
        debug!(file = %self.file_name, generation = self.generation, "import started");
        ImportTicket {
            generation: self.generation,
        }
    }

    /// Finish an import with the result of reading the file
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        read: io::Result<Vec<u8>>,
    ) -> ImportOutcome {
        if self.pending_import != Some(ticket.generation) {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale import"
            );
            return ImportOutcome::Stale;
        }
        self.pending_import = None;
        self.edit = None;

        let parsed = read
            .map_err(|e| EditorError::FileRead(e.to_string()))
            .and_then(|bytes| self.importer.parse(&bytes));

        match parsed {
            Ok(grid) => {
                info!(
                    file = %self.file_name,
                    rows = grid.row_count(),
                    cols = grid.width(),
                    "spreadsheet loaded"
                );
                let outcome = ImportOutcome::Loaded {
                    rows: grid.row_count(),
                    cols: grid.width(),
                };
                self.grid = grid;
                outcome
            }
            Err(e) => {
                let state = match e {
                    EditorError::FileRead(_) => ErrorState::FileRead,
                    _ => ErrorState::Parse,
                };
                warn!(file = %self.file_name, error = %e, "import failed");
                self.grid = Grid::new();
                self.error = Some(state);
                ImportOutcome::Failed(state)
            }
        }
    }

    /// Import already-read bytes in one step
    pub fn import_bytes(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> ImportOutcome {
        let ticket = self.begin_import(file_name);
        self.complete_import(ticket, Ok(bytes))
    }

    /// Import a file from disk, blocking on the read
    pub fn import_path(&mut self, path: &Path) -> ImportOutcome {
        let ticket = self.begin_import(display_name(path));
        let read = std::fs::read(path);
        self.complete_import(ticket, read)
    }

    //==========================================================================
    // Cell editing
    //==========================================================================

    fn check_editable(&self, cell: CellRef) -> EditorResult<()> {
        if !self.grid.contains(cell) {
            return Err(EditorError::OutOfBounds(cell));
        }
        if cell.row == 0 && !self.config.editable_header {
            return Err(EditorError::HeaderNotEditable(cell));
        }
        Ok(())
    }

    /// Open `cell` for editing. A different cell already open is committed first.
    pub fn begin_edit(&mut self, cell: CellRef) -> EditorResult<()> {
        self.check_editable(cell)?;

        if self.edit.as_ref().is_some_and(|current| current.cell == cell) {
            return Ok(());
        }
        self.commit_edit()?;

        let draft = self.grid.get(cell).unwrap_or_default().to_string();
        debug!(cell = %cell, "editing");
        self.edit = Some(EditCursor { cell, draft });
        Ok(())
    }

    /// Replace the pending text of the open cell
    pub fn set_draft(&mut self, text: impl Into<String>) -> EditorResult<()> {
        let cursor = self.edit.as_mut().ok_or(EditorError::NotEditing)?;
        cursor.draft = text.into();
        Ok(())
    }

    /// Write the draft into the grid and close the editor. Used for both blur and Enter.
    pub fn commit_edit(&mut self) -> EditorResult<Option<CellRef>> {
        let Some(cursor) = self.edit.take() else {
            return Ok(None);
        };
        self.grid.set(cursor.cell, cursor.draft)?;
        debug!(cell = %cursor.cell, "edit committed");
        Ok(Some(cursor.cell))
    }

    /// Close the editor without writing the draft
    pub fn cancel_edit(&mut self) -> Option<CellRef> {
        self.edit.take().map(|cursor| cursor.cell)
    }

    /// Write `value` into `cell` directly and close the editor
    pub fn edit_cell(&mut self, cell: CellRef, value: impl Into<String>) -> EditorResult<()> {
        self.check_editable(cell)?;

        if let Some(cursor) = self.edit.take() {
            if cursor.cell != cell {
                self.grid.set(cursor.cell, cursor.draft)?;
            }
        }
        self.grid.set(cell, value)?;
        debug!(cell = %cell, "cell updated");
        Ok(())
    }

    //==========================================================================
    // Clear
    //==========================================================================

    /// Reset to the empty state and invalidate any in-flight import
    pub fn clear(&mut self) {
        self.grid = Grid::new();
        self.file_name.clear();
        self.error = None;
        self.edit = None;
        self.generation += 1;
        self.pending_import = None;
        info!("editor cleared");
    }

    //==========================================================================
    // Export
    //==========================================================================

    /// File name the export is written under
    pub fn download_name(&self) -> String {
        if self.file_name.is_empty() {
            return self.config.default_export_name.clone();
        }
        Path::new(&self.file_name)
            .with_extension("xlsx")
            .to_string_lossy()
            .into_owned()
    }

    /// Serialize the grid to .xlsx bytes, committing any open edit first
    pub fn export_document(&mut self) -> EditorResult<Vec<u8>> {
        self.commit_edit()?;
        let result = self.exporter.to_buffer(&self.grid);
        self.record_export(result)
    }

    /// Write the grid to `path`, committing any open edit first
    pub fn export_as(&mut self, path: &Path) -> EditorResult<PathBuf> {
        self.commit_edit()?;
        let result = self.exporter.save(&self.grid, path);
        self.record_export(result)?;
        info!(path = %path.display(), rows = self.grid.row_count(), "spreadsheet exported");
        Ok(path.to_path_buf())
    }

    /// Write the grid into `dir` under [`Self::download_name`]
    pub fn export_to_dir(&mut self, dir: &Path) -> EditorResult<PathBuf> {
        let path = dir.join(self.download_name());
        self.export_as(&path)
    }

    fn record_export<T>(&mut self, result: EditorResult<T>) -> EditorResult<T> {
        if let Err(e) = &result {
            warn!(error = %e, "export failed");
            self.error = Some(ErrorState::Export);
        }
        result
    }

    //==========================================================================
    // Projections
    //==========================================================================

    pub fn view(&self) -> GridView<'_> {
        GridView::new(self)
    }

    pub fn controls(&self) -> Controls {
        Controls::new(self)
    }
}

/// File name component of `path`, used as the import label
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
