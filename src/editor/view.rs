//! Read-only projections of the editor state used for rendering

use super::{EditCursor, SpreadsheetEditor};

/// Everything a renderer needs to draw the editor
#[derive(Debug)]
pub struct GridView<'a> {
    pub file_name: Option<&'a str>,
    pub error: Option<&'static str>,
    pub loading: bool,
    /// `None` when the grid is empty
    pub table: Option<TableView<'a>>,
    pub editing: Option<&'a EditCursor>,
}

#[derive(Debug)]
pub struct TableView<'a> {
    pub header: &'a [String],
    pub rows: Vec<DataRow<'a>>,
}

#[derive(Debug)]
pub struct DataRow<'a> {
    /// Index into the grid (header is row 0)
    pub index: usize,
    pub cells: &'a [String],
    /// Alternate background, starting with the first data row
    pub striped: bool,
}

impl<'a> GridView<'a> {
    pub(super) fn new(editor: &'a SpreadsheetEditor) -> Self {
        let table = editor.grid.header().map(|header| TableView {
            header,
            rows: editor
                .grid
                .data_rows()
                .iter()
                .enumerate()
                .map(|(i, cells)| DataRow {
                    index: i + 1,
                    cells,
                    striped: i % 2 == 0,
                })
                .collect(),
        });

        Self {
            file_name: Some(editor.file_name.as_str()).filter(|name| !name.is_empty()),
            error: editor.error.map(|state| state.message()),
            loading: editor.is_loading(),
            table,
            editing: editor.edit.as_ref(),
        }
    }

    /// Text shown for a cell: the draft if it is being edited, else its value
    pub fn cell_text(&self, row: usize, col: usize) -> &'a str {
        if let Some(cursor) = self.editing {
            if cursor.cell.row == row && cursor.cell.col == col {
                return &cursor.draft;
            }
        }
        self.table
            .as_ref()
            .and_then(|table| {
                if row == 0 {
                    table.header.get(col)
                } else {
                    table.rows.get(row - 1).and_then(|r| r.cells.get(col))
                }
            })
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_editing(&self, row: usize, col: usize) -> bool {
        self.editing
            .is_some_and(|cursor| cursor.cell.row == row && cursor.cell.col == col)
    }
}

/// Which actions are currently offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub upload_enabled: bool,
    pub clear_visible: bool,
    pub clear_enabled: bool,
    pub export_visible: bool,
}

impl Controls {
    pub(super) fn new(editor: &SpreadsheetEditor) -> Self {
        let loading = editor.is_loading();
        let has_data = !editor.grid.is_empty();
        Self {
            upload_enabled: !loading,
            clear_visible: has_data,
            clear_enabled: has_data && !loading,
            export_visible: has_data,
        }
    }
}
