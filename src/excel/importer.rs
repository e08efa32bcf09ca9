//! Excel importer implementation - spreadsheet bytes → Grid

use crate::error::{EditorError, EditorResult};
use crate::types::{Grid, RaggedPolicy};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use std::io::{Cursor, Read, Seek};

/// Reads the first worksheet of a workbook (.xlsx, .xls, .xlsb, .ods) into a grid of strings
pub struct ExcelImporter {
    ragged_rows: RaggedPolicy,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new(ragged_rows: RaggedPolicy) -> Self {
        Self { ragged_rows }
    }

    /// Parse raw workbook bytes
    pub fn parse(&self, bytes: &[u8]) -> EditorResult<Grid> {
        let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| EditorError::Parse(format!("Failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let first_sheet = sheet_names
            .first()
            .ok_or_else(|| EditorError::Parse("Workbook has no worksheets".to_string()))?;

        let range = workbook
            .worksheet_range(first_sheet)
            .map_err(|e| EditorError::Parse(format!("Failed to read sheet '{}': {}", first_sheet, e)))?;

        // calamine drops blank cells, the sheet's <dimension> keeps them
        let declared = match &mut workbook {
            Sheets::Xlsx(xlsx) => declared_size(xlsx, first_sheet),
            _ => None,
        };

        self.range_to_grid(&range, declared)
    }

    /// Convert a worksheet range to a grid anchored at A1, at least `declared` in size
    fn range_to_grid(
        &self,
        range: &Range<Data>,
        declared: Option<(usize, usize)>,
    ) -> EditorResult<Grid> {
        let used = match range.start() {
            Some((start_row, start_col)) => {
                let (height, width) = range.get_size();
                (start_row as usize + height, start_col as usize + width)
            }
            None => (0, 0),
        };

        let (height, width) = match declared {
            // An untouched sheet still declares A1
            Some((1, 1)) if used == (0, 0) => used,
            Some((height, width)) => (used.0.max(height), used.1.max(width)),
            None => used,
        };
        if height == 0 || width == 0 {
            return Ok(Grid::new());
        }

        let mut rows = vec![vec![String::new(); width]; height];
        if let Some((start_row, start_col)) = range.start() {
            let (start_row, start_col) = (start_row as usize, start_col as usize);
            for (target, source) in rows[start_row..].iter_mut().zip(range.rows()) {
                for (slot, cell) in target[start_col..].iter_mut().zip(source) {
                    *slot = cell_to_string(cell);
                }
            }
        }

        Grid::from_rows(rows, self.ragged_rows)
    }
}

/// Row and column count declared by an .xlsx worksheet's `<dimension ref>`
fn declared_size<RS: Read + Seek>(xlsx: &mut Xlsx<RS>, sheet: &str) -> Option<(usize, usize)> {
    let dimensions = xlsx.worksheet_cells_reader(sheet).ok()?.dimensions();
    Some((dimensions.end.0 as usize + 1, dimensions.end.1 as usize + 1))
}

/// Render a cell value as the string shown in the grid
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
