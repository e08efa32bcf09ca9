//! Excel exporter implementation - Grid → .xlsx

use crate::error::{EditorError, EditorResult};
use crate::types::Grid;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Writes a grid to a single-sheet .xlsx workbook
pub struct ExcelExporter {
    sheet_name: String,
    typed_numbers: bool,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(sheet_name: impl Into<String>, typed_numbers: bool) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            typed_numbers,
        }
    }

    /// Serialize the grid to .xlsx bytes
    pub fn to_buffer(&self, grid: &Grid) -> EditorResult<Vec<u8>> {
        let mut workbook = self.build_workbook(grid)?;
        workbook
            .save_to_buffer()
            .map_err(|e| EditorError::Export(format!("Failed to serialize workbook: {}", e)))
    }

    /// Export the grid to an .xlsx file
    pub fn save(&self, grid: &Grid, output_path: &Path) -> EditorResult<()> {
        let mut workbook = self.build_workbook(grid)?;
        workbook
            .save(output_path)
            .map_err(|e| EditorError::Export(format!("Failed to save Excel file: {}", e)))
    }

    fn build_workbook(&self, grid: &Grid) -> EditorResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| EditorError::Export(format!("Failed to set worksheet name: {}", e)))?;
        let blank = Format::new();

        for (row_idx, row) in grid.rows().iter().enumerate() {
            let excel_row = u32::try_from(row_idx)
                .map_err(|_| EditorError::Export(format!("Row {} out of range", row_idx)))?;
            for (col_idx, value) in row.iter().enumerate() {
                let excel_col = u16::try_from(col_idx)
                    .map_err(|_| EditorError::Export(format!("Column {} out of range", col_idx)))?;
                self.write_cell(worksheet, excel_row, excel_col, value, &blank)?;
            }
        }

        Ok(workbook)
    }

    fn write_cell(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &str,
        blank: &Format,
    ) -> EditorResult<()> {
        // Unformatted blanks emit no <c> element but still widen the sheet's <dimension>
        let result = if value.is_empty() {
            worksheet.write_blank(row, col, blank)
        } else {
            match exact_number(value).filter(|_| self.typed_numbers) {
                Some(number) => worksheet.write_number(row, col, number),
                None => worksheet.write_string(row, col, value),
            }
        };
        result
            .map(|_| ())
            .map_err(|e| EditorError::Export(format!("Failed to write cell: {}", e)))
    }
}

/// Parse `value` as a number only if it renders back to the same text,
/// so re-importing the written number yields the original string.
fn exact_number(value: &str) -> Option<f64> {
    let number: f64 = value.parse().ok()?;
    (number.is_finite() && number.to_string() == value).then_some(number)
}
