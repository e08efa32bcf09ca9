//! Excel import/export
//!
//! - Import: first worksheet of a workbook → Grid (calamine)
//! - Export: Grid → single-sheet .xlsx (rust_xlsxwriter)

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
