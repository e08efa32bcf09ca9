//! Terminal rendering of the editor view

use crate::editor::{GridView, TableView};
use crate::types::column_index_to_letter;
use colored::{ColoredString, Colorize};

const SEPARATOR: &str = "  ";

/// Render the file label, error banner, loading line and table.
/// Renders nothing for the table when the grid is empty.
pub fn render(view: &GridView<'_>, color: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(name) = view.file_name {
        lines.push(paint(format!("File: {}", name), color, |s| s.blue()));
    }
    if let Some(message) = view.error {
        lines.push(paint(format!("Error: {}", message), color, |s| s.red().bold()));
    }
    if view.loading {
        lines.push(paint("Loading...".to_string(), color, |s| s.yellow()));
    }
    if let Some(table) = &view.table {
        lines.extend(render_table(view, table, color));
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn render_table(view: &GridView<'_>, table: &TableView<'_>, color: bool) -> Vec<String> {
    let col_count = table
        .rows
        .iter()
        .map(|row| row.cells.len())
        .chain(std::iter::once(table.header.len()))
        .max()
        .unwrap_or(0);
    let row_count = table.rows.len() + 1;

    let display = |row: usize, col: usize| -> String {
        let text = view.cell_text(row, col);
        if view.is_editing(row, col) {
            format!("[{}]", text)
        } else {
            text.to_string()
        }
    };

    let letters: Vec<String> = (0..col_count).map(column_index_to_letter).collect();
    let mut widths: Vec<usize> = letters.iter().map(|l| l.chars().count()).collect();
    for row in 0..row_count {
        for (col, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(display(row, col).chars().count());
        }
    }
    let gutter = row_count.to_string().len();

    let line = |label: &str, cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        format!("{:>gutter$}{}{}", label, SEPARATOR, padded.join(SEPARATOR))
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(row_count + 2);
    lines.push(paint(line("", letters), color, |s| s.dimmed()));

    let header_cells = (0..col_count).map(|col| display(0, col)).collect();
    lines.push(paint(line("1", header_cells), color, |s| {
        s.bold().white().on_blue()
    }));
    lines.push(line("", widths.iter().map(|w| "-".repeat(*w)).collect()));

    for data_row in &table.rows {
        let cells = (0..col_count).map(|col| display(data_row.index, col)).collect();
        let text = line(&(data_row.index + 1).to_string(), cells);
        if data_row.striped {
            lines.push(paint(text, color, |s| s.on_bright_black()));
        } else {
            lines.push(text);
        }
    }

    lines
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn paint(text: String, color: bool, style: impl Fn(ColoredString) -> ColoredString) -> String {
    if color {
        style(text.normal()).to_string()
    } else {
        text
    }
}
