use crate::error::{EditorError, EditorResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

//==============================================================================
// Cell References
//==============================================================================

/// Zero-based cell coordinate. Row 0 is the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// A1-style name of this cell (row 0, col 0 → "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_index_to_letter(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

impl FromStr for CellRef {
    type Err = EditorError;

    /// Accepts A1 notation (`B2`) or zero-based `row,col` (`1,1`).
    fn from_str(s: &str) -> EditorResult<Self> {
        let input = s.trim();

        static A1_PATTERN: OnceLock<Regex> = OnceLock::new();
        static NUMERIC_PATTERN: OnceLock<Regex> = OnceLock::new();

        let a1_pattern = A1_PATTERN
            .get_or_init(|| Regex::new(r"^([A-Za-z]{1,3})([0-9]+)$").expect("valid regex"));
        if let Some(captures) = a1_pattern.captures(input) {
            let col = column_letter_to_index(&captures[1])
                .ok_or_else(|| EditorError::InvalidCell(s.to_string()))?;
            let row: usize = captures[2]
                .parse()
                .map_err(|_| EditorError::InvalidCell(s.to_string()))?;
            if row == 0 {
                return Err(EditorError::InvalidCell(s.to_string()));
            }
            return Ok(CellRef::new(row - 1, col));
        }

        let numeric_pattern = NUMERIC_PATTERN
            .get_or_init(|| Regex::new(r"^([0-9]+)\s*[,:]\s*([0-9]+)$").expect("valid regex"));
        if let Some(captures) = numeric_pattern.captures(input) {
            let row = captures[1]
                .parse()
                .map_err(|_| EditorError::InvalidCell(s.to_string()))?;
            let col = captures[2]
                .parse()
                .map_err(|_| EditorError::InvalidCell(s.to_string()))?;
            return Ok(CellRef::new(row, col));
        }

        Err(EditorError::InvalidCell(s.to_string()))
    }
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Inverse of [`column_index_to_letter`]. Case-insensitive.
pub fn column_letter_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc - 1)
}

//==============================================================================
// Grid
//==============================================================================

/// How rows whose length differs from the rest of the grid are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaggedPolicy {
    /// Pad every row with empty cells up to the widest row
    #[default]
    Pad,
    /// Cut every row to the header width (short rows are padded)
    Truncate,
    /// Fail with `EditorError::RaggedRow`
    Reject,
}

/// Rows of string cells. Row 0 is the header, the rest are data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from raw rows, applying `policy` to ragged rows
    pub fn from_rows(rows: Vec<Vec<String>>, policy: RaggedPolicy) -> EditorResult<Self> {
        let mut grid = Self { rows };
        grid.normalize(policy)?;
        Ok(grid)
    }

    fn normalize(&mut self, policy: RaggedPolicy) -> EditorResult<()> {
        let Some(header) = self.rows.first() else {
            return Ok(());
        };
        let header_width = header.len();

        match policy {
            RaggedPolicy::Pad => {
                let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
                for row in &mut self.rows {
                    row.resize(width, String::new());
                }
            }
            RaggedPolicy::Truncate => {
                for row in &mut self.rows {
                    row.resize(header_width, String::new());
                }
            }
            RaggedPolicy::Reject => {
                if let Some((idx, row)) = self
                    .rows
                    .iter()
                    .enumerate()
                    .find(|(_, row)| row.len() != header_width)
                {
                    return Err(EditorError::RaggedRow {
                        row: idx,
                        expected: header_width,
                        found: row.len(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the header row
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn get(&self, cell: CellRef) -> Option<&str> {
        self.rows
            .get(cell.row)
            .and_then(|row| row.get(cell.col))
            .map(String::as_str)
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        self.get(cell).is_some()
    }

    /// Overwrite a single cell. Returns the previous value.
    pub fn set(&mut self, cell: CellRef, value: impl Into<String>) -> EditorResult<String> {
        let slot = self
            .rows
            .get_mut(cell.row)
            .and_then(|row| row.get_mut(cell.col))
            .ok_or(EditorError::OutOfBounds(cell))?;
        Ok(std::mem::replace(slot, value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(51), "AZ");
        assert_eq!(column_index_to_letter(52), "BA");
        assert_eq!(column_index_to_letter(702), "AAA");
    }

    #[test]
    fn test_column_letter_to_index() {
        assert_eq!(column_letter_to_index("A"), Some(0));
        assert_eq!(column_letter_to_index("z"), Some(25));
        assert_eq!(column_letter_to_index("AA"), Some(26));
        assert_eq!(column_letter_to_index("AAA"), Some(702));
        assert_eq!(column_letter_to_index(""), None);
        assert_eq!(column_letter_to_index("A1"), None);
    }

    #[test]
    fn test_cell_ref_parse_a1() {
        assert_eq!("A1".parse::<CellRef>().unwrap(), CellRef::new(0, 0));
        assert_eq!("b2".parse::<CellRef>().unwrap(), CellRef::new(1, 1));
        assert_eq!("AA10".parse::<CellRef>().unwrap(), CellRef::new(9, 26));
    }

    #[test]
    fn test_cell_ref_parse_numeric() {
        assert_eq!("1,2".parse::<CellRef>().unwrap(), CellRef::new(1, 2));
        assert_eq!("3:0".parse::<CellRef>().unwrap(), CellRef::new(3, 0));
        assert_eq!(" 4 , 5 ".parse::<CellRef>().unwrap(), CellRef::new(4, 5));
    }

    #[test]
    fn test_cell_ref_parse_invalid() {
        assert!("A0".parse::<CellRef>().is_err());
        assert!("".parse::<CellRef>().is_err());
        assert!("1-2".parse::<CellRef>().is_err());
        assert!("ABCD1".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_cell_ref_parse_shared_patterns_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    (0..100)
                        .map(|row| {
                            let a1 = format!("C{}", row + 1).parse::<CellRef>().unwrap();
                            let numeric = format!("{},{}", row, i).parse::<CellRef>().unwrap();
                            (a1, numeric)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            for (row, (a1, numeric)) in handle.join().unwrap().into_iter().enumerate() {
                assert_eq!(a1, CellRef::new(row, 2));
                assert_eq!(numeric, CellRef::new(row, i));
            }
        }
    }

    #[test]
    fn test_cell_ref_display() {
        assert_eq!(CellRef::new(1, 1).to_string(), "B2");
        assert_eq!(CellRef::new(0, 27).to_string(), "AB1");
    }

    #[test]
    fn test_grid_pad_policy() {
        let grid = Grid::from_rows(rows(&[&["A", "B"], &["1"], &["x", "y", "z"]]), RaggedPolicy::Pad)
            .unwrap();
        assert_eq!(
            grid.rows(),
            rows(&[&["A", "B", ""], &["1", "", ""], &["x", "y", "z"]]).as_slice()
        );
    }

    #[test]
    fn test_grid_truncate_policy() {
        let grid = Grid::from_rows(
            rows(&[&["A", "B"], &["1"], &["x", "y", "z"]]),
            RaggedPolicy::Truncate,
        )
        .unwrap();
        assert_eq!(
            grid.rows(),
            rows(&[&["A", "B"], &["1", ""], &["x", "y"]]).as_slice()
        );
    }

    #[test]
    fn test_grid_reject_policy() {
        let result = Grid::from_rows(rows(&[&["A", "B"], &["1"]]), RaggedPolicy::Reject);
        match result {
            Err(EditorError::RaggedRow {
                row,
                expected,
                found,
            }) => {
                assert_eq!((row, expected, found), (1, 2, 1));
            }
            other => panic!("Expected RaggedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_grid_header_and_data_rows() {
        let grid = Grid::from_rows(rows(&[&["A", "B"], &["1", "2"]]), RaggedPolicy::Pad).unwrap();
        assert_eq!(grid.header().unwrap(), &["A".to_string(), "B".to_string()]);
        assert_eq!(grid.data_rows().len(), 1);
        assert_eq!(grid.width(), 2);

        let empty = Grid::new();
        assert!(empty.header().is_none());
        assert!(empty.data_rows().is_empty());
        assert_eq!(empty.width(), 0);
    }

    #[test]
    fn test_grid_set_returns_previous() {
        let mut grid =
            Grid::from_rows(rows(&[&["A", "B"], &["1", "2"]]), RaggedPolicy::Pad).unwrap();
        let previous = grid.set(CellRef::new(1, 0), "x").unwrap();
        assert_eq!(previous, "1");
        assert_eq!(grid.get(CellRef::new(1, 0)), Some("x"));
        assert!(matches!(
            grid.set(CellRef::new(5, 0), "y"),
            Err(EditorError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_grid_serializes_as_nested_arrays() {
        let grid = Grid::from_rows(rows(&[&["A"], &["1"]]), RaggedPolicy::Pad).unwrap();
        assert_eq!(serde_json::to_string(&grid).unwrap(), r#"[["A"],["1"]]"#);
    }
}
