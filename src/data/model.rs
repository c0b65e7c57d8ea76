use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what spreadsheet readers hand out.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Dates and durations kept as their display text.
    Date(String),
    Null,
}

impl CellValue {
    /// Whether the cell holds no value at all.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Guess a typed value from raw text (CSV cells).
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

/// Text form used for matching, header names and CSV export.
/// `Null` renders as the empty string.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawSheet / Workbook – header-less grids as read from disk
// ---------------------------------------------------------------------------

/// One sheet read without any header interpretation.
/// Every row is padded to the same width.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Build a sheet, padding ragged rows with `Null` up to the widest row.
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// All sheets of a loaded file. CSV and Parquet files yield a single sheet.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<RawSheet>,
}

// ---------------------------------------------------------------------------
// Table – named columns after header resolution
// ---------------------------------------------------------------------------

/// A table with unique column names. Every row has exactly
/// `columns.len()` cells, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the column count.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell text, missing cells read as the empty string.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Keep only the rows whose mask entry is `true`, in their source order.
    pub fn select(&self, mask: &[bool]) -> Table {
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_display_drops_integral_fraction() {
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_from_text_guesses_types() {
        assert_eq!(CellValue::from_text(""), CellValue::Null);
        assert_eq!(CellValue::from_text("42"), CellValue::Integer(42));
        assert_eq!(CellValue::from_text("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::from_text("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_text("abc"),
            CellValue::String("abc".to_string())
        );
    }

    #[test]
    fn test_raw_sheet_pads_ragged_rows() {
        let sheet = RawSheet::new(
            "s",
            vec![vec![CellValue::Integer(1)], vec![CellValue::Null, CellValue::Null]],
        );
        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.rows[0].len(), 2);
    }

    #[test]
    fn test_select_preserves_order() {
        let table = Table::new(
            vec!["A".to_string()],
            vec![
                vec![CellValue::Integer(1)],
                vec![CellValue::Integer(2)],
                vec![CellValue::Integer(3)],
            ],
        );
        let selected = table.select(&[true, false, true]);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.cell_text(0, 0), "1");
        assert_eq!(selected.cell_text(1, 0), "3");
    }
}
