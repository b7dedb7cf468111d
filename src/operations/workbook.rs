// Workbook Snapshots
// Loads spreadsheet files into positional cell grids for comparison

use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{Result, SheetDiffError};

/// A scalar cell value read from a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent, blank or NaN-like
    Empty,
    /// Integer value
    Int(i64),
    /// Floating point value (dates are stored as their serial number)
    Float(f64),
    /// Text value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Spreadsheet error code such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Whether the value counts as empty for comparison purposes
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Float(f) => f.is_nan(),
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String form used for comparison. Empty values have none.
    pub fn normalized(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        Some(match self {
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format_number(*f),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => return None,
        })
    }

    /// Coarse type used by typed comparison
    pub fn kind(&self) -> CellKind {
        if self.is_empty() {
            return CellKind::Empty;
        }

        match self {
            CellValue::Int(_) | CellValue::Float(_) => CellKind::Number,
            CellValue::Text(_) => CellKind::Text,
            CellValue::Bool(_) => CellKind::Bool,
            CellValue::Error(_) => CellKind::Error,
            CellValue::Empty => CellKind::Empty,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.normalized() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

/// Type classes distinguished by typed comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Number,
    Text,
    Bool,
    Error,
}

/// Render a float the way a spreadsheet shows it: integral values drop the fraction
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A named grid of cells anchored at A1
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    /// Sheet name
    pub name: String,
    rows: usize,
    cols: usize,
    cells: HashMap<(usize, usize), CellValue>,
}

impl Worksheet {
    /// Create an empty worksheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set a cell, growing the extent to include it
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        self.rows = self.rows.max(row + 1);
        self.cols = self.cols.max(col + 1);
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// Builder form of [`Worksheet::set`]
    pub fn with_cell(mut self, row: usize, col: usize, value: CellValue) -> Self {
        self.set(row, col, value);
        self
    }

    /// (rows, cols) covered by the sheet, counted from A1
    pub fn extent(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Look up a cell. Coordinates outside the extent, and blank cells, are `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(&(row, col))
    }

    /// Number of non-empty cells
    pub fn populated(&self) -> usize {
        self.cells.len()
    }
}

/// All worksheets of one spreadsheet file, in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Build a workbook from already-loaded sheets
    pub fn from_sheets(sheets: Vec<Worksheet>) -> Self {
        Self { sheets }
    }

    /// Read every worksheet of a spreadsheet file (xlsx, xlsm, xlsb, xls, ods)
    pub fn open(path: &Path) -> Result<Self> {
        let parse_error = |reason: String| SheetDiffError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(e.to_string()))?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| parse_error(format!("worksheet '{}': {}", sheet_name, e)))?;

            let mut sheet = Worksheet::new(sheet_name);

            let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
            for (row, col, data) in range.used_cells() {
                sheet.set(
                    row_offset as usize + row,
                    col_offset as usize + col,
                    CellValue::from(data),
                );
            }

            tracing::debug!(
                sheet = %sheet.name,
                rows = sheet.rows,
                cols = sheet.cols,
                populated = sheet.populated(),
                "loaded worksheet"
            );
            sheets.push(sheet);
        }

        Ok(Self { sheets })
    }

    /// Worksheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Find a worksheet by name
    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
