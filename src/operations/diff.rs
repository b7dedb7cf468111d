// Diff Engine
// Computes cell-level differences between two workbook snapshots

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use super::workbook::{CellValue, Workbook, Worksheet};
use crate::error::Result;

/// How two cell values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Compare string renderings: numeric 10 and text "10" are equal
    #[default]
    Stringified,
    /// Values must also agree in type
    Typed,
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stringified" | "string" => Ok(CompareMode::Stringified),
            "typed" => Ok(CompareMode::Typed),
            other => Err(format!("unknown compare mode '{}'", other)),
        }
    }
}

/// A single changed cell
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// Worksheet the cell belongs to
    pub worksheet: String,
    /// Spreadsheet-style address such as `B2`
    pub cell: String,
    /// Zero-based row
    pub row: usize,
    /// Zero-based column
    pub col: usize,
    /// Value in the older snapshot
    pub previous: CellValue,
    /// Value in the newer snapshot
    pub current: CellValue,
}

/// Changes found in one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetChanges {
    pub name: String,
    pub changes: Vec<ChangeRecord>,
}

/// Changed cells grouped by worksheet. Only sheets with changes are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    pub sheets: Vec<SheetChanges>,
}

impl DiffReport {
    /// Whether no cell changed
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Changes for one worksheet
    pub fn get(&self, name: &str) -> Option<&[ChangeRecord]> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.changes.as_slice())
    }

    /// Total changed cells across all worksheets
    pub fn total_changes(&self) -> usize {
        self.sheets.iter().map(|s| s.changes.len()).sum()
    }
}

/// Engine for comparing workbook snapshots cell by cell
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    mode: CompareMode,
}

impl DiffEngine {
    /// Create a diff engine with the given comparison mode
    pub fn new(mode: CompareMode) -> Self {
        Self { mode }
    }

    /// Load two spreadsheet files and compare them. `previous` is the older snapshot.
    pub fn diff_files(&self, previous: &Path, current: &Path) -> Result<DiffReport> {
        let previous_wb = Workbook::open(previous)?;
        let current_wb = Workbook::open(current)?;
        Ok(self.diff(&previous_wb, &current_wb))
    }

    /// Compare every worksheet of two workbooks
    ///
    /// Sheets are visited in `previous` order followed by sheets that only exist in
    /// `current`. A sheet missing from one side is treated as entirely empty there.
    pub fn diff(&self, previous: &Workbook, current: &Workbook) -> DiffReport {
        let mut names: Vec<&str> = previous.sheet_names().collect();
        for name in current.sheet_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let sheets = names
            .into_iter()
            .filter_map(|name| {
                let changes = self.diff_sheet(name, previous.sheet(name), current.sheet(name));
                if changes.is_empty() {
                    None
                } else {
                    tracing::debug!(sheet = name, changes = changes.len(), "sheet changed");
                    Some(SheetChanges {
                        name: name.to_string(),
                        changes,
                    })
                }
            })
            .collect();

        DiffReport { sheets }
    }

    /// Scan the union rectangle of one worksheet
    fn diff_sheet(
        &self,
        name: &str,
        previous: Option<&Worksheet>,
        current: Option<&Worksheet>,
    ) -> Vec<ChangeRecord> {
        let (prev_rows, prev_cols) = previous.map(Worksheet::extent).unwrap_or((0, 0));
        let (cur_rows, cur_cols) = current.map(Worksheet::extent).unwrap_or((0, 0));

        let mut changes = Vec::new();
        for row in 0..prev_rows.max(cur_rows) {
            for col in 0..prev_cols.max(cur_cols) {
                let before = lookup(previous, row, col);
                let after = lookup(current, row, col);

                if !self.values_equal(&before, &after) {
                    changes.push(ChangeRecord {
                        worksheet: name.to_string(),
                        cell: cell_address(row, col),
                        row,
                        col,
                        previous: before,
                        current: after,
                    });
                }
            }
        }

        changes
    }

    /// Compare two cells under the engine's mode
    pub fn values_equal(&self, a: &CellValue, b: &CellValue) -> bool {
        match self.mode {
            CompareMode::Stringified => a.normalized() == b.normalized(),
            CompareMode::Typed => a.kind() == b.kind() && a.normalized() == b.normalized(),
        }
    }
}

/// Read a cell, treating a missing sheet or an out-of-extent coordinate as empty
fn lookup(sheet: Option<&Worksheet>, row: usize, col: usize) -> CellValue {
    sheet
        .and_then(|s| s.cell(row, col))
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or(CellValue::Empty)
}

/// Convert a zero-based column index to spreadsheet letters (0 -> A, 26 -> AA)
pub fn column_letters(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Convert zero-based coordinates to a spreadsheet address (row 1, col 1 -> B2)
pub fn cell_address(row: usize, col: usize) -> String {
    format!("{}{}", column_letters(col), row + 1)
}
