// Report Rendering
// Plain-text tables for diff reports and checkpoint listings

use crossterm::style::Stylize;
use std::fmt::Write;

use crate::constants::{CHANGES_HEADER, COLUMN_CELL, COLUMN_CURRENT, COLUMN_PREVIOUS, NO_CHANGES};
use crate::operations::{Checkpoint, ChangeRecord, CellValue, DiffReport};

/// Display options for rendered output
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Text shown for empty cells
    pub empty_marker: String,
    /// Emit terminal colors
    pub styled: bool,
}

fn display_value(value: &CellValue, empty_marker: &str) -> String {
    value.normalized().unwrap_or_else(|| empty_marker.to_string())
}

/// Render the change table of one worksheet
pub fn render_sheet(name: &str, changes: &[ChangeRecord], options: &RenderOptions) -> String {
    let rows: Vec<(String, String, String)> = changes
        .iter()
        .map(|c| {
            (
                c.cell.clone(),
                display_value(&c.previous, &options.empty_marker),
                display_value(&c.current, &options.empty_marker),
            )
        })
        .collect();

    let cell_width = rows.iter().map(|r| r.0.chars().count()).chain([COLUMN_CELL.len()]).max().unwrap_or(0);
    let prev_width = rows.iter().map(|r| r.1.chars().count()).chain([COLUMN_PREVIOUS.len()]).max().unwrap_or(0);
    let cur_width = rows.iter().map(|r| r.2.chars().count()).chain([COLUMN_CURRENT.len()]).max().unwrap_or(0);

    let mut out = String::new();
    let heading = format!("{}{}", CHANGES_HEADER, name);
    if options.styled {
        let _ = writeln!(out, "{}", heading.bold().yellow());
    } else {
        let _ = writeln!(out, "{}", heading);
    }

    let _ = writeln!(
        out,
        "  {:<cell_width$}  {:<prev_width$}  {:<cur_width$}",
        COLUMN_CELL, COLUMN_PREVIOUS, COLUMN_CURRENT
    );
    for (cell, previous, current) in &rows {
        let _ = writeln!(
            out,
            "  {:<cell_width$}  {:<prev_width$}  {:<cur_width$}",
            cell, previous, current
        );
    }

    out
}

/// Render a whole report, one table per changed worksheet
pub fn render_report(report: &DiffReport, options: &RenderOptions) -> String {
    if report.is_empty() {
        return format!("{}\n", NO_CHANGES);
    }

    let mut out = String::new();
    for sheet in &report.sheets {
        out.push_str(&render_sheet(&sheet.name, &sheet.changes, options));
        out.push('\n');
    }

    let total = report.total_changes();
    let _ = writeln!(
        out,
        "{} changed cell{} across {} sheet{}",
        total,
        if total == 1 { "" } else { "s" },
        report.sheets.len(),
        if report.sheets.len() == 1 { "" } else { "s" }
    );
    out
}

/// Render the numbered checkpoint list offered for selection
pub fn render_checkpoints(checkpoints: &[Checkpoint]) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("Select from available checkpoints.\n");
    out.push_str("----------------------------------\n");
    for checkpoint in checkpoints {
        let _ = writeln!(out, "  [{}] Save point : {}", checkpoint.position, checkpoint);
    }
    out
}
