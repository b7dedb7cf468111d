// Render module
// Terminal output for reports and checkpoint listings

pub mod report;

pub use report::{render_checkpoints, render_report, render_sheet, RenderOptions};
