mod common;

use common::{block, write_book, Val};
use sheet_diff::operations::{CellValue, CompareMode, DiffEngine, Workbook};
use sheet_diff::SheetDiffError;
use std::fs;

#[test]
fn single_changed_cell_is_reported_at_its_address() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.xlsx");
    let new = dir.path().join("new.xlsx");
    write_book(&old, &[("Sheet1", vec![(0, 0, Val::S("total")), (1, 1, Val::N(10.0))])]);
    write_book(&new, &[("Sheet1", vec![(0, 0, Val::S("total")), (1, 1, Val::N(12.0))])]);

    let report = DiffEngine::default().diff_files(&old, &new).unwrap();

    assert_eq!(report.sheets.len(), 1);
    let changes = report.get("Sheet1").unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].cell, "B2");
    assert_eq!(changes[0].previous.to_string(), "10");
    assert_eq!(changes[0].current.to_string(), "12");
}

#[test]
fn identical_copy_has_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("book.xlsx");
    let copy = dir.path().join("copy.xlsx");
    write_book(&original, &[("Data", block(4)), ("Notes", vec![(2, 3, Val::S("memo"))])]);
    fs::copy(&original, &copy).unwrap();

    let report = DiffEngine::default().diff_files(&original, &copy).unwrap();

    assert!(report.is_empty());
}

#[test]
fn sheet_added_in_newer_snapshot_lists_every_populated_cell() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.xlsx");
    let new = dir.path().join("new.xlsx");
    write_book(&old, &[("Sheet1", block(2))]);
    write_book(
        &new,
        &[
            ("Sheet1", block(2)),
            ("Extra", vec![(0, 0, Val::S("a")), (3, 2, Val::N(1.5)), (5, 0, Val::S("b"))]),
        ],
    );

    let report = DiffEngine::default().diff_files(&old, &new).unwrap();

    assert!(report.get("Sheet1").is_none());
    let extra = report.get("Extra").unwrap();
    assert_eq!(extra.len(), 3);
    assert!(extra.iter().all(|c| c.previous == CellValue::Empty));
    let cells: Vec<&str> = extra.iter().map(|c| c.cell.as_str()).collect();
    assert_eq!(cells, vec!["A1", "C4", "A6"]);
}

#[test]
fn grown_sheet_reports_only_the_expanded_region() {
    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small.xlsx");
    let large = dir.path().join("large.xlsx");
    write_book(&small, &[("Sheet1", block(3))]);
    write_book(&large, &[("Sheet1", block(5))]);

    let report = DiffEngine::default().diff_files(&small, &large).unwrap();

    let changes = report.get("Sheet1").unwrap();
    assert_eq!(changes.len(), 16);
    assert!(changes.iter().all(|c| c.row >= 3 || c.col >= 3));
}

#[test]
fn cells_keep_their_absolute_position() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.xlsx");
    let new = dir.path().join("new.xlsx");
    write_book(&old, &[("Sheet1", vec![(4, 3, Val::N(1.0))])]);
    write_book(&new, &[("Sheet1", vec![(4, 3, Val::N(2.0))])]);

    let report = DiffEngine::default().diff_files(&old, &new).unwrap();

    assert_eq!(report.get("Sheet1").unwrap()[0].cell, "D5");
}

#[test]
fn number_and_matching_text_differ_only_in_typed_mode() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.xlsx");
    let new = dir.path().join("new.xlsx");
    write_book(&old, &[("Sheet1", vec![(0, 0, Val::N(10.0))])]);
    write_book(&new, &[("Sheet1", vec![(0, 0, Val::S("10"))])]);

    let stringified = DiffEngine::new(CompareMode::Stringified).diff_files(&old, &new).unwrap();
    let typed = DiffEngine::new(CompareMode::Typed).diff_files(&old, &new).unwrap();

    assert!(stringified.is_empty());
    assert_eq!(typed.total_changes(), 1);
}

#[test]
fn loaded_workbook_keeps_sheet_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    write_book(&path, &[("Zeta", block(1)), ("Alpha", block(1))]);

    let workbook = Workbook::open(&path).unwrap();

    assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha"]);
}

#[test]
fn unreadable_snapshot_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.xlsx");
    let bad = dir.path().join("bad.xlsx");
    write_book(&good, &[("Sheet1", block(1))]);
    fs::write(&bad, b"not a spreadsheet").unwrap();

    let err = DiffEngine::default().diff_files(&good, &bad).unwrap_err();

    assert!(matches!(err, SheetDiffError::Parse { .. }));
}
