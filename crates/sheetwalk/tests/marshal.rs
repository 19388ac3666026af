//! Table import/export and the failure reporting around saves and bulk writes

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use sheetwalk::prelude::*;
use sheetwalk::{SAVE_FAILED_TEXT, SAVE_FAILED_TITLE};

type Seen = Rc<RefCell<Vec<Notice>>>;

fn recording(wb: MemoryWorkbook) -> (SheetAccessor<MemoryWorkbook>, Seen) {
    let seen: Seen = Rc::default();
    let sink = Rc::clone(&seen);
    let sheet = SheetAccessor::with_notifier(wb, move |n: &Notice| sink.borrow_mut().push(n.clone()))
        .unwrap();
    (sheet, seen)
}

fn people() -> TabularBlock {
    let mut table = TabularBlock::new(["Name", "Age"]);
    table.push_text_row(["Ann", "30"]).unwrap();
    table.push_text_row(["Bo", "25"]).unwrap();
    table
}

#[test]
fn test_import_export_round_trip() {
    let (mut sheet, seen) = recording(MemoryWorkbook::new());
    assert!(sheet.import_table(&people()).unwrap());

    let back = sheet.export_range(0, 0).unwrap();
    assert_eq!(back, people());
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_nulls_come_back_empty() {
    let mut table = TabularBlock::new(["Name", "Age"]);
    table.push_row([Some("Ann"), None]).unwrap();

    let (mut sheet, _) = recording(MemoryWorkbook::new());
    assert!(sheet.import_table(&table).unwrap());

    let back = sheet.export_range(2, 2).unwrap();
    assert_eq!(back.cell(0, 1), Some(""));
    assert_eq!(back.text(0, 0), "Ann");
}

#[test]
fn test_import_at_cursor() {
    let (mut sheet, _) = recording(MemoryWorkbook::new());
    sheet.get_cell(At::cell(4, 3)).unwrap();
    assert!(sheet.import_table(&people()).unwrap());

    assert_eq!(sheet.get_cell(At::cell(4, 3)).unwrap(), "Name");
    assert_eq!(sheet.get_cell(At::cell(6, 4)).unwrap(), "25");
    assert_eq!(sheet.get_cell(At::cell(7, 3)).unwrap(), "");
    assert_eq!(sheet.get_cell(At::cell(4, 5)).unwrap(), "");
}

#[test]
fn test_export_names_blank_headers() {
    let (mut sheet, _) = recording(MemoryWorkbook::new());
    sheet.set_cell("Id", At::cell(1, 1)).unwrap();
    sheet.set_cell(7, At::cell(2, 1)).unwrap();
    sheet.set_cell("x", At::cell(2, 3)).unwrap();

    let table = sheet.export_range(0, 0).unwrap();
    assert_eq!(table.columns(), ["Id", "COLUMN2", "COLUMN3"]);
    assert_eq!(
        table.row_text(0).collect::<Vec<_>>(),
        vec!["7", "", "x"]
    );
}

#[test]
fn test_export_explicit_counts() {
    let (mut sheet, _) = recording(MemoryWorkbook::new());
    sheet.import_table(&people()).unwrap();

    let table = sheet.export_range(2, 1).unwrap();
    assert_eq!(table.columns(), ["Name"]);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.text(0, 0), "Ann");
}

#[test]
fn test_hresult_noise_is_swallowed() {
    let mut wb = MemoryWorkbook::new();
    wb.fail_bulk_writes("Exception from HRESULT: 0x800A03EC");
    let (mut sheet, seen) = recording(wb);

    assert!(sheet.import_table(&people()).unwrap());
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_other_bulk_failure_notifies_once() {
    let mut wb = MemoryWorkbook::new();
    wb.fail_bulk_writes("sheet is protected");
    let (mut sheet, seen) = recording(wb);

    assert!(!sheet.import_table(&people()).unwrap());
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].text, "sheet is protected");
    assert_eq!(seen[0].severity, Severity::Error);
}

#[test]
fn test_save_failure_notifies() {
    let mut wb = MemoryWorkbook::new();
    wb.fail_saves("read-only");
    let (mut sheet, seen) = recording(wb);

    assert!(!sheet.save().unwrap());
    assert!(!sheet
        .save_as(Path::new("/tmp/out.xls"), SaveFormat::Excel97)
        .unwrap());

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].text, SAVE_FAILED_TEXT);
    assert_eq!(seen[0].title, SAVE_FAILED_TITLE);
}

#[test]
fn test_save_as_succeeds() {
    let (mut sheet, seen) = recording(MemoryWorkbook::new());
    assert!(sheet
        .save_as(Path::new("/tmp/report.xls"), SaveFormat::Excel97)
        .unwrap());
    assert!(sheet.save().unwrap());
    assert_eq!(sheet.file_name().unwrap(), "report.xls");
    assert_eq!(sheet.engine().unwrap().save_count(), 1);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_import_after_close_is_an_error() {
    let (mut sheet, seen) = recording(MemoryWorkbook::new());
    sheet.close().unwrap();
    assert!(matches!(sheet.import_table(&people()), Err(Error::Closed)));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_import_past_last_row_is_rejected() {
    let (mut sheet, seen) = recording(MemoryWorkbook::new());
    sheet.move_to(At::row(u32::MAX - 1));

    let err = sheet.import_table(&people()).unwrap_err();
    assert!(matches!(
        err,
        Error::TableTooLarge {
            rows: 2,
            columns: 2,
            ..
        }
    ));
    assert!(seen.borrow().is_empty());
    assert_eq!(sheet.engine().unwrap().sheet("Sheet1").unwrap().cell_count(), 0);
}
