//! Cursor resolution, navigation and range operations over the in-memory engine

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheetwalk::prelude::*;
use sheetwalk_core::MemorySheet;

fn accessor() -> SheetAccessor<MemoryWorkbook> {
    SheetAccessor::with_notifier(MemoryWorkbook::new(), |_: &Notice| {}).unwrap()
}

fn active(sheet: &SheetAccessor<MemoryWorkbook>) -> &MemorySheet {
    let wb = sheet.engine().unwrap();
    wb.sheet(sheet.sheet_name()).unwrap()
}

#[test]
fn test_row_only_write_keeps_cursor_column() {
    let mut sheet = accessor();
    sheet.set_cell("x", At::row(5)).unwrap();
    assert_eq!(sheet.cursor(), Coordinate::new(5, 1));
    assert_eq!(sheet.get_cell(At::CURSOR).unwrap(), "x");
}

#[test]
fn test_navigation() {
    let mut sheet = accessor();
    sheet.get_cell(At::cell(3, 7)).unwrap();

    sheet.to_new_line(2);
    assert_eq!(sheet.cursor(), Coordinate::new(5, 1));

    sheet.to_next_cell(3);
    assert_eq!(sheet.cursor(), Coordinate::new(5, 4));
    assert_eq!(sheet.active_row(), 5);
    assert_eq!(sheet.active_column(), 4);
}

#[test]
fn test_next_cell_walks_right() {
    let mut sheet = accessor();
    sheet.set_cell("a", At::cell(2, 1)).unwrap();
    sheet.set_next_cell("b").unwrap();
    sheet.set_next_cell(7).unwrap();

    sheet.get_cell(At::col(1)).unwrap();
    assert_eq!(sheet.get_next_cell().unwrap(), "b");
    assert_eq!(sheet.get_next_cell().unwrap(), "7");
    assert_eq!(sheet.get_next_cell().unwrap(), "");
    assert_eq!(sheet.cursor(), Coordinate::new(2, 4));
}

#[test]
fn test_empty_values_clear_the_cell() {
    let mut sheet = accessor();
    sheet.set_cell("keep", At::cell(1, 1)).unwrap();
    sheet.set_cell("", At::CURSOR).unwrap();
    assert_eq!(active(&sheet).cell(1, 1), None);

    sheet.set_cell(10, At::CURSOR).unwrap();
    sheet.set_cell(None::<i64>, At::CURSOR).unwrap();
    assert_eq!(sheet.get_cell(At::CURSOR).unwrap(), "");
    assert_eq!(active(&sheet).cell(1, 1), None);

    sheet.set_cell(Some(12_i64), At::CURSOR).unwrap();
    assert_eq!(sheet.get_cell(At::CURSOR).unwrap(), "12");
}

#[test]
fn test_format_targets_span() {
    let mut sheet = accessor();
    sheet.get_cell(At::cell(3, 2)).unwrap();
    sheet
        .set_format(&FormatSpec::new().bold(true), Span::CURSOR.to(5, 4))
        .unwrap();

    let ws = active(&sheet);
    assert_eq!(ws.format_at(3, 2).and_then(|f| f.bold), Some(true));
    assert_eq!(ws.format_at(5, 4).and_then(|f| f.bold), Some(true));
    assert_eq!(ws.format_at(6, 4), None);
}

#[test]
fn test_format_sets_every_attribute_and_autofits_columns() {
    let mut sheet = accessor();
    let format = FormatSpec::new()
        .autofit_columns()
        .wrap_text(false)
        .background_color_index(6)
        .font_size(14.0)
        .font_name("Arial")
        .horizontal_alignment(HorizontalAlignment::Right);
    sheet.set_format(&format, Span::range(2, 2, 3, 4)).unwrap();

    let ws = active(&sheet);
    assert!(!ws.is_autofit(1));
    assert!((2..=4).all(|col| ws.is_autofit(col)));
    assert!(!ws.is_autofit(5));

    let stored = ws.format_at(3, 4).unwrap();
    assert_eq!(stored.wrap_text, Some(false));
    assert_eq!(stored.background_color_index, Some(6));
    assert_eq!(stored.font_size, Some(14.0));
    assert_eq!(stored.font_name.as_deref(), Some("Arial"));
    assert_eq!(stored.horizontal, Some(HorizontalAlignment::Right));
    assert_eq!(stored.bold, None);
    assert_eq!(ws.format_at(4, 4), None);

    // Unset wrap-text keeps the stored value
    sheet
        .set_format(&FormatSpec::new().bold(true), Span::range(2, 2, 3, 4))
        .unwrap();
    let stored = active(&sheet).format_at(2, 2).unwrap();
    assert_eq!(stored.wrap_text, Some(false));
    assert_eq!(stored.bold, Some(true));
}

#[test]
fn test_format_with_half_end_is_single_cell() {
    let mut sheet = accessor();
    sheet
        .set_format(&FormatSpec::new().italic(true), Span::range(2, 2, 9, 0))
        .unwrap();
    let ws = active(&sheet);
    assert_eq!(ws.format_at(2, 2).and_then(|f| f.italic), Some(true));
    assert_eq!(ws.format_at(3, 2), None);
}

#[test]
fn test_border_and_number_format() {
    let mut sheet = accessor();
    let border = BorderSpec::new(BorderEdge::Bottom, BorderWeight::THICK);
    sheet.set_border(border, Span::range(1, 1, 1, 3)).unwrap();
    sheet.set_number_format("0.00", At::cell(2, 2)).unwrap();

    let ws = active(&sheet);
    assert_eq!(ws.borders_at(1, 3), &[border]);
    assert_eq!(ws.number_format_at(2, 2), Some("0.00"));
}

#[test]
fn test_merge_and_unmerge() {
    let mut sheet = accessor();
    sheet.merge_cells(true, Span::range(1, 1, 2, 3)).unwrap();
    assert_eq!(active(&sheet).merged_regions().len(), 1);

    sheet.merge_cells(false, Span::range(1, 1, 2, 3)).unwrap();
    assert!(active(&sheet).merged_regions().is_empty());
}

#[test]
fn test_delete_range_shifts_up() {
    let mut sheet = accessor();
    for row in 1..=3 {
        sheet.set_cell(format!("r{row}"), At::cell(row, 1)).unwrap();
    }
    sheet.delete_range(At::cell(1, 1)).unwrap();
    assert_eq!(sheet.get_cell(At::cell(1, 1)).unwrap(), "r2");
    assert_eq!(sheet.get_cell(At::cell(2, 1)).unwrap(), "r3");
    assert_eq!(sheet.get_cell(At::cell(3, 1)).unwrap(), "");
}

#[test]
fn test_column_width_moves_cursor_column() {
    let mut sheet = accessor();
    sheet.get_cell(At::cell(4, 1)).unwrap();
    sheet.set_column_width(3, 18.0, 5).unwrap();
    assert_eq!(sheet.cursor(), Coordinate::new(4, 3));

    let ws = active(&sheet);
    assert_eq!(ws.column_width(2), None);
    assert_eq!(ws.column_width(3), Some(18.0));
    assert_eq!(ws.column_width(5), Some(18.0));

    sheet.set_column_width(0, 9.5, 0).unwrap();
    assert_eq!(active(&sheet).column_width(3), Some(9.5));
}

#[test]
fn test_formula_and_insert_row() {
    let mut sheet = accessor();
    sheet.set_cell("top", At::cell(1, 1)).unwrap();
    sheet.set_formula("=SUM(A1:A3)", At::cell(4, 1)).unwrap();
    sheet.insert_row(1).unwrap();

    let ws = active(&sheet);
    assert_eq!(ws.text_at(2, 1).as_deref(), Some("top"));
    assert_eq!(ws.formula_at(5, 1), Some("=SUM(A1:A3)"));
    assert_eq!(sheet.row_count().unwrap(), 5);
    assert_eq!(sheet.column_count().unwrap(), 1);
}

#[test]
fn test_worksheet_management() {
    let wb = MemoryWorkbook::with_sheets("Book1", ["Main", "Data"]);
    let mut sheet = SheetAccessor::with_notifier(wb, |_: &Notice| {}).unwrap();

    sheet.add_worksheet(Some("Extra")).unwrap();
    assert_eq!(sheet.sheet_name(), "Main");
    assert_eq!(sheet.engine().unwrap().active_sheet_name(), "Main");

    sheet.get_cell(At::cell(4, 4)).unwrap();
    sheet.select_worksheet("data").unwrap();
    assert_eq!(sheet.sheet_name(), "Data");
    assert_eq!(sheet.cursor(), Coordinate::ORIGIN);

    sheet.rename_worksheet("Numbers").unwrap();
    assert!(sheet
        .worksheet_names()
        .unwrap()
        .contains(&"Numbers".to_string()));

    sheet.delete_worksheet(None).unwrap();
    assert_eq!(sheet.sheet_name(), "Extra");
    assert_eq!(sheet.worksheet_names().unwrap(), vec!["Extra", "Main"]);

    assert!(matches!(
        sheet.select_worksheet("Missing"),
        Err(Error::Core(sheetwalk_core::Error::SheetNotFound(_)))
    ));
}

#[test]
fn test_page_setup_print_and_macro() {
    let mut sheet = accessor();
    let setup = PageSetup::new()
        .orientation(Orientation::Landscape)
        .footer(HeaderFooterPosition::Center, "Page &P");
    sheet.page_setup(&setup).unwrap();
    sheet.print(2, false).unwrap();
    sheet.run_macro("Refresh").unwrap();

    let wb = sheet.engine().unwrap();
    assert_eq!(wb.sheet("Sheet1").unwrap().page_setup(), &setup);
    assert_eq!(wb.print_jobs().len(), 1);
    assert!(!wb.print_jobs()[0].fallback);
    assert_eq!(wb.macros_run(), ["Refresh".to_string()]);
}

#[test]
fn test_print_falls_back() {
    let mut wb = MemoryWorkbook::new();
    wb.fail_print_out("printer offline");
    let mut sheet = SheetAccessor::with_notifier(wb, |_: &Notice| {}).unwrap();
    sheet.print(1, true).unwrap();

    let jobs = sheet.engine().unwrap().print_jobs();
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].fallback);
    assert!(jobs[0].preview);
}

#[test]
fn test_close_is_idempotent() {
    let mut sheet = accessor();
    sheet.close().unwrap();
    sheet.close().unwrap();
    assert!(sheet.is_closed());
    assert!(sheet.engine().is_none());
    assert!(matches!(sheet.get_cell(At::CURSOR), Err(Error::Closed)));
    assert!(matches!(sheet.save(), Err(Error::Closed)));
}

#[test]
fn test_file_name() {
    let mut sheet = accessor();
    assert_eq!(sheet.file_name().unwrap(), "Book1");
}

#[test]
fn test_no_notice_on_plain_operations() {
    let seen = Rc::new(RefCell::new(Vec::<Notice>::new()));
    let sink = Rc::clone(&seen);
    let mut sheet =
        SheetAccessor::with_notifier(MemoryWorkbook::new(), move |n: &Notice| {
            sink.borrow_mut().push(n.clone())
        })
        .unwrap();
    sheet.set_cell("x", At::CURSOR).unwrap();
    sheet.get_next_cell().unwrap();
    assert!(seen.borrow().is_empty());
}

proptest! {
    #[test]
    fn prop_resolve_per_axis(r0 in 1u32..500, c0 in 1u32..500, r in 0u32..500, c in 0u32..500) {
        let mut sheet = accessor();
        sheet.get_cell(At::cell(r0, c0)).unwrap();
        sheet.get_cell(At::cell(r, c)).unwrap();
        let expected = Coordinate::new(
            if r > 0 { r } else { r0 },
            if c > 0 { c } else { c0 },
        );
        prop_assert_eq!(sheet.cursor(), expected);
    }
}
