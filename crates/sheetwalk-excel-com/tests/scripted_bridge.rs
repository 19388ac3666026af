//! ExcelDocument over a scripted line transport

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sheetwalk_core::{CellValue, GridValue, SaveFormat, SpreadsheetEngine};
use sheetwalk::{Notice, SheetAccessor};
use sheetwalk_excel_com::{BridgeError, ExcelBridge, ExcelDocument};

/// Captures everything the client writes
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn requests(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

/// Start a bridge whose replies are `responses`, in order, numbered from id 1.
/// The `Init` and `CreateWorkbook` replies are prepended.
fn document(responses: &[Value]) -> (ExcelDocument, SharedBuf) {
    let mut script = vec![
        json!({"status": "ok"}),
        json!({"status": "ok", "data": {"workbook": 1}}),
    ];
    script.extend_from_slice(responses);

    let mut text = String::new();
    for (i, mut response) in script.into_iter().enumerate() {
        response["id"] = json!(i + 1);
        text.push_str(&response.to_string());
        text.push('\n');
    }

    let out = SharedBuf::default();
    let bridge = ExcelBridge::with_transport(Cursor::new(text.into_bytes()), out.clone()).unwrap();
    (ExcelDocument::create(bridge).unwrap(), out)
}

#[test]
fn test_worksheet_names_and_cell_text() {
    let (mut doc, out) = document(&[
        json!({"status": "ok", "data": {"names": ["Sheet1", "Data"]}}),
        json!({"status": "ok", "data": {"text": "42"}}),
        json!({"status": "ok"}),
    ]);

    assert_eq!(doc.worksheet_names().unwrap(), vec!["Sheet1", "Data"]);
    assert_eq!(doc.cell_text("Data", 3, 2).unwrap().as_deref(), Some("42"));
    assert_eq!(doc.cell_text("Data", 9, 9).unwrap(), None);

    let requests = out.requests();
    assert_eq!(requests[0]["cmd"], "Init");
    assert_eq!(requests[1]["cmd"], "CreateWorkbook");
    assert_eq!(
        requests[3],
        json!({
            "id": 4,
            "cmd": "GetCellText",
            "params": {"workbook": 1, "sheet": "Data", "cell": "B3"}
        })
    );
}

#[test]
fn test_range_values_round_trip_through_wire_values() {
    let (mut doc, out) = document(&[
        json!({"status": "ok", "data": {"values": [["Name", 1.5], [null, true]]}}),
        json!({"status": "ok"}),
    ]);

    let grid = doc.range_values("Sheet1", "A1:B2").unwrap();
    assert_eq!(
        grid,
        vec![
            vec![GridValue::from("Name"), GridValue::Number(1.5)],
            vec![GridValue::Empty, GridValue::Bool(true)],
        ]
    );

    doc.set_cell("Sheet1", 1, 1, &CellValue::Empty).unwrap();
    assert_eq!(out.requests()[3]["params"]["value"], Value::Null);
}

#[test]
fn test_bridge_error_keeps_excel_message() {
    let (mut doc, _out) = document(&[json!({
        "status": "error",
        "message": "Exception from HRESULT: 0x800A03EC"
    })]);

    let err = doc
        .set_range_values("Sheet1", "A1", &vec![vec![GridValue::from("x")]])
        .unwrap_err();
    assert!(matches!(err, BridgeError::Bridge(_)));
    assert!(err.to_string().contains("HRESULT"));
}

#[test]
fn test_save_as_translates_path() {
    let (mut doc, out) = document(&[json!({"status": "ok"})]);
    doc.save_as(Path::new("/data/out.xls"), SaveFormat::Excel97)
        .unwrap();
    let params = &out.requests()[2]["params"];
    assert_eq!(params["path"], r"Z:\data\out.xls");
    assert_eq!(params["format"], "excel97");
}

#[test]
fn test_close_is_idempotent() {
    let (mut doc, out) = document(&[json!({"status": "ok"}), json!({"status": "ok"})]);
    doc.close().unwrap();
    doc.close().unwrap();

    assert_eq!(
        commands(&out),
        vec!["Init", "CreateWorkbook", "CloseWorkbook", "Shutdown"]
    );
    assert!(matches!(doc.worksheet_names(), Err(BridgeError::Closed)));
}

fn commands(out: &SharedBuf) -> Vec<Value> {
    out.requests().iter().map(|r| r["cmd"].clone()).collect()
}

/// An accessor bound to "Sheet1"; `responses` follow the bind replies
fn accessor(responses: &[Value]) -> (SheetAccessor<ExcelDocument>, SharedBuf) {
    let mut script = vec![
        json!({"status": "ok", "data": {"names": ["Sheet1"]}}),
        json!({"status": "ok"}),
    ];
    script.extend_from_slice(responses);
    let (doc, out) = document(&script);
    let sheet = SheetAccessor::with_notifier(doc, |_: &Notice| {}).unwrap();
    (sheet, out)
}

#[test]
fn test_dropping_open_accessor_closes_workbook() {
    let (sheet, out) = accessor(&[json!({"status": "ok"}), json!({"status": "ok"})]);
    drop(sheet);

    assert_eq!(
        commands(&out),
        vec![
            "Init",
            "CreateWorkbook",
            "ListSheets",
            "ActivateSheet",
            "CloseWorkbook",
            "Shutdown"
        ]
    );
    assert_eq!(out.requests()[4]["params"]["save"], false);
}

#[test]
fn test_drop_after_close_sends_nothing() {
    let (mut sheet, out) = accessor(&[json!({"status": "ok"}), json!({"status": "ok"})]);
    sheet.close().unwrap();
    let sent = out.requests().len();
    drop(sheet);

    assert_eq!(out.requests().len(), sent);
    let closes = commands(&out)
        .iter()
        .filter(|cmd| *cmd == "CloseWorkbook" || *cmd == "Shutdown")
        .count();
    assert_eq!(closes, 2);
}

#[test]
fn test_mismatched_response_id() {
    let script = format!(
        "{}\n{}\n",
        json!({"id": 1, "status": "ok"}),
        json!({"id": 7, "status": "ok", "data": {"workbook": 1}})
    );
    let bridge =
        ExcelBridge::with_transport(Cursor::new(script.into_bytes()), SharedBuf::default())
            .unwrap();
    assert!(matches!(
        ExcelDocument::create(bridge),
        Err(BridgeError::IdMismatch {
            expected: 2,
            actual: 7
        })
    ));
}
