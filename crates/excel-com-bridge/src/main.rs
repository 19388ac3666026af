//! Excel COM bridge: a Windows process that drives Excel over COM for
//! `sheetwalk-excel-com`, controlled by JSON lines on stdin/stdout.
//!
//! Cross-compile with `--target x86_64-pc-windows-gnu` and run under WINE.
//!
//! - One `Request` per stdin line, one `Response` per stdout line
//! - Diagnostics go to stderr; stdout carries the protocol only

#[cfg(windows)]
mod dispatch;
#[cfg(windows)]
mod excel;
#[cfg_attr(not(windows), allow(dead_code))]
mod xl;

#[cfg(not(windows))]
fn main() {
    eprintln!("excel-com-bridge must be compiled for Windows (--target x86_64-pc-windows-gnu)");
    eprintln!("and run under WINE on Linux.");
    std::process::exit(1);
}

#[cfg(windows)]
fn main() {
    use std::io::{self, BufRead, Write};

    use excel_com_protocol::{Command, Request, Response, ResponseResult};

    eprintln!("[excel-com-bridge] starting");

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    let mut excel: Option<excel::ExcelApp> = None;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("[excel-com-bridge] stdin read error: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (response, shutdown) = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let response = handle_command(&mut excel, &request);
                let shutdown = matches!(request.command, Command::Shutdown)
                    && matches!(response.result, ResponseResult::Ok { .. });
                (response, shutdown)
            }
            // The id is unknown, so the client sees a mismatch and stops
            Err(e) => {
                eprintln!("[excel-com-bridge] bad request line: {line}");
                (Response::error(0, format!("JSON parse error: {e}")), false)
            }
        };

        match serde_json::to_string(&response) {
            Ok(json) => {
                let _ = writeln!(out, "{json}");
                let _ = out.flush();
            }
            Err(e) => eprintln!("[excel-com-bridge] cannot encode response: {e}"),
        }

        if shutdown {
            eprintln!("[excel-com-bridge] shut down");
            break;
        }
    }

    if let Some(app) = excel {
        eprintln!("[excel-com-bridge] stdin closed, quitting Excel");
        if let Err(e) = app.shutdown() {
            eprintln!("[excel-com-bridge] {e}");
        }
    }
}

#[cfg(windows)]
fn handle_command(
    excel: &mut Option<excel::ExcelApp>,
    request: &excel_com_protocol::Request,
) -> excel_com_protocol::Response {
    use excel_com_protocol::{Command, Response};

    let id = request.id;

    let result = match &request.command {
        Command::Init => init_com_and_excel(excel).map(|()| None),
        Command::Shutdown => match excel.take() {
            Some(app) => app
                .shutdown()
                .map(|()| {
                    uninit_com();
                    None
                })
                .map_err(|e| format!("Shutdown failed: {e}")),
            None => Ok(None),
        },
        command => match excel.as_mut() {
            Some(app) => run(app, command),
            None => Err("Excel not initialized. Send 'Init' command first.".to_string()),
        },
    };

    match result {
        Ok(data) => Response::ok(id, data),
        Err(message) => Response::error(id, message),
    }
}

#[cfg(windows)]
type Reply = dispatch::ComResult<Option<excel_com_protocol::ResponseData>>;

#[cfg(windows)]
fn done(result: dispatch::ComResult<()>) -> Reply {
    result.map(|()| None)
}

/// Every command that needs a running Excel
#[cfg(windows)]
fn run(app: &mut excel::ExcelApp, command: &excel_com_protocol::Command) -> Reply {
    use excel_com_protocol::{CellValue, Command, ResponseData};

    match command {
        Command::Init | Command::Shutdown => Ok(None),

        Command::CreateWorkbook => {
            let workbook = app.create_workbook()?;
            Ok(Some(ResponseData::WorkbookHandle { workbook }))
        }
        Command::OpenWorkbook { path, password } => {
            let workbook = app.open_workbook(path, password.as_deref())?;
            Ok(Some(ResponseData::WorkbookHandle { workbook }))
        }
        Command::WorkbookName { workbook } => {
            let name = app.workbook_name(*workbook)?;
            Ok(Some(ResponseData::Name { name }))
        }
        Command::SaveWorkbook { workbook } => done(app.save(*workbook)),
        Command::SaveWorkbookAs {
            workbook,
            path,
            format,
        } => done(app.save_as(*workbook, path, *format)),
        Command::CloseWorkbook { workbook, save } => done(app.close_workbook(*workbook, *save)),
        Command::RunMacro { workbook, name } => done(app.run_macro(*workbook, name)),

        Command::ListSheets { workbook } => {
            let names = app.sheet_names(*workbook)?;
            Ok(Some(ResponseData::Names { names }))
        }
        Command::AddSheet { workbook, name } => done(app.add_sheet(*workbook, name.as_deref())),
        Command::DeleteSheet { workbook, sheet } => done(app.delete_sheet(*workbook, sheet)),
        Command::ActivateSheet { workbook, sheet } => done(app.activate_sheet(*workbook, sheet)),
        Command::RenameSheet {
            workbook,
            sheet,
            name,
        } => done(app.rename_sheet(*workbook, sheet, name)),
        Command::UsedExtent { workbook, sheet } => {
            let (rows, columns) = app.used_extent(*workbook, sheet)?;
            Ok(Some(ResponseData::Extent { rows, columns }))
        }

        Command::GetCellText {
            workbook,
            sheet,
            cell,
        } => Ok(app
            .cell_text(*workbook, sheet, cell)?
            .map(|text| ResponseData::Text { text })),
        Command::SetCellValue {
            workbook,
            sheet,
            cell,
            value,
        } => done(app.set_cell_value(*workbook, sheet, cell, value)),
        Command::GetRangeValues {
            workbook,
            sheet,
            range,
        } => {
            let values: Vec<Vec<CellValue>> = app.range_values(*workbook, sheet, range)?;
            Ok(Some(ResponseData::Values { values }))
        }
        Command::SetRangeValues {
            workbook,
            sheet,
            range,
            values,
        } => done(app.set_range_values(*workbook, sheet, range, values)),
        Command::SetFormula {
            workbook,
            sheet,
            range,
            formula,
        } => done(app.set_formula(*workbook, sheet, range, formula)),
        Command::DeleteRange {
            workbook,
            sheet,
            range,
        } => done(app.delete_range(*workbook, sheet, range)),

        Command::ApplyFormat {
            workbook,
            sheet,
            range,
            format,
        } => done(app.apply_format(*workbook, sheet, range, format)),
        Command::SetBorder {
            workbook,
            sheet,
            range,
            border,
        } => done(app.set_border(*workbook, sheet, range, border)),
        Command::SetNumberFormat {
            workbook,
            sheet,
            range,
            format,
        } => done(app.set_number_format(*workbook, sheet, range, format)),
        Command::MergeCells {
            workbook,
            sheet,
            range,
            merge,
        } => done(app.merge_cells(*workbook, sheet, range, *merge)),
        Command::SetColumnWidth {
            workbook,
            sheet,
            range,
            width,
        } => done(app.set_column_width(*workbook, sheet, range, *width)),
        Command::InsertRow {
            workbook,
            sheet,
            row,
        } => done(app.insert_row(*workbook, sheet, *row)),

        Command::PageSetup {
            workbook,
            sheet,
            setup,
        } => done(app.page_setup(*workbook, sheet, setup)),
        Command::PrintOut {
            workbook,
            sheet,
            copies,
            preview,
        } => done(app.print("PrintOut", *workbook, sheet, *copies, *preview)),
        Command::PrintOutEx {
            workbook,
            sheet,
            copies,
            preview,
        } => done(app.print("PrintOutEx", *workbook, sheet, *copies, *preview)),
    }
}

#[cfg(windows)]
fn init_com_and_excel(excel: &mut Option<excel::ExcelApp>) -> dispatch::ComResult<()> {
    use windows::Win32::System::Com::{CoInitializeEx, COINIT_APARTMENTTHREADED};

    if excel.is_some() {
        return Ok(());
    }

    // Excel requires a single-threaded apartment
    unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
        .ok()
        .map_err(|e| format!("CoInitializeEx failed: {e}"))?;
    eprintln!("[excel-com-bridge] COM initialized (STA)");

    let app = excel::ExcelApp::new()
        .map_err(|e| format!("Failed to create Excel.Application: {e}"))?;
    eprintln!("[excel-com-bridge] Excel.Application created");
    *excel = Some(app);
    Ok(())
}

#[cfg(windows)]
fn uninit_com() {
    unsafe { windows::Win32::System::Com::CoUninitialize() };
    eprintln!("[excel-com-bridge] COM uninitialized");
}
