//! sheetwalk CLI - move tables between CSV files and Excel workbooks

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetwalk::prelude::*;
use sheetwalk_excel_com::{ExcelBridge, ExcelBridgeConfig, ExcelDocument};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetwalk")]
#[command(
    author,
    version,
    about = "Move tables between CSV files and Excel workbooks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    bridge: BridgeArgs,

    /// Workbook password
    #[arg(long, global = true, env = "SHEETWALK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Overrides for the Excel bridge; unset flags fall back to the environment
#[derive(Args)]
struct BridgeArgs {
    /// Path to excel-com-bridge.exe
    #[arg(long, global = true)]
    bridge_exe: Option<PathBuf>,

    /// WINE executable
    #[arg(long, global = true)]
    wine: Option<PathBuf>,

    /// WINEPREFIX to run the bridge in
    #[arg(long, global = true)]
    wine_prefix: Option<PathBuf>,
}

impl BridgeArgs {
    fn config(&self) -> ExcelBridgeConfig {
        let mut config = ExcelBridgeConfig::from_env();
        if let Some(exe) = &self.bridge_exe {
            config.bridge_exe_path = Some(exe.clone());
        }
        if let Some(wine) = &self.wine {
            config.wine_path = wine.clone();
        }
        if let Some(prefix) = &self.wine_prefix {
            config.wine_prefix = Some(prefix.clone());
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all sheets in a workbook
    Sheets {
        /// Workbook file
        workbook: PathBuf,
    },

    /// Export a block starting at A1 as CSV; the first row becomes the header
    Export {
        /// Workbook file
        workbook: PathBuf,

        /// Worksheet name (default: the first one)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Rows to export, header included (default: the used range)
        #[arg(long, default_value = "0")]
        rows: u32,

        /// Columns to export (default: the used range)
        #[arg(long, default_value = "0")]
        cols: u32,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Write a CSV file into a worksheet and save the workbook
    Import {
        /// CSV file with a header row
        csv: PathBuf,

        /// Workbook file
        workbook: PathBuf,

        /// Worksheet name (default: the first one)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Top-left cell of the written block
        #[arg(long, default_value = "A1")]
        at: String,

        /// Save under this path instead of in place
        #[arg(long)]
        save_as: Option<PathBuf>,

        /// Save in the Excel 97-2003 format
        #[arg(long)]
        xls: bool,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let password = cli.password.as_deref();
    match &cli.command {
        Commands::Sheets { workbook } => {
            let mut sheet = open(&cli.bridge, workbook, password)?;
            list_sheets(&mut sheet, &mut io::stdout().lock())?;
            sheet.close().context("Failed to close workbook")
        }
        Commands::Export {
            workbook,
            sheet: name,
            rows,
            cols,
            output,
            delimiter,
        } => {
            let mut sheet = open(&cli.bridge, workbook, password)?;
            select(&mut sheet, name.as_deref())?;
            let delimiter = delimiter_byte(*delimiter)?;
            let count = match output {
                Some(path) => {
                    let file = std::fs::File::create(path)
                        .with_context(|| format!("Failed to create '{}'", path.display()))?;
                    export(&mut sheet, *rows, *cols, delimiter, file)?
                }
                None => export(&mut sheet, *rows, *cols, delimiter, io::stdout().lock())?,
            };
            eprintln!("Exported {count} rows");
            sheet.close().context("Failed to close workbook")
        }
        Commands::Import {
            csv,
            workbook,
            sheet: name,
            at,
            save_as,
            xls,
            delimiter,
        } => {
            let at = Coordinate::parse(at).with_context(|| format!("Invalid cell '{at}'"))?;
            let input = std::fs::File::open(csv)
                .with_context(|| format!("Failed to open '{}'", csv.display()))?;

            let mut sheet = open(&cli.bridge, workbook, password)?;
            select(&mut sheet, name.as_deref())?;
            let count = import(&mut sheet, input, at, delimiter_byte(*delimiter)?)?;

            let format = if *xls {
                SaveFormat::Excel97
            } else {
                SaveFormat::Native
            };
            save(&mut sheet, save_as.as_deref(), format)?;
            eprintln!("Imported {count} rows");
            sheet.close().context("Failed to close workbook")
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SHEETWALK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open(
    bridge: &BridgeArgs,
    path: &Path,
    password: Option<&str>,
) -> Result<SheetAccessor<ExcelDocument>> {
    let config = bridge.config();
    tracing::debug!(?config, "starting Excel bridge");
    let excel = ExcelBridge::start(config).context("Failed to start the Excel bridge")?;
    let document = ExcelDocument::open(excel, path, password)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;
    SheetAccessor::new(document).context("Failed to bind to the first worksheet")
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter '{delimiter}' is not a single ASCII character"))
}

fn select<E: SpreadsheetEngine>(sheet: &mut SheetAccessor<E>, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        sheet
            .select_worksheet(name)
            .with_context(|| format!("Worksheet '{name}' not found"))?;
    }
    Ok(())
}

fn list_sheets<E: SpreadsheetEngine>(
    sheet: &mut SheetAccessor<E>,
    out: &mut impl Write,
) -> Result<()> {
    let names = sheet.worksheet_names()?;
    writeln!(out, "{}: {} sheet(s)", sheet.file_name()?, names.len())?;
    for (i, name) in names.iter().enumerate() {
        writeln!(out, "  [{i}] {name}")?;
    }
    Ok(())
}

/// Write the exported table as CSV, returning the data row count
fn export<E: SpreadsheetEngine, W: Write>(
    sheet: &mut SheetAccessor<E>,
    rows: u32,
    cols: u32,
    delimiter: u8,
    out: W,
) -> Result<usize> {
    let table = sheet
        .export_range(rows, cols)
        .context("Failed to read the worksheet")?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    writer.write_record(table.columns())?;
    for i in 0..table.row_count() {
        writer.write_record(table.row_text(i))?;
    }
    writer.flush()?;
    Ok(table.row_count())
}

/// Read a CSV table and write it at `at`, returning the data row count
fn import<E: SpreadsheetEngine, R: Read>(
    sheet: &mut SheetAccessor<E>,
    input: R,
    at: Coordinate,
    delimiter: u8,
) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(input);

    let mut table = TabularBlock::new(reader.headers()?.iter());
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        table.push_text_row(record.iter())?;
    }

    sheet.move_to(at);
    if !sheet.import_table(&table)? {
        bail!("Failed to write the table");
    }
    Ok(table.row_count())
}

fn save<E: SpreadsheetEngine>(
    sheet: &mut SheetAccessor<E>,
    save_as: Option<&Path>,
    format: SaveFormat,
) -> Result<()> {
    let saved = match save_as {
        Some(path) => sheet.save_as(path, format)?,
        None => sheet.save()?,
    };
    if !saved {
        bail!("Workbook was not saved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn memory_sheet() -> SheetAccessor<MemoryWorkbook> {
        SheetAccessor::with_notifier(MemoryWorkbook::new(), |_: &Notice| {}).unwrap()
    }

    #[test]
    fn test_csv_round_trip_through_worksheet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Name,Age\nAnn,30\nBo,\n").unwrap();

        let mut sheet = memory_sheet();
        let input = std::fs::File::open(file.path()).unwrap();
        assert_eq!(import(&mut sheet, input, Coordinate::ORIGIN, b',').unwrap(), 2);

        let mut out = Vec::new();
        assert_eq!(export(&mut sheet, 0, 0, b';', &mut out).unwrap(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name;Age\nAnn;30\nBo;\n"
        );
    }

    #[test]
    fn test_import_at_offset() {
        let mut sheet = memory_sheet();
        import(
            &mut sheet,
            "A,B\n1,2\n".as_bytes(),
            Coordinate::parse("C2").unwrap(),
            b',',
        )
        .unwrap();
        assert_eq!(sheet.get_cell(At::cell(2, 3)).unwrap(), "A");
        assert_eq!(sheet.get_cell(At::cell(3, 4)).unwrap(), "2");
    }

    #[test]
    fn test_list_sheets() {
        let wb = MemoryWorkbook::with_sheets("Book1", ["Main", "Data"]);
        let mut sheet = SheetAccessor::with_notifier(wb, |_: &Notice| {}).unwrap();
        let mut out = Vec::new();
        list_sheets(&mut sheet, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Book1: 2 sheet(s)\n  [0] Main\n  [1] Data\n"
        );
    }

    #[test]
    fn test_save_failure_is_an_error() {
        let mut wb = MemoryWorkbook::new();
        wb.fail_saves("locked");
        let mut sheet = SheetAccessor::with_notifier(wb, |_: &Notice| {}).unwrap();
        assert!(save(&mut sheet, None, SaveFormat::Native).is_err());
    }

    #[test]
    fn test_delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert!(delimiter_byte('é').is_err());
    }
}
