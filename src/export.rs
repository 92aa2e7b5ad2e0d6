// 💾 Table Export - XLSX (default) and CSV
// One-shot write of the whole table, plus read-back for verification.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Days, NaiveDate};
use std::path::Path;
use tracing::{debug, info};
use umya_spreadsheet::Worksheet;

use crate::movement::{Movement, COLUMNS};

/// Worksheet name of a default spreadsheet export
pub const SHEET_NAME: &str = "Sheet1";

/// Number format applied to date cells
pub const DATE_FORMAT_CODE: &str = "yyyy-mm-dd";

// ============================================================================
// FORMAT DETECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// Detect format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(anyhow!(
                "Unsupported output extension for {} (expected .xlsx or .csv)",
                path.display()
            )),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

/// A table read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct MovementTable {
    /// Header row exactly as found in the file
    pub columns: Vec<String>,
    pub movements: Vec<Movement>,
}

impl MovementTable {
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Write the table to `path`, format chosen by extension
pub fn write_table(path: &Path, movements: &[Movement]) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path)?;

    match format {
        OutputFormat::Xlsx => write_xlsx(path, movements)?,
        OutputFormat::Csv => write_csv(path, movements)?,
    }

    info!(
        path = %path.display(),
        format = format.name(),
        rows = movements.len(),
        "Wrote movement table"
    );
    Ok(format)
}

/// Read a table previously written by [`write_table`]
pub fn read_table(path: &Path) -> Result<MovementTable> {
    let table = match OutputFormat::from_path(path)? {
        OutputFormat::Xlsx => read_xlsx(path)?,
        OutputFormat::Csv => read_csv(path)?,
    };

    debug!(path = %path.display(), rows = table.len(), "Read movement table");
    Ok(table)
}

// ============================================================================
// XLSX
// ============================================================================

pub fn write_xlsx(path: &Path, movements: &[Movement]) -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or_else(|| anyhow!("New workbook has no sheet {}", SHEET_NAME))?;

    for (idx, header) in COLUMNS.iter().enumerate() {
        sheet.get_cell_mut((idx as u32 + 1, 1u32)).set_value(*header);
    }

    for (idx, m) in movements.iter().enumerate() {
        let row = idx as u32 + 2;

        sheet.get_cell_mut((1u32, row)).set_value_number(m.code as f64);

        let date_cell = sheet.get_cell_mut((2u32, row));
        date_cell.set_value_number(excel_serial(m.date));
        date_cell
            .get_style_mut()
            .get_number_format_mut()
            .set_format_code(DATE_FORMAT_CODE);

        sheet.get_cell_mut((3u32, row)).set_value(m.movement_type.as_str());
        sheet.get_cell_mut((4u32, row)).set_value(m.classification.as_str());
        sheet.get_cell_mut((5u32, row)).set_value(m.document.as_str());
        sheet.get_cell_mut((6u32, row)).set_value(m.cost_center.as_str());
        sheet.get_cell_mut((7u32, row)).set_value(m.location.as_str());
        sheet.get_cell_mut((8u32, row)).set_value_number(m.amount);
        sheet.get_cell_mut((9u32, row)).set_value(m.currency.as_str());
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .with_context(|| format!("Failed to write spreadsheet: {}", path.display()))
}

pub fn read_xlsx(path: &Path) -> Result<MovementTable> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .with_context(|| format!("Failed to read spreadsheet: {}", path.display()))?;
    let sheet = book
        .get_sheet_by_name(SHEET_NAME)
        .ok_or_else(|| anyhow!("Sheet {} not found in {}", SHEET_NAME, path.display()))?;

    let (max_col, max_row) = sheet.get_highest_column_and_row();

    let columns: Vec<String> = (1..=max_col).map(|col| cell_text(sheet, col, 1)).collect();
    check_columns(&columns, path)?;

    let mut movements = Vec::with_capacity(max_row.saturating_sub(1) as usize);
    for row in 2..=max_row {
        let movement = movement_from_row(sheet, row)
            .with_context(|| format!("Invalid row {} in {}", row, path.display()))?;
        movements.push(movement);
    }

    Ok(MovementTable { columns, movements })
}

fn movement_from_row(sheet: &Worksheet, row: u32) -> Result<Movement> {
    let code = parse_number(&cell_text(sheet, 1, row), "code")?;
    if code.fract() != 0.0 || code < 0.0 || code > u32::MAX as f64 {
        bail!("Movement code {} is not a valid integer", code);
    }
    let serial = parse_number(&cell_text(sheet, 2, row), "date")?;

    Ok(Movement {
        code: code as u32,
        date: from_excel_serial(serial)?,
        movement_type: cell_text(sheet, 3, row).parse()?,
        classification: cell_text(sheet, 4, row).parse()?,
        document: cell_text(sheet, 5, row),
        cost_center: cell_text(sheet, 6, row).parse()?,
        location: cell_text(sheet, 7, row).parse()?,
        amount: parse_number(&cell_text(sheet, 8, row), "amount")?,
        currency: cell_text(sheet, 9, row).parse()?,
    })
}

fn cell_text(sheet: &Worksheet, col: u32, row: u32) -> String {
    sheet
        .get_cell((col, row))
        .map(|cell| cell.get_value().to_string())
        .unwrap_or_default()
}

fn parse_number(raw: &str, field: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("Field {} is not numeric: {:?}", field, raw))
}

// Excel day 0 with the 1900 leap-year bug folded in
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// First date whose serial agrees with Excel; earlier serials are shifted
/// by Excel's phantom 1900-02-29
pub fn excel_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 3, 1).unwrap_or(NaiveDate::MIN)
}

/// Days since the Excel epoch, exact from [`excel_min_date`] on
pub fn excel_serial(date: NaiveDate) -> f64 {
    (date - excel_epoch()).num_days() as f64
}

pub fn from_excel_serial(serial: f64) -> Result<NaiveDate> {
    if serial.fract() != 0.0 || serial < 0.0 {
        bail!("Date serial {} is not a whole day", serial);
    }
    excel_epoch()
        .checked_add_days(Days::new(serial as u64))
        .ok_or_else(|| anyhow!("Date serial {} is out of range", serial))
}

// ============================================================================
// CSV
// ============================================================================

pub fn write_csv(path: &Path, movements: &[Movement]) -> Result<()> {
    use csv::WriterBuilder;

    // Header written by hand so an empty table still carries its columns
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    writer
        .write_record(COLUMNS)
        .with_context(|| format!("Failed to write CSV header to {}", path.display()))?;

    for m in movements {
        writer
            .serialize(m)
            .with_context(|| format!("Failed to write movement {} to {}", m.code, path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))
}

pub fn read_csv(path: &Path) -> Result<MovementTable> {
    use csv::ReaderBuilder;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_columns(&columns, path)?;

    let mut movements = Vec::new();
    for (line_num, result) in reader.deserialize::<Movement>().enumerate() {
        let movement = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line_num + 2, path.display())
        })?;
        movements.push(movement);
    }

    Ok(MovementTable { columns, movements })
}

fn check_columns(columns: &[String], path: &Path) -> Result<()> {
    if columns.iter().map(String::as_str).ne(COLUMNS.iter().copied()) {
        bail!(
            "Unexpected columns in {}: {:?} (expected {:?})",
            path.display(),
            columns,
            COLUMNS
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, MovementGenerator};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample(rows: usize) -> Vec<Movement> {
        let config = GeneratorConfig::default()
            .with_rows(rows)
            .with_seed(2024)
            .with_date_window(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 365);
        MovementGenerator::new(config).unwrap().generate()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            OutputFormat::from_path(Path::new("dados_importacao.xlsx")).unwrap(),
            OutputFormat::Xlsx
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out/DATA.CSV")).unwrap(),
            OutputFormat::Csv
        );
        assert!(OutputFormat::from_path(Path::new("data.json")).is_err());
        assert!(OutputFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_excel_serial_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(excel_serial(date), 45292.0);
        assert_eq!(from_excel_serial(45292.0).unwrap(), date);
        assert!(from_excel_serial(45292.5).is_err());
        assert!(from_excel_serial(-1.0).is_err());
    }

    #[test]
    fn test_xlsx_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dados_importacao.xlsx");
        let movements = sample(120);

        let format = write_table(&path, &movements).unwrap();
        assert_eq!(format, OutputFormat::Xlsx);
        assert!(path.exists());

        let table = read_table(&path).unwrap();
        assert_eq!(table.columns, COLUMNS.to_vec());
        assert_eq!(table.len(), 120);
        assert_eq!(table.movements, movements);
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let movements = sample(80);

        write_table(&path, &movements).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));

        let table = read_table(&path).unwrap();
        assert_eq!(table.columns, COLUMNS.to_vec());
        assert_eq!(table.movements, movements);
    }

    #[test]
    fn test_empty_table_keeps_columns() {
        let dir = TempDir::new().unwrap();

        for name in ["empty.xlsx", "empty.csv"] {
            let path = dir.path().join(name);
            write_table(&path, &[]).unwrap();

            let table = read_table(&path).unwrap();
            assert_eq!(table.columns, COLUMNS.to_vec());
            assert!(table.is_empty());
        }
    }

    #[test]
    fn test_read_rejects_foreign_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "Date,Description,Amount\n01/01/2024,Coffee,3.50\n").unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(err.to_string().contains("Unexpected columns"));
    }

    #[test]
    fn test_read_rejects_value_outside_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        let mut content = COLUMNS.join(",");
        content.push_str("\n1,2024-01-01,Aluguel,Alimentos,NF-1234,Logística,Brasil,100.0,USD\n");
        fs::write(&path, content).unwrap();

        assert!(read_table(&path).is_err());
    }

    #[test]
    fn test_xlsx_read_rejects_value_outside_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.xlsx");
        write_table(&path, &sample(3)).unwrap();

        let mut book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        book.get_sheet_by_name_mut(SHEET_NAME)
            .unwrap()
            .get_cell_mut((3u32, 3u32))
            .set_value("Aluguel");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid row 3"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("missing").join("out.csv");
        assert!(write_table(&path, &sample(3)).is_err());
    }
}
