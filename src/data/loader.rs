use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CellValue, RawSheet, Workbook};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extensions accepted by [`load_file`], for the open dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "parquet", "pq"];

/// Load a file as header-less sheets.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – every worksheet
/// * `.csv`     – one sheet, no header interpretation
/// * `.parquet` – one sheet, field names as row 0
pub fn load_file(path: &Path) -> Result<Workbook> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let sheets = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path)?,
        "csv" => vec![load_csv(path)?],
        "parquet" | "pq" => vec![load_parquet(path)?],
        other => bail!("Unsupported file extension: .{other}"),
    };

    if sheets.is_empty() {
        bail!("{} contains no sheets", path.display());
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

// ---------------------------------------------------------------------------
// Spreadsheet loader (calamine)
// ---------------------------------------------------------------------------

/// Read every worksheet. Ranges that do not start at A1 are padded so that
/// row index `i` is always sheet row `i + 1`.
fn load_spreadsheet(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("reading sheet '{name}'"))?;
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        let mut rows: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
        for row in range.rows() {
            let mut cells = vec![CellValue::Null; start_col as usize];
            cells.extend(row.iter().map(data_to_cell));
            rows.push(cells);
        }

        log::debug!("Sheet '{name}': {} rows", rows.len());
        sheets.push(RawSheet::new(name, rows));
    }

    Ok(sheets)
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => CellValue::Date(d.to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every CSV line is a row; the header is chosen later like any other sheet.
fn load_csv(path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(RawSheet::new(file_stem(path), rows))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file as one sheet.
///
/// Field names form row 0 so the default single-row header reproduces the
/// schema; scalar columns (strings, ints, floats, bools) become cells, other
/// types are shown by their type name.
fn load_parquet(path: &Path) -> Result<RawSheet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let header: Vec<CellValue> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| CellValue::String(f.name().clone()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = vec![header];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawSheet::new(file_stem(path), rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| CellValue::String(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64))
            .unwrap_or(CellValue::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64))
            .unwrap_or(CellValue::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row)))
            .unwrap_or(CellValue::Null),
        other => CellValue::String(format!("{other:?}")),
    }
}
