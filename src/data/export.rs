use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::Workbook;

use super::model::{CellValue, Table};

// Excel worksheet limits.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Serialise `table` as an `.xlsx` workbook with a single `Sheet1`:
/// one header row of column names, then the data rows. No styling.
pub fn to_xlsx_bytes(table: &Table) -> Result<Vec<u8>> {
    if table.len() + 1 > MAX_ROWS {
        bail!("{} rows do not fit in one worksheet", table.len());
    }
    if table.columns.len() > MAX_COLUMNS {
        bail!("{} columns do not fit in one worksheet", table.columns.len());
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").context("naming worksheet")?;

    for (col, name) in table.columns.iter().enumerate() {
        sheet
            .write_string(0, col as u16, name)
            .context("writing header")?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                CellValue::Null => {}
                CellValue::Integer(i) => {
                    sheet.write_number(r, c, *i as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(r, c, *f)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                CellValue::String(s) | CellValue::Date(s) => {
                    sheet.write_string(r, c, s)?;
                }
            }
        }
    }

    workbook.save_to_buffer().context("serialising workbook")
}

/// Serialise `table` as CSV with a header line.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(ToString::to_string))
            .context("writing CSV row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))
}

/// Write `table` to `path`: CSV for `.csv`, otherwise `.xlsx`.
pub fn export_file(table: &Table, path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let bytes = if is_csv {
        to_csv_bytes(table)?
    } else {
        to_xlsx_bytes(table)?
    };
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;

    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}
