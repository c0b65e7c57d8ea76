use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};

use super::model::{CellValue, RawSheet, Table};

// ---------------------------------------------------------------------------
// Header configuration
// ---------------------------------------------------------------------------

/// Which sheet row(s) hold the column names (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSpec {
    Single { row: usize },
    /// Two header rows merged cell by cell; `lower` wins where it has a name.
    Merged { upper: usize, lower: usize },
}

impl Default for HeaderSpec {
    fn default() -> Self {
        HeaderSpec::Single { row: 0 }
    }
}

impl HeaderSpec {
    /// Last row occupied by the header; data starts on the row after it.
    pub fn last_row(&self) -> usize {
        match *self {
            HeaderSpec::Single { row } => row,
            HeaderSpec::Merged { upper, lower } => upper.max(lower),
        }
    }
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// The usable name of a header cell, or `None` when it is blank,
/// whitespace-only or the literal `nan`.
fn cell_name(cell: Option<&CellValue>) -> Option<String> {
    let cell = cell?;
    if cell.is_missing() {
        return None;
    }
    let text = cell.to_string();
    if text.trim().is_empty() || text.eq_ignore_ascii_case("nan") {
        return None;
    }
    Some(text)
}

fn unnamed(i: usize) -> String {
    format!("Unnamed: {}", i + 1)
}

/// Suffix repeats left to right: the k-th occurrence of a name becomes
/// `name_k`. When `name_k` is already emitted, or is the name of another
/// source cell, k keeps rising until the name is free.
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let claimed: HashSet<String> = names.iter().cloned().collect();
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut counts: HashMap<String, usize> = HashMap::new();

    names
        .into_iter()
        .map(|name| {
            if used.insert(name.clone()) {
                counts.insert(name.clone(), 1);
                return name;
            }
            let k = counts.entry(name.clone()).or_insert(1);
            let candidate = loop {
                *k += 1;
                let candidate = format!("{name}_{k}");
                if !used.contains(&candidate) && !claimed.contains(&candidate) {
                    break candidate;
                }
            };
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Resolve unique column names from a single header row.
pub fn fix_header(row: &[CellValue]) -> Vec<String> {
    let names = row
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_name(Some(cell)).unwrap_or_else(|| unnamed(i)))
        .collect();
    dedup_names(names)
}

/// Resolve unique column names from two header rows, preferring `lower`
/// per position and falling back to `upper`.
pub fn merge_header_rows(upper: &[CellValue], lower: &[CellValue]) -> Vec<String> {
    let names = (0..lower.len())
        .map(|i| {
            cell_name(lower.get(i))
                .or_else(|| cell_name(upper.get(i)))
                .unwrap_or_else(|| unnamed(i))
        })
        .collect();
    dedup_names(names)
}

// ---------------------------------------------------------------------------
// Table construction
// ---------------------------------------------------------------------------

fn header_row(sheet: &RawSheet, row: usize) -> Result<&[CellValue]> {
    match sheet.rows.get(row) {
        Some(r) => Ok(r),
        None => bail!(
            "Header row {row} is out of range: sheet '{}' has {} rows",
            sheet.name,
            sheet.len()
        ),
    }
}

/// Name the columns of `sheet` per `spec`; the data rows are all rows after
/// the last header row.
pub fn build_table(sheet: &RawSheet, spec: HeaderSpec) -> Result<Table> {
    let columns = match spec {
        HeaderSpec::Single { row } => fix_header(header_row(sheet, row)?),
        HeaderSpec::Merged { upper, lower } => {
            merge_header_rows(header_row(sheet, upper)?, header_row(sheet, lower)?)
        }
    };
    let rows = sheet
        .rows
        .iter()
        .skip(spec.last_row() + 1)
        .cloned()
        .collect();
    Ok(Table::new(columns, rows))
}
