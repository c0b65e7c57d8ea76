use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{HeaderMode, ViewerConfig};
use crate::data::export::export_file;
use crate::data::header::{HeaderSpec, build_table};
use crate::data::model::{RawSheet, Table, Workbook};
use crate::filter::preset::{load_preset, save_preset};
use crate::filter::{
    FilterAction, FilterClause, FilterList, FilterOutcome, Logic, apply_filter, bracket_balance,
    brackets_balanced, check_nesting, readable_expression,
};

// ---------------------------------------------------------------------------
// Clause form
// ---------------------------------------------------------------------------

/// Text fields of the "add clause" form.
#[derive(Debug, Clone)]
pub struct ClauseDraft {
    pub column: String,
    pub keyword: String,
    pub include: bool,
    pub logic: Logic,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ClauseDraft {
    fn default() -> Self {
        Self {
            column: String::new(),
            keyword: String::new(),
            include: true,
            logic: Logic::And,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded file (None until user opens one).
    pub workbook: Option<Workbook>,

    /// Index into `workbook.sheets`.
    pub sheet_index: usize,

    /// Which row(s) name the columns.
    pub header: HeaderSpec,

    /// Sheet with resolved column names.
    pub table: Option<Table>,

    /// Current revision of the filter list.
    pub filters: FilterList,

    pub draft: ClauseDraft,

    /// Last executed filter; cleared whenever its inputs change.
    pub result: Option<FilterOutcome>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            workbook: None,
            sheet_index: 0,
            header: HeaderSpec::default(),
            table: None,
            filters: FilterList::new(),
            draft: ClauseDraft::default(),
            result: None,
            status_message: None,
        }
    }

    pub fn sheet(&self) -> Option<&RawSheet> {
        self.workbook.as_ref()?.sheets.get(self.sheet_index)
    }

    /// Ingest a newly loaded file and resolve its first sheet.
    pub fn set_workbook(&mut self, workbook: Workbook) {
        self.workbook = Some(workbook);
        self.status_message = None;
        self.select_sheet(0);
    }

    /// Switch sheet, resetting the header to the configured default.
    pub fn select_sheet(&mut self, index: usize) {
        self.sheet_index = index;
        let rows = self.sheet().map_or(0, RawSheet::len);
        self.header = match self.config.default_header_mode {
            HeaderMode::Merged if rows >= 2 => HeaderSpec::Merged { upper: 0, lower: 1 },
            _ => HeaderSpec::Single { row: 0 },
        };
        self.rebuild_table();
    }

    pub fn set_header(&mut self, header: HeaderSpec) {
        if header != self.header {
            self.header = header;
            self.rebuild_table();
        }
    }

    /// Re-resolve column names after a sheet or header change.
    /// The filter list is kept as is.
    pub fn rebuild_table(&mut self) {
        self.result = None;
        let Some(sheet) = self.sheet() else {
            self.table = None;
            return;
        };

        match build_table(sheet, self.header) {
            Ok(table) => {
                log::info!(
                    "Sheet '{}': {} rows, columns {:?}",
                    sheet.name,
                    table.len(),
                    table.columns
                );
                if !table.columns.contains(&self.draft.column) {
                    self.draft.column = table.columns.first().cloned().unwrap_or_default();
                }
                self.table = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to build table: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.table = None;
            }
        }
    }

    // -- filter list --

    /// Move the filter list to its next revision.
    pub fn dispatch(&mut self, action: FilterAction) {
        match self.filters.reduce(&action) {
            Ok(next) => {
                log::debug!("Filter revision {} after {action:?}", next.revision());
                self.filters = next;
                self.result = None;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Rejected filter edit: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Append the clause described by the form; the keyword is cleared on
    /// success so the next clause starts fresh.
    pub fn add_draft(&mut self) {
        let d = &self.draft;
        match FilterClause::new(
            d.column.clone(),
            d.keyword.clone(),
            d.include,
            d.logic,
            &d.prefix,
            &d.suffix,
        ) {
            Ok(clause) => {
                self.dispatch(FilterAction::AddClause(clause));
                self.draft.keyword.clear();
                self.draft.prefix.clear();
                self.draft.suffix.clear();
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Warning for an unbalanced bracket count, if any.
    pub fn bracket_warning(&self) -> Option<String> {
        match bracket_balance(self.filters.clauses()) {
            0 => None,
            n if n > 0 => Some(format!(
                "Brackets are unbalanced: {n} '(' not closed. Adjust them to run the filter."
            )),
            n => Some(format!(
                "Brackets are unbalanced: {} ')' without a matching '('. Adjust them to run the filter.",
                -n
            )),
        }
    }

    /// Structural warning for lists whose counts balance but whose groups
    /// do not nest.
    pub fn nesting_warning(&self) -> Option<String> {
        if !brackets_balanced(self.filters.clauses()) {
            return None;
        }
        check_nesting(self.filters.clauses())
            .err()
            .map(|e| e.to_string())
    }

    pub fn readable_logic(&self) -> String {
        readable_expression(self.filters.clauses())
    }

    /// The Run button is enabled iff a table is loaded and the bracket
    /// count balances.
    pub fn can_run(&self) -> bool {
        self.table.is_some() && brackets_balanced(self.filters.clauses())
    }

    pub fn run_filter(&mut self) {
        if !self.can_run() {
            self.status_message = self.bracket_warning();
            return;
        }
        let Some(table) = &self.table else {
            return;
        };

        let outcome = apply_filter(table, self.filters.clauses());
        self.status_message = outcome
            .error
            .as_ref()
            .map(|e| format!("Logic expression error: {e}"));
        self.result = Some(outcome);
    }

    // -- files --

    pub fn export_result(&self, path: &Path) -> Result<()> {
        let outcome = self
            .result
            .as_ref()
            .context("run the filter before exporting")?;
        export_file(&outcome.table, path)
    }

    pub fn save_filters(&self, path: &Path) -> Result<()> {
        save_preset(path, &self.filters)
    }

    pub fn load_filters(&mut self, path: &Path) -> Result<()> {
        let clauses = load_preset(path)?;
        self.dispatch(FilterAction::Replace(clauses));
        Ok(())
    }
}
