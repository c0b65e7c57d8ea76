use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::header::HeaderSpec;
use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::filter::Logic;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – sheet, header and clause form
// ---------------------------------------------------------------------------

/// Render the left setup panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Setup");
    ui.separator();

    let Some(workbook) = &state.workbook else {
        ui.label("No file loaded.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let sheet_names: Vec<String> = workbook.sheets.iter().map(|s| s.name.clone()).collect();
    let sheet_rows = state.sheet().map_or(0, |s| s.len());

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Sheet selector ----
            if sheet_names.len() > 1 {
                ui.strong("Sheet");
                let current = sheet_names
                    .get(state.sheet_index)
                    .cloned()
                    .unwrap_or_default();
                egui::ComboBox::from_id_salt("sheet")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for (i, name) in sheet_names.iter().enumerate() {
                            if ui.selectable_label(i == state.sheet_index, name).clicked() {
                                state.select_sheet(i);
                            }
                        }
                    });
                ui.separator();
            }

            // ---- Header rows ----
            header_section(ui, state, sheet_rows);
            ui.separator();

            // ---- New clause ----
            clause_form(ui, state);
        });
}

fn header_section(ui: &mut Ui, state: &mut AppState, sheet_rows: usize) {
    ui.strong("Header");
    if sheet_rows == 0 {
        ui.label("The sheet is empty.");
        return;
    }
    let max_row = sheet_rows - 1;

    let mut merged = matches!(state.header, HeaderSpec::Merged { .. });
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut merged, false, "Single row");
        ui.radio_value(&mut merged, true, "Merge two rows");
    });

    let (mut upper, mut lower) = match state.header {
        HeaderSpec::Single { row } => (row, (row + 1).min(max_row)),
        HeaderSpec::Merged { upper, lower } => (upper, lower),
    };

    let next = if merged {
        egui::Grid::new("header_rows").show(ui, |ui: &mut Ui| {
            ui.label("Upper row");
            ui.add(egui::DragValue::new(&mut upper).range(0..=max_row));
            ui.end_row();
            ui.label("Lower row (preferred)");
            ui.add(egui::DragValue::new(&mut lower).range(0..=max_row));
            ui.end_row();
        });
        HeaderSpec::Merged { upper, lower }
    } else {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Header row");
            ui.add(egui::DragValue::new(&mut upper).range(0..=max_row));
        });
        HeaderSpec::Single { row: upper }
    };

    state.set_header(next);
}

fn clause_form(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Add filter clause");

    let columns = match &state.table {
        Some(table) => table.columns.clone(),
        None => {
            ui.label("Choose a valid header first.");
            return;
        }
    };

    let draft = &mut state.draft;
    egui::Grid::new("clause_form")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Column");
            egui::ComboBox::from_id_salt("clause_column")
                .selected_text(&draft.column)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        ui.selectable_value(&mut draft.column, col.clone(), col);
                    }
                });
            ui.end_row();

            ui.label("Keyword");
            ui.text_edit_singleline(&mut draft.keyword);
            ui.end_row();

            ui.label("");
            ui.checkbox(&mut draft.include, "Contains (untick to exclude)");
            ui.end_row();

            ui.label("Logic");
            egui::ComboBox::from_id_salt("clause_logic")
                .selected_text(draft.logic.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for logic in Logic::ALL {
                        ui.selectable_value(&mut draft.logic, logic, logic.as_str());
                    }
                });
            ui.end_row();

            ui.label("Prefix");
            ui.add(egui::TextEdit::singleline(&mut draft.prefix).hint_text("( or (("));
            ui.end_row();

            ui.label("Suffix");
            ui.add(egui::TextEdit::singleline(&mut draft.suffix).hint_text(") or ))"));
            ui.end_row();
        });

    let can_add = !state.draft.keyword.is_empty();
    if ui.add_enabled(can_add, egui::Button::new("Add clause")).clicked() {
        state.add_draft();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.result.is_some(), egui::Button::new("Export result…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(!state.filters.is_empty(), egui::Button::new("Save filters…"))
                .clicked()
            {
                save_filters_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load filters…").clicked() {
                load_filters_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let matching = state
                .result
                .as_ref()
                .map_or_else(|| "–".to_string(), |r| r.row_count().to_string());
            ui.label(format!("{} rows loaded, {matching} matching", table.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spreadsheet")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(workbook) => {
                log::info!(
                    "Loaded {} with {} sheet(s)",
                    path.display(),
                    workbook.sheets.len()
                );
                state.set_workbook(workbook);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name(&state.config.default_export_name)
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_result(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_filters_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filter clauses")
        .set_file_name("filters.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_filters(&path) {
            log::error!("Failed to save filters: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn load_filters_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load filter clauses")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_filters(&path) {
            log::error!("Failed to load filters: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
