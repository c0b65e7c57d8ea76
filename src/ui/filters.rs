use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::table::data_table;
use crate::filter::{FilterAction, FilterClause};
use crate::state::AppState;

const WARNING: Color32 = Color32::from_rgb(230, 160, 30);

// ---------------------------------------------------------------------------
// Central panel – previews, clause list, logic and results
// ---------------------------------------------------------------------------

/// Spreadsheet-style column letters: A, B, …, Z, AA, …
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Render the central panel.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(sheet) = state.sheet() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a spreadsheet to start  (File → Open…)");
        });
        return;
    };

    let raw_preview_rows = state.config.raw_preview_rows;
    let table_preview_rows = state.config.table_preview_rows;

    // Rendering only reads `state`; edits are applied once it is done.
    let mut action = None;
    let mut run = false;
    let mut export = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Raw preview").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    let letters: Vec<String> = (0..sheet.width()).map(column_letter).collect();
                    data_table(ui, "raw", &letters, &sheet.rows, raw_preview_rows, true);
                });

            let Some(table) = &state.table else {
                return;
            };

            egui::CollapsingHeader::new(RichText::new("Columns").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.label(table.columns.join(", "));
                    data_table(ui, "named", &table.columns, &table.rows, 5, false);
                });
            ui.separator();

            action = clause_list(ui, state.filters.clauses());

            if let Some(msg) = state.bracket_warning() {
                ui.colored_label(WARNING, msg);
            }
            if let Some(msg) = state.nesting_warning() {
                ui.colored_label(WARNING, format!("Brackets do not nest: {msg}"));
            }
            if !state.filters.is_empty() {
                ui.strong("Match logic");
                ui.code(state.readable_logic());
            }

            ui.add_space(6.0);
            run = ui
                .add_enabled(state.can_run(), egui::Button::new("Run filter"))
                .clicked();

            if let Some(result) = &state.result {
                ui.separator();
                ui.label(RichText::new(format!("{} rows remain", result.row_count())).strong());
                data_table(
                    ui,
                    "result",
                    &result.table.columns,
                    &result.table.rows,
                    table_preview_rows,
                    false,
                );
                export = ui.button("Export…").clicked();
            }
        });

    if let Some(action) = action {
        state.dispatch(action);
    }
    if run {
        state.run_filter();
    }
    if export {
        super::panels::export_dialog(state);
    }
}

/// One row per clause with bracket and delete buttons; returns the edit
/// the user asked for, applied by the caller after rendering.
fn clause_list(ui: &mut Ui, clauses: &[FilterClause]) -> Option<FilterAction> {
    ui.strong("Filter clauses");
    if clauses.is_empty() {
        ui.label("Add a filter clause in the side panel.");
        return None;
    }

    let mut action = None;
    for (i, clause) in clauses.iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("+(").clicked() {
                action = Some(FilterAction::PushOpen(i));
            }
            if !clause.prefix.is_empty() && ui.small_button("−(").clicked() {
                action = Some(FilterAction::PopOpen(i));
            }

            ui.label(format!("{}.", i + 1));
            if i > 0 {
                ui.strong(format!("[{}]", clause.logic));
            }
            ui.monospace(format!("{}{}", clause.prefix, clause.column));
            ui.label(if clause.include {
                "contains"
            } else {
                "does not contain"
            });
            ui.strong(&clause.keyword);
            ui.monospace(&clause.suffix);

            if ui.small_button("+)").clicked() {
                action = Some(FilterAction::PushClose(i));
            }
            if !clause.suffix.is_empty() && ui.small_button("−)").clicked() {
                action = Some(FilterAction::PopClose(i));
            }
            if ui.small_button("🗑").on_hover_text("Remove clause").clicked() {
                action = Some(FilterAction::Remove(i));
            }
        });
    }

    if ui.small_button("Clear all").clicked() {
        action = Some(FilterAction::Clear);
    }
    action
}
