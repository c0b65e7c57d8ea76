use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Read-only grid of cells
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 260.0;

/// Render at most `max_rows` rows under the given column titles.
///
/// With `row_numbers` a leading column shows the 0-based row index, which
/// is what the header row pickers expect.
pub fn data_table(
    ui: &mut Ui,
    id: &str,
    columns: &[String],
    rows: &[Vec<CellValue>],
    max_rows: usize,
    row_numbers: bool,
) {
    let shown = rows.len().min(max_rows);

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(true)
                .max_scroll_height(MAX_HEIGHT);
            if row_numbers {
                builder = builder.column(Column::exact(36.0));
            }
            builder
                .columns(Column::auto().at_least(60.0).clip(true), columns.len())
                .header(20.0, |mut header| {
                    if row_numbers {
                        header.col(|ui: &mut Ui| {
                            ui.strong("#");
                        });
                    }
                    for name in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, shown, |mut row| {
                        let index = row.index();
                        if row_numbers {
                            row.col(|ui: &mut Ui| {
                                ui.weak(index.to_string());
                            });
                        }
                        for cell in &rows[index] {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
    });

    if rows.len() > shown {
        ui.weak(format!("… {} more rows", rows.len() - shown));
    }
}
