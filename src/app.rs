use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{filters, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SheetSieveApp {
    pub state: AppState,
}

impl SheetSieveApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl Default for SheetSieveApp {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl eframe::App for SheetSieveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sheet, header, new clause ----
        egui::SidePanel::left("setup_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: previews, clauses, results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            filters::filter_panel(ui, &mut self.state);
        });
    }
}
