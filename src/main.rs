use eframe::egui;
use sheet_sieve::{SheetSieveApp, ViewerConfig, load_config};

fn main() -> eframe::Result {
    env_logger::init();

    let config = load_config(None).unwrap_or_else(|e| {
        log::error!("Ignoring config: {e:#}");
        ViewerConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sheet Sieve – Keyword Filter",
        options,
        Box::new(move |_cc| Ok(Box::new(SheetSieveApp::new(config)))),
    )
}
