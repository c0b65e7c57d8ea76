pub mod app;
pub mod config;
pub mod data;
pub mod filter;
pub mod state;
pub mod ui;

pub use app::SheetSieveApp;
pub use config::{ViewerConfig, load_config};
