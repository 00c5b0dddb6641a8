//! Desktop interface built on egui/eframe.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::MedGridApp;
pub use state::{AppState, Screen};
pub use theme::Theme;
