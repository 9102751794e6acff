mod action_bar;
mod annotation;
mod app;
mod canvas;
mod export;
mod palette;
mod project;
mod proof;
mod proof_panel;
mod state;
mod theme;
mod toolbar;
mod transform;
mod ui_controls;

use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("proofmark=info")),
        )
        .init();

    let viewport = egui::ViewportBuilder::default()
        .with_title("ProofMark")
        .with_inner_size([1180.0, 800.0])
        .with_min_inner_size([760.0, 520.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "ProofMark",
        options,
        Box::new(|cc| Box::new(app::ProofMarkApp::new(cc))),
    )
}
