mod app;
mod data;
mod state;
mod ui;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use app::FitsViewerApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional single positional argument: a FITS file to open on startup.
    let initial_file: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FITS Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(FitsViewerApp::new(initial_file)))),
    )
}
