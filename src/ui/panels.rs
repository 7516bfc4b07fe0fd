use std::path::Path;

use eframe::egui::{self, Button, DragValue, Ui, ViewportCommand};

use crate::app::{OPEN_SHORTCUT, QUIT_SHORTCUT};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let open = Button::new("Open FITS File")
                .shortcut_text(ui.ctx().format_shortcut(&OPEN_SHORTCUT));
            if ui.add(open).clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }

            ui.separator();

            let exit =
                Button::new("Exit").shortcut_text(ui.ctx().format_shortcut(&QUIT_SHORTCUT));
            if ui.add(exit).clicked() {
                ui.ctx().send_viewport_cmd(ViewportCommand::Close);
            }
        });

        ui.separator();

        if let Some(image) = &state.image {
            let (width, height) = image.dimensions();
            ui.label(format!("{width} × {height} pixels"));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – display controls
// ---------------------------------------------------------------------------

/// Render the display-controls panel: image info and contrast levels.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Display");
    ui.separator();

    let Some(image) = &state.image else {
        ui.label("No image loaded.");
        return;
    };

    let (width, height) = image.dimensions();
    let (data_min, data_max) = image.value_range();

    if let Some(name) = state.path.as_ref().and_then(|p| p.file_name()) {
        ui.label(name.to_string_lossy().into_owned());
    }
    ui.label(format!("Size: {width} × {height}"));
    ui.label(format!("Data range: {data_min:.4} … {data_max:.4}"));

    ui.separator();
    ui.strong("Levels");

    let (mut black, mut white) = state.levels;
    let step = ((data_max - data_min) / 255.0).max(1e-6);

    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Black");
        changed |= ui.add(DragValue::new(&mut black).speed(step)).changed();
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("White");
        changed |= ui.add(DragValue::new(&mut white).speed(step)).changed();
    });
    if changed {
        state.set_levels(black, white);
    }

    if ui.button("Reset levels").clicked() {
        state.reset_levels();
    }
}

// ---------------------------------------------------------------------------
// File opening
// ---------------------------------------------------------------------------

/// Present the native file dialog and open the selection, if any.
/// Cancelling the dialog changes nothing.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open FITS File")
        .add_filter("FITS files", &["fits", "fit", "fts"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        open_path(state, &path);
    }
}

/// Open `path`, logging the outcome and queueing the error dialog on
/// failure. The previous image stays displayed after an error.
pub fn open_path(state: &mut AppState, path: &Path) {
    match state.open(path) {
        Ok(()) => {
            if let Some(image) = &state.image {
                let (width, height) = image.dimensions();
                log::info!("loaded {width}×{height} image from {}", path.display());
            }
        }
        Err(e) => {
            log::error!("failed to open {}: {e}", path.display());
            state.error = Some(e.to_string());
        }
    }
}
