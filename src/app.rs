use std::path::PathBuf;

use eframe::egui::{
    self, ColorImage, Key, KeyboardShortcut, Modifiers, TextureHandle, TextureOptions,
    ViewportCommand,
};

use crate::state::AppState;
use crate::ui::{panels, view};

pub const OPEN_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
pub const QUIT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FitsViewerApp {
    pub state: AppState,

    /// Grayscale texture of the current image at the current levels.
    texture: Option<TextureHandle>,
    /// State revision the texture was built from.
    texture_revision: u64,

    /// Title last sent to the viewport.
    applied_title: String,
}

impl FitsViewerApp {
    pub fn new(initial_file: Option<PathBuf>) -> Self {
        let mut state = AppState::default();
        if let Some(path) = initial_file {
            panels::open_path(&mut state, &path);
        }
        Self {
            state,
            texture: None,
            texture_revision: 0,
            // Matches the window name passed to run_native.
            applied_title: "FITS Viewer".to_string(),
        }
    }

    /// Re-upload the display texture when the image or levels changed.
    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture_revision == self.state.revision {
            return;
        }
        self.texture = self.state.image.as_ref().map(|image| {
            let (black, white) = self.state.levels;
            let gray = image.to_gray(black, white);
            let color_image = ColorImage::from_gray([image.width, image.height], &gray);
            ctx.load_texture("fits_image", color_image, TextureOptions::NEAREST)
        });
        self.texture_revision = self.state.revision;
    }

    fn apply_title(&mut self, ctx: &egui::Context) {
        let title = self.state.title();
        if self.applied_title != title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.applied_title = title;
        }
    }

    fn error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.error.clone() else {
            return;
        };
        let modal = egui::Modal::new(egui::Id::new("error_dialog")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.heading("Error");
            ui.separator();
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                self.state.error = None;
            }
        });
        if modal.should_close() {
            self.state.error = None;
        }
    }
}

impl eframe::App for FitsViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Keyboard shortcuts ----
        if ctx.input_mut(|i| i.consume_shortcut(&OPEN_SHORTCUT)) {
            panels::open_file_dialog(&mut self.state);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&QUIT_SHORTCUT)) {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }

        self.apply_title(ctx);
        self.ensure_texture(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: display controls ----
        egui::SidePanel::left("display_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: image view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            view::image_view(ui, &self.state, self.texture.as_ref());
        });

        // ---- Modal error dialog ----
        self.error_dialog(ctx);
    }
}
