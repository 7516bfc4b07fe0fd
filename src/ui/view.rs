use eframe::egui::{TextureHandle, Ui, Vec2};
use egui_plot::{Plot, PlotImage, PlotPoint};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Image view (central panel)
// ---------------------------------------------------------------------------

/// Render the pan/zoom image view in the central panel.
///
/// The image is drawn as a plot item so panning (drag), zooming (scroll,
/// boxed zoom), and double-click-to-reset come from the plot widget.
pub fn image_view(ui: &mut Ui, state: &AppState, texture: Option<&TextureHandle>) {
    let Some(image) = &state.image else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a FITS file to view its image  (File → Open FITS File)");
        });
        return;
    };

    let Some(texture) = texture else {
        return;
    };

    let (width, height) = image.dimensions();
    let center = PlotPoint::new(width as f64 / 2.0, height as f64 / 2.0);
    let size = Vec2::new(width as f32, height as f32);

    Plot::new("image_view")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(texture, center, size));
        });
}
