//! # Chart Viewer
//!
//! Shows a saved chart PNG in a native window. The image is decoded once at
//! startup and uploaded as a texture on the first frame; the window scales it
//! to fit while keeping the aspect ratio.

use egui::{ColorImage, TextureHandle, Vec2};
use std::path::Path;
use std::sync::Arc;

/// Initial window size, before the user resizes it.
const DEFAULT_WINDOW_SIZE: [f32; 2] = [1000.0, 700.0];

/// Viewer window state.
pub struct ChartViewer {
    image: Arc<ColorImage>,
    texture: Option<TextureHandle>,
    caption: String,
}

impl ChartViewer {
    pub fn new(image: Arc<ColorImage>, caption: String) -> Self {
        Self {
            image,
            texture: None,
            caption,
        }
    }
}

/// Load a PNG file into an egui image.
///
/// # Returns
///
/// `Err` with the decoder message if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<Arc<ColorImage>, String> {
    let img = image::open(path).map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.as_flat_samples();
    Ok(Arc::new(ColorImage::from_rgba_unmultiplied(size, pixels.as_slice())))
}

/// Largest size with the image's aspect ratio that fits in `available`.
pub fn fit_size(image: [usize; 2], available: Vec2) -> Vec2 {
    let (w, h) = (image[0] as f32, image[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (available.x / w).min(available.y / h).clamp(0.0, 1.0);
    egui::vec2(w * scale, h * scale)
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let texture = self
            .texture
            .get_or_insert_with(|| ctx.load_texture("chart", (*self.image).clone(), egui::TextureOptions::LINEAR));

        egui::TopBottomPanel::bottom("caption").show(ctx, |ui| {
            ui.label(egui::RichText::new(&self.caption).italics());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let size = fit_size(self.image.size, ui.available_size());
                ui.image((texture.id(), size));
            });
        });
    }
}

/// Open a window showing the chart at `path` and block until it is closed.
pub fn show_chart(path: &Path, title: &str) -> Result<(), String> {
    let image = load_image(path)?;
    let caption = path.display().to_string();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(DEFAULT_WINDOW_SIZE),
        ..Default::default()
    };

    log::info!("Opening viewer for {}", caption);
    eframe::run_native(
        title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(ChartViewer::new(image, caption)))),
    )
    .map_err(|e| format!("Failed to open viewer window: {}", e))
}
