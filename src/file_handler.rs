use eframe::egui;

use crate::image_loader::ImageSource;

/// An image file dropped onto the window, ready to be loaded.
#[derive(Debug, Clone)]
pub struct DroppedImage {
    pub label: String,
    pub source: ImageSource,
}

/// Turns files dropped onto the window into image sources.
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// The last supported image among the files dropped this frame, if any.
    ///
    /// Only one image can be annotated at a time, so earlier files in a
    /// multi-file drop are skipped.
    pub fn take_dropped_image(&self, ctx: &egui::Context) -> Option<DroppedImage> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.len() > 1 {
            log::info!("{} files dropped, using the last image", dropped.len());
        }

        dropped.iter().rev().find_map(|file| self.to_dropped_image(file))
    }

    fn to_dropped_image(&self, file: &egui::DroppedFile) -> Option<DroppedImage> {
        let label = if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        };

        if !is_image_file(file) {
            log::warn!("Dropped file is not a supported type: {label}");
            return None;
        }

        let source = if let Some(bytes) = &file.bytes {
            ImageSource::Bytes(bytes.clone())
        } else if let Some(path) = &file.path {
            ImageSource::Path(path.clone())
        } else {
            log::warn!("Dropped file has no accessible data: {label}");
            return None;
        };

        Some(DroppedImage { label, source })
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to annotate:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }

    let name = match &file.path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => file.name.clone(),
    };
    has_image_extension(&name)
}

fn has_image_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}
