use egui::ColorImage;
use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::EditorResult;

/// Size at which an image of `source` pixels is displayed.
///
/// Images no wider than `max_width` keep their size. Wider ones are scaled
/// down so the width is exactly `max_width`, with the height truncated to a
/// whole pixel (never below one).
pub fn display_size(source: [u32; 2], max_width: u32) -> [u32; 2] {
    let [width, height] = source;
    if width <= max_width {
        return source;
    }

    let scaled_height = (height as f64 * max_width as f64 / width as f64).floor() as u32;
    [max_width, scaled_height.max(1)]
}

/// A decoded image, already resampled to its display size.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub source_size: [u32; 2],
    pub pixels: RgbaImage,
}

impl DecodedImage {
    /// Resample `rgba` to fit within `max_width`.
    pub fn from_rgba(rgba: RgbaImage, max_width: u32) -> Self {
        let source_size = [rgba.width(), rgba.height()];
        let [width, height] = display_size(source_size, max_width);

        let pixels = if [width, height] == source_size {
            rgba
        } else {
            image::imageops::resize(&rgba, width, height, FilterType::Triangle)
        };

        Self { source_size, pixels }
    }

    /// Decode an encoded image (PNG, JPEG, ...) held in memory.
    pub fn from_bytes(bytes: &[u8], max_width: u32) -> EditorResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
        Ok(Self::from_rgba(decoded.to_rgba8(), max_width))
    }

    pub fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }
}

/// The raster currently shown under the shapes.
#[derive(Clone)]
pub struct ImageSurface {
    generation: u64,
    source_size: [u32; 2],
    size: [u32; 2],
    pixels: ColorImage,
}

impl std::fmt::Debug for ImageSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSurface")
            .field("generation", &self.generation)
            .field("source_size", &self.source_size)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl ImageSurface {
    pub(crate) fn new(generation: u64, image: DecodedImage) -> Self {
        let size = image.size();
        let pixels = ColorImage::from_rgba_unmultiplied(
            [size[0] as usize, size[1] as usize],
            image.pixels.as_raw(),
        );

        Self {
            generation,
            source_size: image.source_size,
            size,
            pixels,
        }
    }

    /// Increases with every image that becomes current.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source_size(&self) -> [u32; 2] {
        self.source_size
    }

    /// Pixel dimensions of the drawing surface.
    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn pixels(&self) -> &ColorImage {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_images_keep_their_size() {
        assert_eq!(display_size([640, 480], 800), [640, 480]);
        assert_eq!(display_size([800, 600], 800), [800, 600]);
    }

    #[test]
    fn wide_images_are_capped() {
        assert_eq!(display_size([1600, 900], 800), [800, 450]);
        assert_eq!(display_size([1920, 1080], 800), [800, 450]);
        assert_eq!(display_size([1000, 333], 800), [800, 266]);
    }

    #[test]
    fn very_flat_images_keep_one_row() {
        assert_eq!(display_size([10_000, 2], 800), [800, 1]);
    }

    #[test]
    fn rgba_is_resampled_to_display_size() {
        let rgba = RgbaImage::from_pixel(1200, 300, image::Rgba([10, 20, 30, 255]));
        let decoded = DecodedImage::from_rgba(rgba, 800);

        assert_eq!(decoded.source_size, [1200, 300]);
        assert_eq!(decoded.size(), [800, 200]);

        let surface = ImageSurface::new(7, decoded);
        assert_eq!(surface.size(), [800, 200]);
        assert_eq!(surface.generation(), 7);
        assert_eq!(surface.pixels().size, [800, 200]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(DecodedImage::from_bytes(b"definitely not an image", 800).is_err());
    }
}
