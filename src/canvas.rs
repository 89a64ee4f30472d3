use egui::{Pos2, Rect, Vec2};

use crate::geometry::Point;

/// Maps between the on-screen canvas rectangle and surface pixel space.
///
/// The canvas may be shown smaller than the surface (when the panel is too
/// small), so pointer positions are rescaled before being rounded to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    /// Where the surface is displayed, in screen points.
    pub rect: Rect,
    /// Surface size in pixels.
    pub surface_size: Vec2,
}

impl CanvasTransform {
    pub fn new(rect: Rect, surface_size: [u32; 2]) -> Self {
        Self {
            rect,
            surface_size: Vec2::new(surface_size[0] as f32, surface_size[1] as f32),
        }
    }

    /// Place a surface inside `available`, shrinking to fit but never enlarging.
    pub fn fit(available: Rect, surface_size: [u32; 2]) -> Self {
        let size = Vec2::new(surface_size[0] as f32, surface_size[1] as f32);
        let scale = if size.x > 0.0 && size.y > 0.0 {
            (available.width() / size.x)
                .min(available.height() / size.y)
                .clamp(f32::EPSILON, 1.0)
        } else {
            1.0
        };

        Self {
            rect: Rect::from_min_size(available.min, size * scale),
            surface_size: size,
        }
    }

    /// Screen points per surface pixel along each axis.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.rect.width() / self.surface_size.x,
            self.rect.height() / self.surface_size.y,
        )
    }

    /// Convert a pointer position to the nearest surface pixel.
    pub fn to_image(&self, pos: Pos2) -> Point {
        let offset = pos - self.rect.min;
        let x = offset.x * (self.surface_size.x / self.rect.width());
        let y = offset.y * (self.surface_size.y / self.rect.height());
        Point::new(x.round() as i32, y.round() as i32)
    }

    /// Convert a surface position to screen space.
    pub fn to_screen(&self, point: Point) -> Pos2 {
        let scale = self.scale();
        self.rect.min + Vec2::new(point.x as f32 * scale.x, point.y as f32 * scale.y)
    }

    /// Screen rectangle covering a span of surface pixels.
    pub fn rect_to_screen(&self, min: Point, size: [u32; 2]) -> Rect {
        let scale = self.scale();
        Rect::from_min_size(
            self.to_screen(min),
            Vec2::new(size[0] as f32 * scale.x, size[1] as f32 * scale.y),
        )
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect.contains(pos)
    }
}
