use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditorError, EditorResult};
use crate::geometry::Point;

/// Minimum number of vertices in a finished polygon.
pub const MIN_POINTS: usize = 3;

/// Stable identity of a finished shape, used to key cached fill textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Straight (unpremultiplied) colour with 8-bit channels and a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn to_color32(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.alpha_u8())
    }
}

/// Supplies fill colours for newly finished shapes.
pub trait ColorSource {
    fn next_fill(&mut self, alpha: f32) -> Rgba;
}

/// Three independent uniform channels in `0..=255`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomColors;

impl ColorSource for RandomColors {
    fn next_fill(&mut self, alpha: f32) -> Rgba {
        let mut rng = rand::thread_rng();
        Rgba::rgba(rng.r#gen(), rng.r#gen(), rng.r#gen(), alpha)
    }
}

/// A finished, closed polygon. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    points: Vec<Point>,
    fill: Rgba,
    stroke: Rgba,
}

impl Shape {
    /// Build a shape from its vertices. The closing edge is implicit.
    pub fn new(points: Vec<Point>, fill: Rgba, stroke: Rgba) -> EditorResult<Self> {
        if points.len() < MIN_POINTS {
            return Err(EditorError::InsufficientPoints { count: points.len() });
        }

        Ok(Self {
            id: ShapeId::new(),
            points,
            fill,
            stroke,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn fill(&self) -> Rgba {
        self.fill
    }

    pub fn stroke(&self) -> Rgba {
        self.stroke
    }
}
