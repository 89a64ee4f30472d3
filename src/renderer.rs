// src/renderer.rs
use egui::{Color32, ColorImage, Painter, Pos2, Rect, Stroke, TextureOptions};

use crate::canvas::CanvasTransform;
use crate::config::RenderStyle;
use crate::editor::MaskEditor;
use crate::geometry::{hit_testing, Bounds, Point};
use crate::shape::{Rgba, ShapeId};
use crate::texture_manager::{TextureGenerationError, TextureKey, TextureManager};

const MAX_CACHED_TEXTURES: usize = 256;

/// One drawing step, in surface pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// The current image stretched over the whole surface.
    Image { generation: u64, size: [u32; 2] },
    /// Non-zero fill of the closed path through `points`.
    Fill {
        shape: ShapeId,
        points: Vec<Point>,
        color: Rgba,
    },
    /// A polyline, closed back to its first point when `closed` is set.
    Outline {
        points: Vec<Point>,
        closed: bool,
        color: Rgba,
        width: f32,
    },
    /// Filled circular vertex marker.
    Vertex { center: Point, radius: f32, color: Rgba },
}

/// The full draw list for the editor's current state.
///
/// Order: image, then for every shape its fill, outline, selection highlight
/// (when selected) and vertex markers, then the in-progress path and its
/// markers while drawing.
pub fn compose(editor: &MaskEditor, style: &RenderStyle) -> Vec<Primitive> {
    let mut primitives = Vec::new();

    if let Some(surface) = editor.surface() {
        primitives.push(Primitive::Image {
            generation: surface.generation(),
            size: surface.size(),
        });
    }

    for (index, shape) in editor.shapes().iter().enumerate() {
        let points = shape.points().to_vec();

        primitives.push(Primitive::Fill {
            shape: shape.id(),
            points: points.clone(),
            color: shape.fill(),
        });
        primitives.push(Primitive::Outline {
            points: points.clone(),
            closed: true,
            color: shape.stroke(),
            width: style.stroke_width,
        });
        if editor.selection() == Some(index) {
            primitives.push(Primitive::Outline {
                points: points.clone(),
                closed: true,
                color: style.highlight_color,
                width: style.highlight_width,
            });
        }
        push_vertices(&mut primitives, &points, style);
    }

    let in_progress = editor.in_progress();
    if editor.is_drawing() && !in_progress.is_empty() {
        primitives.push(Primitive::Outline {
            points: in_progress.to_vec(),
            closed: false,
            color: style.path_color,
            width: style.path_width,
        });
        push_vertices(&mut primitives, in_progress, style);
    }

    primitives
}

fn push_vertices(primitives: &mut Vec<Primitive>, points: &[Point], style: &RenderStyle) {
    primitives.extend(points.iter().map(|&center| Primitive::Vertex {
        center,
        radius: style.vertex_radius,
        color: style.vertex_color,
    }));
}

/// Pixel region of a fill, clipped to the surface: top-left corner and size.
pub fn fill_region(points: &[Point], surface_size: [u32; 2]) -> Option<(Point, [u32; 2])> {
    let bounds = crate::geometry::calculate_bounds(points)?;

    let min_x = bounds.min.x.max(0);
    let min_y = bounds.min.y.max(0);
    let max_x = bounds.max.x.min(surface_size[0] as i32 - 1);
    let max_y = bounds.max.y.min(surface_size[1] as i32 - 1);
    if max_x < min_x || max_y < min_y {
        return None;
    }

    let clipped = Bounds {
        min: Point::new(min_x, min_y),
        max: Point::new(max_x, max_y),
    };
    Some((clipped.min, [clipped.width(), clipped.height()]))
}

/// Rasterize the fill of `points` over the given pixel region.
///
/// Each pixel is sampled at its centre with the same winding rule used for
/// hit-testing, so the painted area and the clickable area differ by at most
/// half a pixel along the outline.
pub fn rasterize_fill(points: &[Point], color: Rgba, origin: Point, size: [u32; 2]) -> ColorImage {
    let [width, height] = [size[0] as usize, size[1] as usize];
    let fill = color.to_color32();
    let mut image = ColorImage::new([width, height], Color32::TRANSPARENT);

    for row in 0..height {
        let py = origin.y as f64 + row as f64 + 0.5;
        for col in 0..width {
            let px = origin.x as f64 + col as f64 + 0.5;
            if hit_testing::contains_sample(points, px, py) {
                image.pixels[row * width + col] = fill;
            }
        }
    }

    image
}

#[derive(Debug)]
pub struct Renderer {
    textures: TextureManager,
    style: RenderStyle,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderStyle::default())
    }
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            textures: TextureManager::new(MAX_CACHED_TEXTURES),
            style,
        }
    }

    /// Redraw the whole canvas from the editor's current state.
    pub fn paint(
        &mut self,
        ctx: &egui::Context,
        painter: &Painter,
        transform: &CanvasTransform,
        editor: &MaskEditor,
    ) {
        self.textures.begin_frame();

        let primitives = compose(editor, &self.style);
        for primitive in &primitives {
            if let Err(err) = self.paint_primitive(ctx, painter, transform, editor, primitive) {
                log::warn!("Skipped drawing {}: {err}", primitive_name(primitive));
            }
        }

        self.drop_stale_textures(&primitives);
    }

    fn paint_primitive(
        &mut self,
        ctx: &egui::Context,
        painter: &Painter,
        transform: &CanvasTransform,
        editor: &MaskEditor,
        primitive: &Primitive,
    ) -> Result<(), TextureGenerationError> {
        let scale = transform.scale().x;
        match primitive {
            Primitive::Image { generation, .. } => {
                let surface = editor
                    .surface()
                    .ok_or(TextureGenerationError::GenerationFailed)?;
                let texture = self.textures.get_or_create_texture(
                    TextureKey::Surface(*generation),
                    TextureOptions::LINEAR,
                    || Ok(surface.pixels().clone()),
                    ctx,
                )?;
                painter.image(texture, transform.rect, full_uv(), Color32::WHITE);
            }
            Primitive::Fill {
                shape,
                points,
                color,
            } => {
                let surface_size = transform_surface_size(transform);
                let Some((origin, size)) = fill_region(points, surface_size) else {
                    return Ok(());
                };
                let texture = self.textures.get_or_create_texture(
                    TextureKey::Fill(*shape),
                    TextureOptions::NEAREST,
                    || Ok(rasterize_fill(points, *color, origin, size)),
                    ctx,
                )?;
                painter.image(
                    texture,
                    transform.rect_to_screen(origin, size),
                    full_uv(),
                    Color32::WHITE,
                );
            }
            Primitive::Outline {
                points,
                closed,
                color,
                width,
            } => {
                let screen: Vec<Pos2> = points.iter().map(|&p| transform.to_screen(p)).collect();
                let stroke = Stroke::new(width * scale, color.to_color32());
                if *closed {
                    painter.add(egui::Shape::closed_line(screen, stroke));
                } else if screen.len() > 1 {
                    painter.add(egui::Shape::line(screen, stroke));
                }
            }
            Primitive::Vertex {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(
                    transform.to_screen(*center),
                    radius * scale,
                    color.to_color32(),
                );
            }
        }
        Ok(())
    }

    fn drop_stale_textures(&mut self, primitives: &[Primitive]) {
        let live: Vec<TextureKey> = primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Image { generation, .. } => Some(TextureKey::Surface(*generation)),
                Primitive::Fill { shape, .. } => Some(TextureKey::Fill(*shape)),
                _ => None,
            })
            .collect();
        self.textures.retain(|key| live.contains(key));
    }
}

fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}

fn transform_surface_size(transform: &CanvasTransform) -> [u32; 2] {
    [
        transform.surface_size.x as u32,
        transform.surface_size.y as u32,
    ]
}

fn primitive_name(primitive: &Primitive) -> &'static str {
    match primitive {
        Primitive::Image { .. } => "image",
        Primitive::Fill { .. } => "fill",
        Primitive::Outline { .. } => "outline",
        Primitive::Vertex { .. } => "vertex",
    }
}
