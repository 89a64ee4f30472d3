use log::debug;

use crate::encoding;
use crate::shape::Shape;

/// Finished shapes plus their encoded lines, kept index-aligned.
///
/// Line `n` always encodes shape `n`. Both vectors are only ever mutated
/// together, so deleting from the middle cannot shift one out of step with
/// the other.
#[derive(Debug, Default, Clone)]
pub struct MaskDocument {
    shapes: Vec<Shape>,
    lines: Vec<String>,
}

impl MaskDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape together with its pre-encoded line. Returns the new index.
    pub fn push(&mut self, shape: Shape, line: String) -> usize {
        self.shapes.push(shape);
        self.lines.push(line);
        debug!("Document now holds {} shapes", self.shapes.len());
        self.shapes.len() - 1
    }

    /// Remove the shape at `index` and its line.
    pub fn remove(&mut self, index: usize) -> Option<(Shape, String)> {
        if index >= self.shapes.len() {
            return None;
        }
        let shape = self.shapes.remove(index);
        let line = self.lines.remove(index);
        Some((shape, line))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.lines.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The mask blob, empty when there are no shapes.
    pub fn encoded(&self) -> String {
        encoding::join(&self.lines)
    }
}
