//! Interaction state of the mask editor.
//!
//! ```text
//!            start_drawing()            start_drawing()
//!   ┌──────┐ ─────────────────► ┌─────────┐ ◄──┐ (discards unfinished points)
//!   │ Idle │                    │ Drawing │ ───┘
//!   └──────┘ ◄───────────────── └─────────┘
//!      ▲     finish_drawing()        │
//!      │     (≥ 3 points)            │
//!      └──────── load_image() ◄──────┘
//! ```
//!
//! Clicks in `Idle` select shapes; clicks in `Drawing` append vertices.
use crate::geometry::Point;

/// State without its payload, for events and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Drawing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Idle,
    /// Accumulating the vertices of a new polygon.
    Drawing { points: Vec<Point> },
}

impl EditorState {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Idle => Mode::Idle,
            Self::Drawing { .. } => Mode::Drawing,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Vertices of the polygon being drawn; empty when idle.
    pub fn in_progress(&self) -> &[Point] {
        match self {
            Self::Drawing { points } => points,
            Self::Idle => &[],
        }
    }

    pub(crate) fn in_progress_mut(&mut self) -> Option<&mut Vec<Point>> {
        match self {
            Self::Drawing { points } => Some(points),
            Self::Idle => None,
        }
    }
}
