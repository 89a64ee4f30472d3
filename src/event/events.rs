use crate::geometry::Point;
use crate::shape::ShapeId;
use crate::state::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ImageLoaded {
        label: String,
        width: u32,
        height: u32,
    },
    ImageLoadFailed {
        label: String,
        reason: String,
    },
    StateChanged {
        old: Mode,
        new: Mode,
    },
    PointAdded {
        index: usize,
        point: Point,
    },
    ShapeFinished {
        index: usize,
        id: ShapeId,
    },
    ShapeDeleted {
        index: usize,
        id: ShapeId,
    },
    SelectionChanged {
        old: Option<usize>,
        new: Option<usize>,
    },
}

impl std::fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImageLoaded { label, width, height } => {
                write!(f, "Loaded {label} ({width}x{height})")
            }
            Self::ImageLoadFailed { label, reason } => write!(f, "Could not load {label}: {reason}"),
            Self::StateChanged { new, .. } => write!(f, "Mode: {new:?}"),
            Self::PointAdded { index, point } => {
                write!(f, "Point {} at ({}, {})", index + 1, point.x, point.y)
            }
            Self::ShapeFinished { index, .. } => write!(f, "Added shape {}", index + 1),
            Self::ShapeDeleted { index, .. } => write!(f, "Deleted shape {}", index + 1),
            Self::SelectionChanged { new: Some(index), .. } => {
                write!(f, "Selected shape {}", index + 1)
            }
            Self::SelectionChanged { new: None, .. } => write!(f, "Selection cleared"),
        }
    }
}
