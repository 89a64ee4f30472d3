use crate::geometry::Point;

/// User-level actions, produced by the UI panels and applied by
/// [`MaskEditor::execute`](crate::MaskEditor::execute).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Begin loading a new image, replacing all annotation state once decoded.
    LoadImage(String),
    StartDrawing,
    /// A click on the canvas, already converted to image pixels.
    Click(Point),
    FinishDrawing,
    DeleteSelected,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadImage(_) => "Load Image",
            Self::StartDrawing => "Draw",
            Self::Click(_) => "Click",
            Self::FinishDrawing => "Finish",
            Self::DeleteSelected => "Delete",
        }
    }
}
