//! The mask editor: image surface, shape store and interaction state machine.
//!
//! Every operation runs to completion on the owning thread. Image decoding is
//! the only asynchronous step; its result is applied by
//! [`MaskEditor::poll_image_load`] (or [`MaskEditor::wait_for_image`]).

use log::{debug, info, warn};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::document::MaskDocument;
use crate::encoding;
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::geometry::{hit_testing, Point};
use crate::image_loader::{ImageSource, PendingLoad};
use crate::shape::{ColorSource, RandomColors, Shape, MIN_POINTS};
use crate::state::EditorState;
use crate::surface::{DecodedImage, ImageSurface};

/// What a canvas click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No image is loaded yet.
    Ignored,
    /// A vertex was appended to the in-progress polygon at this index.
    PointAdded { index: usize },
    /// Hit-testing ran; this is the new selection.
    Selection(Option<usize>),
}

pub struct MaskEditor {
    config: EditorConfig,
    state: EditorState,
    document: MaskDocument,
    selection: Option<usize>,
    surface: Option<ImageSurface>,
    pending: Option<PendingLoad>,
    last_load_error: Option<EditorError>,
    generation: u64,
    colors: Box<dyn ColorSource>,
    event_bus: EventBus,
}

impl std::fmt::Debug for MaskEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskEditor")
            .field("state", &self.state)
            .field("shapes", &self.document.len())
            .field("selection", &self.selection)
            .field("surface", &self.surface)
            .field("pending", &self.pending.as_ref().map(PendingLoad::label))
            .finish_non_exhaustive()
    }
}

impl Default for MaskEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl MaskEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            state: EditorState::Idle,
            document: MaskDocument::new(),
            selection: None,
            surface: None,
            pending: None,
            last_load_error: None,
            generation: 0,
            colors: Box::new(RandomColors),
            event_bus: EventBus::new(),
        }
    }

    /// Replace the source of fill colours for new shapes.
    pub fn with_color_source(mut self, colors: Box<dyn ColorSource>) -> Self {
        self.colors = colors;
        self
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Image surface

    /// Start loading the image at `url`. Returns immediately.
    ///
    /// Once decoding completes, the image becomes current and every shape,
    /// the in-progress polygon and the selection are discarded. A load that
    /// fails keeps the current image and shapes; the error is available from
    /// [`Self::last_load_error`]. A newer call supersedes a pending one.
    pub fn load_image(&mut self, url: &str) {
        let pending = match ImageSource::parse(url) {
            Ok(source) => PendingLoad::start(url, source, self.config.max_width),
            Err(err) => PendingLoad::failed(url, err),
        };
        self.begin_load(pending);
    }

    /// Like [`Self::load_image`] for an already resolved source, such as dropped file bytes.
    pub fn load_image_source(&mut self, label: &str, source: ImageSource) {
        let pending = PendingLoad::start(label, source, self.config.max_width);
        self.begin_load(pending);
    }

    fn begin_load(&mut self, pending: PendingLoad) {
        info!("Loading image: {}", pending.label());
        if let Some(previous) = self.pending.replace(pending) {
            debug!("Superseded pending load of {}", previous.label());
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a finished load, if any. Returns true when the editor changed.
    pub fn poll_image_load(&mut self) -> bool {
        let Some(result) = self.pending.as_mut().and_then(PendingLoad::poll) else {
            return false;
        };
        let label = self
            .pending
            .take()
            .map(|pending| pending.label)
            .unwrap_or_default();
        self.complete_load(label, result);
        true
    }

    /// Block until the pending load finishes and apply it. Returns false if nothing was pending.
    pub fn wait_for_image(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let label = pending.label.clone();
        let result = pending.wait();
        self.complete_load(label, result);
        true
    }

    fn complete_load(&mut self, label: String, result: EditorResult<DecodedImage>) {
        match result {
            Ok(image) => self.install_image(label, image),
            Err(err) => {
                warn!("Failed to load image {label}: {err}");
                self.event_bus.emit(EditorEvent::ImageLoadFailed {
                    label,
                    reason: err.to_string(),
                });
                self.last_load_error = Some(err);
            }
        }
    }

    /// Make a decoded image current, resetting all annotation state.
    pub fn load_decoded(&mut self, image: DecodedImage) {
        self.install_image("image".to_owned(), image);
    }

    fn install_image(&mut self, label: String, image: DecodedImage) {
        let old_mode = self.state.mode();
        let old_selection = self.selection.take();

        self.document.clear();
        self.state = EditorState::Idle;
        self.last_load_error = None;
        self.generation += 1;

        let surface = ImageSurface::new(self.generation, image);
        let [width, height] = surface.size();
        info!(
            "Image {label} ready: {}x{} displayed at {width}x{height}",
            surface.source_size()[0],
            surface.source_size()[1]
        );
        self.surface = Some(surface);

        if old_mode != self.state.mode() {
            self.event_bus.emit(EditorEvent::StateChanged {
                old: old_mode,
                new: self.state.mode(),
            });
        }
        if old_selection.is_some() {
            self.emit_selection(old_selection);
        }
        self.event_bus.emit(EditorEvent::ImageLoaded {
            label,
            width,
            height,
        });
    }

    // ------------------------------------------------------------------
    // Interaction

    /// Enter drawing mode, discarding unfinished points and the selection.
    pub fn start_drawing(&mut self) {
        let old_mode = self.state.mode();
        let old_selection = self.selection.take();

        self.state = EditorState::Drawing { points: Vec::new() };
        debug!("Drawing started");

        if old_selection.is_some() {
            self.emit_selection(old_selection);
        }
        self.event_bus.emit(EditorEvent::StateChanged {
            old: old_mode,
            new: self.state.mode(),
        });
    }

    /// Handle a click at an image-pixel position.
    pub fn click(&mut self, point: Point) -> ClickOutcome {
        if self.surface.is_none() {
            debug!("Click ignored, no image loaded");
            return ClickOutcome::Ignored;
        }

        match self.push_point(point) {
            Ok(index) => ClickOutcome::PointAdded { index },
            Err(_) => ClickOutcome::Selection(self.select_at(point)),
        }
    }

    /// Append a vertex to the in-progress polygon.
    ///
    /// Unlike [`Self::click`] this works without an image and accepts points
    /// outside the surface.
    pub fn push_point(&mut self, point: Point) -> EditorResult<usize> {
        let points = self
            .state
            .in_progress_mut()
            .ok_or(EditorError::NotDrawing)?;
        points.push(point);
        let index = points.len() - 1;

        debug!("Point {index} at ({}, {})", point.x, point.y);
        self.event_bus.emit(EditorEvent::PointAdded { index, point });
        Ok(index)
    }

    /// Select the first shape containing `point`, or clear the selection.
    ///
    /// Selection is unavailable while drawing; the call is then a no-op.
    pub fn select_at(&mut self, point: Point) -> Option<usize> {
        if self.state.is_drawing() {
            return self.selection;
        }

        let found = hit_testing::hit_test(self.document.shapes(), point);
        if found != self.selection {
            let old = std::mem::replace(&mut self.selection, found);
            self.emit_selection(old);
        }
        found
    }

    /// Close the in-progress polygon into a new shape. Returns its index.
    pub fn finish_drawing(&mut self) -> EditorResult<usize> {
        let EditorState::Drawing { points } = &self.state else {
            return Err(EditorError::NotDrawing);
        };
        if points.len() < MIN_POINTS {
            return Err(EditorError::InsufficientPoints {
                count: points.len(),
            });
        }
        let [width, height] = self
            .surface
            .as_ref()
            .map(ImageSurface::size)
            .ok_or(EditorError::NoImage)?;

        let fill = self.colors.next_fill(self.config.fill_alpha);
        let shape = Shape::new(points.clone(), fill, self.config.style.stroke_color)?;
        let line = encoding::encode_line(self.config.class_index, shape.points(), width, height);
        let id = shape.id();

        let index = self.document.push(shape, line);
        self.state = EditorState::Idle;
        info!("Finished shape {index} ({} shapes)", self.document.len());

        self.event_bus.emit(EditorEvent::ShapeFinished { index, id });
        self.event_bus.emit(EditorEvent::StateChanged {
            old: crate::state::Mode::Drawing,
            new: self.state.mode(),
        });
        Ok(index)
    }

    /// Remove the selected shape and its encoded line.
    pub fn delete_selected(&mut self) -> EditorResult<Shape> {
        let index = self.selection.ok_or(EditorError::NoSelection)?;
        let old_selection = self.selection.take();

        let Some((shape, _line)) = self.document.remove(index) else {
            warn!("Selection {index} pointed past {} shapes", self.document.len());
            self.emit_selection(old_selection);
            return Err(EditorError::NoSelection);
        };
        info!("Deleted shape {index} ({} shapes left)", self.document.len());

        self.event_bus.emit(EditorEvent::ShapeDeleted {
            index,
            id: shape.id(),
        });
        self.emit_selection(old_selection);
        Ok(shape)
    }

    /// Apply a UI command.
    pub fn execute(&mut self, command: Command) -> EditorResult<()> {
        debug!("Executing {}", command.name());
        match command {
            Command::LoadImage(url) => self.load_image(&url),
            Command::StartDrawing => self.start_drawing(),
            Command::Click(point) => {
                self.click(point);
            }
            Command::FinishDrawing => {
                self.finish_drawing()?;
            }
            Command::DeleteSelected => {
                self.delete_selected()?;
            }
        }
        Ok(())
    }

    fn emit_selection(&self, old: Option<usize>) {
        self.event_bus.emit(EditorEvent::SelectionChanged {
            old,
            new: self.selection,
        });
    }

    // ------------------------------------------------------------------
    // Queries

    /// The mask blob: one line per shape, in shape order. Empty without shapes.
    pub fn encoded_mask(&self) -> String {
        self.document.encoded()
    }

    pub fn encoded_lines(&self) -> &[String] {
        self.document.lines()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn shapes(&self) -> &[Shape] {
        self.document.shapes()
    }

    pub fn in_progress(&self) -> &[Point] {
        self.state.in_progress()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    pub fn last_load_error(&self) -> Option<&EditorError> {
        self.last_load_error.as_ref()
    }
}
