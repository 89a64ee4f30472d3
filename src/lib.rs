#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod encoding;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod image_loader;
pub mod panels;
pub mod renderer;
pub mod shape;
pub mod state;
pub mod surface;
pub mod texture_manager;

pub use app::MaskApp;
pub use command::Command;
pub use config::{EditorConfig, RenderStyle};
pub use editor::{ClickOutcome, MaskEditor};
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventHandler, EventLog};
pub use geometry::Point;
pub use renderer::Renderer;
pub use shape::{ColorSource, Rgba, Shape, ShapeId};
pub use state::{EditorState, Mode};
pub use surface::{DecodedImage, ImageSurface};
