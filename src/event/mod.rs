mod bus;
mod events;

pub use bus::{EventBus, EventLog};
pub use events::EditorEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

/// Asks egui for a new frame whenever the editor changes.
pub struct RepaintOnChange {
    ctx: egui::Context,
}

impl RepaintOnChange {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl EventHandler for RepaintOnChange {
    fn handle_event(&mut self, _event: &EditorEvent) {
        self.ctx.request_repaint();
    }
}
