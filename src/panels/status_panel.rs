use crate::MaskApp;
use crate::state::Mode;

pub fn status_panel(app: &mut MaskApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let mode = match app.editor.state().mode() {
                Mode::Idle => "Select",
                Mode::Drawing => "Drawing",
            };
            ui.strong(mode);
            ui.separator();
            ui.label(format!("Shapes: {}", app.editor.shapes().len()));
            if app.editor.is_drawing() {
                ui.label(format!("Points: {}", app.editor.in_progress().len()));
            }
            if let Some(index) = app.editor.selection() {
                ui.label(format!("Selected: {}", index + 1));
            }
            ui.separator();
            ui.label(app.status.as_str());
        });

        egui::CollapsingHeader::new("Encoded mask")
            .default_open(false)
            .show(ui, |ui| {
                egui::ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                    if app.editor.encoded_lines().is_empty() {
                        ui.weak("No shapes yet");
                    }
                    for (index, line) in app.editor.encoded_lines().iter().enumerate() {
                        ui.monospace(format!("{:>3}  {line}", index + 1));
                    }
                });
            });
    });
}
