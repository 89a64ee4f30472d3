use crate::MaskApp;
use crate::canvas::CanvasTransform;
use crate::command::Command;

/// Draw the canvas. Returns a click command when the canvas was clicked.
pub fn central_panel(app: &mut MaskApp, ctx: &egui::Context) -> Option<Command> {
    egui::CentralPanel::default()
        .show(ctx, |ui| {
            let Some(surface_size) = app.editor.surface().map(|surface| surface.size()) else {
                ui.centered_and_justified(|ui| {
                    if app.editor.is_loading() {
                        ui.spinner();
                    } else {
                        ui.label("Drop an image here or enter its path above");
                    }
                });
                return None;
            };

            let transform = CanvasTransform::fit(ui.available_rect_before_wrap(), surface_size);
            let response = ui
                .allocate_rect(transform.rect, egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::Crosshair);

            let painter = ui.painter_at(transform.rect);
            app.renderer.paint(ctx, &painter, &transform, &app.editor);

            if !response.clicked() {
                return None;
            }
            response
                .interact_pointer_pos()
                .filter(|pos| transform.contains(*pos))
                .map(|pos| Command::Click(transform.to_image(pos)))
        })
        .inner
}
