use crate::MaskApp;
use crate::command::Command;

pub fn tools_panel(app: &mut MaskApp, ctx: &egui::Context) -> Vec<Command> {
    let mut commands = Vec::new();

    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let drawing = app.editor.is_drawing();

            if ui.selectable_label(drawing, "✏ Draw").clicked() {
                commands.push(Command::StartDrawing);
            }
            if ui.button("✔ Finish").clicked() {
                commands.push(Command::FinishDrawing);
            }
            if ui.button("🗑 Delete").clicked() {
                commands.push(Command::DeleteSelected);
            }

            ui.separator();

            ui.label("Image:");
            let field = ui.add(
                egui::TextEdit::singleline(&mut app.image_url)
                    .hint_text("path or URL")
                    .desired_width(280.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                let url = app.image_url.trim().to_owned();
                if !url.is_empty() {
                    commands.push(Command::LoadImage(url));
                }
            }

            ui.separator();

            let mask = app.editor.encoded_mask();
            if ui
                .add_enabled(!mask.is_empty(), egui::Button::new("📋 Copy mask"))
                .clicked()
            {
                log::info!("Copied mask with {} shapes", app.editor.shapes().len());
                ctx.copy_text(mask);
            }
        });
        ui.add_space(4.0);
    });

    commands
}
