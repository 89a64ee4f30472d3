use std::time::Duration;

use crate::command::Command;
use crate::config::EditorConfig;
use crate::editor::MaskEditor;
use crate::event::{EditorEvent, EventLog, RepaintOnChange};
use crate::file_handler::FileHandler;
use crate::panels;
use crate::renderer::Renderer;

/// How often to check on a background image decode.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct MaskApp {
    pub(crate) config: EditorConfig,
    /// Last image path entered in the toolbar.
    pub(crate) image_url: String,

    #[serde(skip)]
    pub(crate) editor: MaskEditor,
    #[serde(skip)]
    pub(crate) renderer: Renderer,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    events: EventLog,
    #[serde(skip)]
    pub(crate) status: String,
    /// Message shown in a modal until dismissed.
    #[serde(skip)]
    notice: Option<String>,
}

impl Default for MaskApp {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            image_url: String::new(),
            editor: MaskEditor::default(),
            renderer: Renderer::default(),
            file_handler: FileHandler::new(),
            events: EventLog::default(),
            status: String::new(),
            notice: None,
        }
    }
}

impl MaskApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, startup_image: Option<String>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.config = std::mem::take(&mut app.config).validated_or_default();

        match EditorConfig::from_env() {
            Some(Ok(config)) => {
                log::info!("Using config from ${}", crate::config::CONFIG_ENV_VAR);
                app.config = config;
            }
            Some(Err(err)) => log::error!("Ignoring config file: {err}"),
            None => {}
        }

        app.editor = MaskEditor::new(app.config.clone());
        app.renderer = Renderer::new(app.config.style.clone());
        app.editor
            .subscribe(Box::new(RepaintOnChange::new(cc.egui_ctx.clone())));
        app.editor.subscribe(Box::new(app.events.clone()));

        if let Some(url) = startup_image {
            app.image_url = url;
            app.editor.load_image(&app.image_url);
        }

        app
    }

    pub fn editor(&self) -> &MaskEditor {
        &self.editor
    }

    /// The current mask blob, for whoever ships it alongside the video.
    pub fn encoded_mask(&self) -> String {
        self.editor.encoded_mask()
    }

    fn execute(&mut self, command: Command) {
        let name = command.name();
        match self.editor.execute(command) {
            Ok(()) => {}
            Err(err) if err.is_user_facing() => {
                log::info!("{name} rejected: {err}");
                self.notice = Some(err.to_string());
            }
            Err(err) => log::debug!("{name} ignored: {err}"),
        }
    }

    fn absorb_events(&mut self) {
        for event in self.events.drain() {
            if let EditorEvent::ImageLoadFailed { .. } = &event {
                self.notice = Some(event.to_string());
            }
            self.status = event.to_string();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.notice else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for MaskApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.editor.poll_image_load();
        if self.editor.is_loading() {
            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
        }

        if let Some(dropped) = self.file_handler.take_dropped_image(ctx) {
            self.image_url = dropped.label.clone();
            self.editor.load_image_source(&dropped.label, dropped.source);
        }
        self.file_handler.preview_files_being_dropped(ctx);

        let mut commands = panels::tools_panel(self, ctx);
        panels::status_panel(self, ctx);
        commands.extend(panels::central_panel(self, ctx));

        for command in commands {
            self.execute(command);
        }

        self.absorb_events();
        self.show_notice(ctx);
    }
}
