#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // Optional image to open right away, e.g. a frame grabbed from a video.
    let startup_image = std::env::args().nth(1);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Mask Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(mask_editor::MaskApp::new(cc, startup_image)))),
    )
}

// The web build is mounted by the host page through `eframe::WebRunner`.
#[cfg(target_arch = "wasm32")]
fn main() {}
