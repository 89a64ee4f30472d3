use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine as _;
use mask_editor::image_loader::ImageSource;
use mask_editor::{EditorError, EditorEvent, EventLog, MaskEditor, Mode, Point};
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 120, 255]))
        .save(&path)
        .unwrap();
    path
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Answer a single HTTP request on a local port with `status` and `body`.
fn serve_once(status: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
    });

    format!("http://{addr}/frame.png")
}

fn load_and_wait(editor: &mut MaskEditor, url: &str) {
    editor.load_image(url);
    assert!(editor.is_loading());
    assert!(editor.wait_for_image());
    assert!(!editor.is_loading());
}

#[test]
fn test_draw_finish_and_delete_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_png(dir.path(), "a.png", 200, 200);
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, path.to_str().unwrap());
    assert_eq!(editor.surface().unwrap().size(), [200, 200]);

    editor.start_drawing();
    for (x, y) in [(0, 0), (100, 0), (50, 100)] {
        editor.click(Point::new(x, y));
    }
    editor.finish_drawing().unwrap();

    assert_eq!(editor.shapes().len(), 1);
    assert!(editor.encoded_mask().starts_with("0 "));
    assert_eq!(
        editor.encoded_mask(),
        "0 0.000000 0.000000 0.500000 0.000000 0.250000 0.500000"
    );

    assert!(matches!(editor.delete_selected(), Err(EditorError::NoSelection)));
    assert_eq!(editor.shapes().len(), 1);
}

#[test]
fn test_wide_image_is_scaled_to_max_width() {
    let dir = TempDir::new().unwrap();
    let path = write_png(dir.path(), "wide.png", 1600, 900);
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, path.to_str().unwrap());

    let surface = editor.surface().unwrap();
    assert_eq!(surface.source_size(), [1600, 900]);
    assert_eq!(surface.size(), [800, 450]);
    assert_eq!(surface.pixels().size, [800, 450]);

    // Coordinates are normalised against the displayed size.
    editor.start_drawing();
    for (x, y) in [(0, 0), (800, 0), (400, 450)] {
        editor.click(Point::new(x, y));
    }
    editor.finish_drawing().unwrap();
    assert_eq!(
        editor.encoded_mask(),
        "0 0.000000 0.000000 1.000000 0.000000 0.500000 1.000000"
    );
}

#[test]
fn test_failed_load_keeps_current_state() {
    let dir = TempDir::new().unwrap();
    let path = write_png(dir.path(), "a.png", 100, 100);
    let mut editor = MaskEditor::default();
    load_and_wait(&mut editor, path.to_str().unwrap());

    editor.start_drawing();
    for (x, y) in [(10, 10), (90, 10), (50, 90)] {
        editor.click(Point::new(x, y));
    }
    editor.finish_drawing().unwrap();
    let mask = editor.encoded_mask();

    let log = EventLog::default();
    editor.subscribe(Box::new(log.clone()));
    let missing = dir.path().join("missing.png");
    load_and_wait(&mut editor, missing.to_str().unwrap());

    assert!(matches!(
        editor.last_load_error(),
        Some(EditorError::ImageRead { path, .. }) if *path == missing
    ));
    assert_eq!(editor.encoded_mask(), mask);
    assert_eq!(editor.surface().unwrap().size(), [100, 100]);
    assert!(matches!(
        log.drain().last(),
        Some(EditorEvent::ImageLoadFailed { .. })
    ));

    // A later successful load clears the error.
    load_and_wait(&mut editor, path.to_str().unwrap());
    assert!(editor.last_load_error().is_none());
    assert!(editor.shapes().is_empty());
}

#[test]
fn test_undecodable_bytes_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, path.to_str().unwrap());

    assert!(matches!(
        editor.last_load_error(),
        Some(EditorError::ImageDecode(_))
    ));
    assert!(editor.surface().is_none());
}

#[test]
fn test_unsupported_scheme_fails_without_io() {
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, "ftp://example.com/a.png");

    assert!(matches!(
        editor.last_load_error(),
        Some(EditorError::UnsupportedSource(url)) if url == "ftp://example.com/a.png"
    ));
}

#[test]
fn test_http_image_is_fetched() {
    let url = serve_once("200 OK", png_bytes(96, 48));
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, &url);

    assert!(editor.last_load_error().is_none());
    assert_eq!(editor.surface().unwrap().size(), [96, 48]);
}

#[test]
fn test_http_error_status_is_reported() {
    let url = serve_once("404 Not Found", b"missing".to_vec());
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, &url);

    assert!(matches!(
        editor.last_load_error(),
        Some(EditorError::Fetch { reason, .. }) if reason.contains("404")
    ));
    assert!(editor.surface().is_none());
}

#[test]
fn test_data_url_is_decoded() {
    let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(12, 8));
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, &format!("data:image/png;base64,{encoded}"));

    assert_eq!(editor.surface().unwrap().size(), [12, 8]);
}

#[test]
fn test_file_url_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write_png(dir.path(), "url.png", 64, 32);
    let url = url::Url::from_file_path(&path).unwrap();
    let mut editor = MaskEditor::default();

    load_and_wait(&mut editor, url.as_str());

    assert_eq!(editor.surface().unwrap().size(), [64, 32]);
}

#[test]
fn test_newer_load_supersedes_pending() {
    let dir = TempDir::new().unwrap();
    let first = write_png(dir.path(), "first.png", 300, 100);
    let second = write_png(dir.path(), "second.png", 120, 60);
    let mut editor = MaskEditor::default();

    editor.load_image(first.to_str().unwrap());
    editor.load_image(second.to_str().unwrap());
    assert!(editor.wait_for_image());

    assert_eq!(editor.surface().unwrap().size(), [120, 60]);
    assert!(!editor.wait_for_image());
}

#[test]
fn test_polling_applies_load_and_resets_editor() {
    let dir = TempDir::new().unwrap();
    let path = write_png(dir.path(), "poll.png", 50, 40);
    let mut editor = MaskEditor::default();
    let log = EventLog::default();
    editor.subscribe(Box::new(log.clone()));

    editor.load_decoded(mask_editor::DecodedImage::from_rgba(
        image::RgbaImage::new(10, 10),
        800,
    ));
    editor.start_drawing();
    editor.click(Point::new(1, 1));

    editor.load_image(path.to_str().unwrap());
    let deadline = Instant::now() + Duration::from_secs(10);
    while !editor.poll_image_load() {
        assert!(Instant::now() < deadline, "image load timed out");
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(editor.surface().unwrap().size(), [50, 40]);
    assert_eq!(editor.state().mode(), Mode::Idle);
    assert!(editor.in_progress().is_empty());
    assert!(!editor.poll_image_load());

    let events = log.drain();
    assert!(events.contains(&EditorEvent::StateChanged {
        old: Mode::Drawing,
        new: Mode::Idle,
    }));
    assert_eq!(
        events.last(),
        Some(&EditorEvent::ImageLoaded {
            label: path.to_str().unwrap().to_owned(),
            width: 50,
            height: 40,
        })
    );
}

#[test]
fn test_dropped_bytes_load_like_files() {
    let dir = TempDir::new().unwrap();
    let path = write_png(dir.path(), "dropped.png", 30, 20);
    let bytes: Arc<[u8]> = std::fs::read(&path).unwrap().into();
    let mut editor = MaskEditor::default();

    editor.load_image_source("dropped.png", ImageSource::Bytes(bytes));
    assert!(editor.wait_for_image());

    assert_eq!(editor.surface().unwrap().size(), [30, 20]);
}
