//! Background decoding of images named by a URL string.

use std::path::PathBuf;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use futures::channel::oneshot;
use url::Url;

use crate::error::{EditorError, EditorResult};
use crate::surface::DecodedImage;

/// Where image bytes come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
    /// An `http` or `https` URL, fetched when the load starts.
    Remote(Url),
}

impl ImageSource {
    /// Resolve a URL string.
    ///
    /// Bare paths, `file://`, `http(s)://` and base64 `data:` URLs are accepted.
    pub fn parse(url: &str) -> EditorResult<Self> {
        let unsupported = || EditorError::UnsupportedSource(url.to_owned());

        match Url::parse(url) {
            // Single-letter schemes are Windows drive letters ("C:\frames\a.png").
            Ok(parsed) if parsed.scheme().len() > 1 => match parsed.scheme() {
                "file" => file_url_to_path(&parsed)
                    .map(Self::Path)
                    .ok_or_else(unsupported),
                "http" | "https" => Ok(Self::Remote(parsed)),
                "data" => decode_data_url(url)?
                    .map(Self::Bytes)
                    .ok_or_else(unsupported),
                _ => Err(unsupported()),
            },
            _ if url.trim().is_empty() => Err(unsupported()),
            _ => Ok(Self::Path(PathBuf::from(url))),
        }
    }
}

/// Payload of a `data:[image/*];base64,...` URL.
///
/// `Ok(None)` for data URLs that are not base64 or not images.
fn decode_data_url(url: &str) -> EditorResult<Option<Arc<[u8]>>> {
    let Some((_, rest)) = url.split_once(':') else {
        return Ok(None);
    };
    let Some((meta, payload)) = rest.split_once(',') else {
        return Ok(None);
    };
    let Some(media_type) = meta.strip_suffix(";base64") else {
        return Ok(None);
    };
    if !media_type.is_empty() && !media_type.starts_with("image/") {
        return Ok(None);
    }

    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    Ok(Some(bytes.into()))
}

#[cfg(not(target_arch = "wasm32"))]
fn file_url_to_path(url: &Url) -> Option<PathBuf> {
    url.to_file_path().ok()
}

#[cfg(target_arch = "wasm32")]
fn file_url_to_path(_url: &Url) -> Option<PathBuf> {
    None
}

fn read_file(path: PathBuf, max_width: u32) -> EditorResult<DecodedImage> {
    let bytes = std::fs::read(&path).map_err(|source| EditorError::ImageRead { path, source })?;
    DecodedImage::from_bytes(&bytes, max_width)
}

fn response_bytes(url: &Url, response: ehttp::Result<ehttp::Response>) -> EditorResult<Vec<u8>> {
    let response = response.map_err(|reason| fetch_error(url, reason))?;
    if !response.ok {
        return Err(fetch_error(
            url,
            format!("HTTP {} {}", response.status, response.status_text),
        ));
    }
    Ok(response.bytes)
}

fn fetch_error(url: &Url, reason: String) -> EditorError {
    EditorError::Fetch {
        url: url.to_string(),
        reason,
    }
}

pub type LoadReceiver = oneshot::Receiver<EditorResult<DecodedImage>>;

/// Fetch and decode `source` off the UI thread. The result arrives on the returned channel.
///
/// Dropping the receiver abandons the load; the worker's result is discarded.
pub fn spawn_load(source: ImageSource, max_width: u32) -> LoadReceiver {
    let (sender, receiver) = oneshot::channel();
    let finish = move |result: EditorResult<DecodedImage>| {
        if sender.send(result).is_err() {
            log::debug!("Image load finished after being superseded");
        }
    };

    match source {
        ImageSource::Path(path) => run_in_background(move || finish(read_file(path, max_width))),
        ImageSource::Bytes(bytes) => {
            run_in_background(move || finish(DecodedImage::from_bytes(&bytes, max_width)));
        }
        // ehttp runs the callback off the UI thread on native.
        ImageSource::Remote(url) => {
            log::debug!("Fetching {url}");
            let request = ehttp::Request::get(url.as_str());
            ehttp::fetch(request, move |response| {
                let result = response_bytes(&url, response)
                    .and_then(|bytes| DecodedImage::from_bytes(&bytes, max_width));
                finish(result);
            });
        }
    }

    receiver
}

#[cfg(not(target_arch = "wasm32"))]
fn run_in_background(job: impl FnOnce() + Send + 'static) {
    std::thread::spawn(job);
}

#[cfg(target_arch = "wasm32")]
fn run_in_background(job: impl FnOnce() + 'static) {
    wasm_bindgen_futures::spawn_local(async move { job() });
}

/// An in-flight load, owned by the editor until it completes or is replaced.
#[derive(Debug)]
pub struct PendingLoad {
    pub(crate) label: String,
    receiver: LoadReceiver,
}

impl PendingLoad {
    pub fn start(label: impl Into<String>, source: ImageSource, max_width: u32) -> Self {
        Self {
            label: label.into(),
            receiver: spawn_load(source, max_width),
        }
    }

    /// A load that fails as soon as it is polled, for sources rejected up front.
    pub fn failed(label: impl Into<String>, error: EditorError) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is alive right here, so this cannot fail.
        let _ = sender.send(Err(error));
        Self {
            label: label.into(),
            receiver,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Non-blocking check. `None` while the worker is still busy.
    pub fn poll(&mut self) -> Option<EditorResult<DecodedImage>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(EditorError::LoadCancelled)),
        }
    }

    /// Block the current thread until the worker finishes.
    pub fn wait(self) -> EditorResult<DecodedImage> {
        futures::executor::block_on(self.receiver).unwrap_or(Err(EditorError::LoadCancelled))
    }
}
