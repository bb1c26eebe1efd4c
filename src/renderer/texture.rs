use crossbeam::channel::{self, Receiver};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load texture '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture '{0}' has zero size")]
    Empty(String),
}

/// Decoded RGBA8 pixels ready for upload.
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// 1x1 texture of a single color.
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            data: color.to_vec(),
            width: 1,
            height: 1,
        }
    }
}

/// Decodes one image off the UI thread.
///
/// `notify` runs on the worker once the outcome is known, success or not, so
/// the event loop can wake up and poll `try_recv`. A failed load only records
/// the error; nothing is retried.
pub struct TextureLoader {
    rx: Receiver<TextureData>,
    last_error: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl TextureLoader {
    pub fn spawn(path: PathBuf, notify: impl FnOnce() + Send + 'static) -> Self {
        let (tx, rx) = channel::bounded::<TextureData>(1);
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);

        let thread_handle = thread::spawn(move || {
            match TextureData::load(&path) {
                Ok(texture) => {
                    log::info!(
                        "Decoded texture {} ({}x{})",
                        path.display(),
                        texture.width,
                        texture.height
                    );
                    let _ = tx.send(texture);
                }
                Err(e) => {
                    log::warn!("{}, surface stays untextured", e);
                    *last_error_clone.lock() = Some(e.to_string());
                }
            }
            drop(tx);
            notify();
        });

        Self {
            rx,
            last_error,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn try_recv(&self) -> Option<TextureData> {
        self.rx.try_recv().ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("revolve3d-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_solid() {
        let tex = TextureData::solid([255, 255, 255, 255]);
        assert_eq!((tex.width, tex.height), (1, 1));
        assert_eq!(tex.data, vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TextureData::load(Path::new("/nonexistent/planks.jpg"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/planks.jpg"));
    }

    #[test]
    fn test_loader_records_failure() {
        let (done_tx, done_rx) = channel::bounded(1);
        let loader = TextureLoader::spawn(temp_path("missing.png"), move || {
            let _ = done_tx.send(());
        });

        done_rx.recv().unwrap();
        assert!(loader.rx.recv().is_err());
        assert!(loader.try_recv().is_none());
        assert!(loader.last_error().is_some());
    }

    #[test]
    fn test_loader_delivers_pixels() {
        let path = temp_path("checker.png");
        let mut img = image::RgbaImage::new(2, 3);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let (done_tx, done_rx) = channel::bounded(1);
        let loader = TextureLoader::spawn(path.clone(), move || {
            let _ = done_tx.send(());
        });
        done_rx.recv().unwrap();

        let tex = loader.try_recv().unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.data.len(), 2 * 3 * 4);
        assert_eq!(&tex.data[(2 * 2 + 1) * 4..], &[10, 20, 30, 255]);
        assert!(loader.last_error().is_none());

        let _ = std::fs::remove_file(path);
    }
}
