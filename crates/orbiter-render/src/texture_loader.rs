//! Background image decoding for body textures.
//!
//! Decoding a large Earth map takes long enough to stall a frame, so
//! [`TextureLoader`] runs it on a worker thread and hands finished images
//! back through a channel. Each request is stamped with the loader's current
//! generation; [`TextureLoader::cancel_all`] bumps the generation so results
//! belonging to a lost GPU context are discarded instead of being uploaded
//! into the new one.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::texture::{ImageData, TextureSlot};

#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    #[error("failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decode the image at `path` into RGBA8, flipped so the bottom row comes
/// first to match the meshes' bottom-left texture origin.
pub fn decode_image(path: &Path) -> Result<ImageData, TextureLoadError> {
    let decoded = image::open(path).map_err(|source| TextureLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.flipv().to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

struct LoadRequest {
    slot: TextureSlot,
    path: PathBuf,
    generation: u64,
}

/// Ticket for one queued decode. Stale once the loader is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle {
    pub slot: TextureSlot,
    generation: u64,
}

/// A finished decode for the current generation.
#[derive(Debug)]
pub struct CompletedLoad {
    pub slot: TextureSlot,
    pub path: PathBuf,
    pub result: Result<ImageData, TextureLoadError>,
}

struct LoadResult {
    generation: u64,
    load: CompletedLoad,
}

/// Single worker thread decoding images off the render thread.
pub struct TextureLoader {
    task_sender: Option<crossbeam_channel::Sender<LoadRequest>>,
    result_receiver: crossbeam_channel::Receiver<LoadResult>,
    worker: Option<JoinHandle<()>>,
    generation: u64,
    pending: usize,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader {
    pub fn new() -> Self {
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<LoadRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let worker = std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                while let Ok(request) = task_rx.recv() {
                    let result = decode_image(&request.path);
                    let _ = result_tx.send(LoadResult {
                        generation: request.generation,
                        load: CompletedLoad {
                            slot: request.slot,
                            path: request.path,
                            result,
                        },
                    });
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Could not spawn texture loader thread: {e}");
                None
            }
        };

        Self {
            task_sender: worker.as_ref().map(|_| task_tx),
            result_receiver: result_rx,
            worker,
            generation: 0,
            pending: 0,
        }
    }

    /// Queue a decode of `path` for `slot`. Returns `None` if the worker is
    /// gone.
    pub fn request(
        &mut self,
        slot: TextureSlot,
        path: impl Into<PathBuf>,
    ) -> Option<TextureHandle> {
        let sender = self.task_sender.as_ref()?;
        let path = path.into();
        log::debug!("Requesting {} texture from {}", slot.label(), path.display());
        let sent = sender
            .send(LoadRequest {
                slot,
                path,
                generation: self.generation,
            })
            .is_ok();
        if !sent {
            return None;
        }
        self.pending += 1;
        Some(TextureHandle {
            slot,
            generation: self.generation,
        })
    }

    /// Whether `handle`'s result would still be delivered.
    pub fn is_current(&self, handle: &TextureHandle) -> bool {
        handle.generation == self.generation
    }

    /// Forget every outstanding request. Their results are dropped on arrival.
    pub fn cancel_all(&mut self) {
        if self.pending > 0 {
            log::info!("Cancelling {} pending texture loads", self.pending);
        }
        self.generation += 1;
        self.pending = 0;
    }

    /// Completed loads for the current generation. Never blocks.
    pub fn drain_completed(&mut self) -> Vec<CompletedLoad> {
        let mut completed = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            if result.generation != self.generation {
                continue;
            }
            self.pending = self.pending.saturating_sub(1);
            completed.push(result.load);
        }
        completed
    }

    /// Requests of the current generation not yet drained.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn write_test_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();
        path
    }

    fn drain_until(loader: &mut TextureLoader, count: usize) -> Vec<CompletedLoad> {
        let start = Instant::now();
        let mut done = Vec::new();
        while done.len() < count && start.elapsed() < Duration::from_secs(5) {
            done.extend(loader.drain_completed());
            std::thread::sleep(Duration::from_millis(5));
        }
        done
    }

    #[test]
    fn test_decode_flips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "flip.png");
        let image = decode_image(&path).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        // The original bottom-left pixel is now first.
        assert_eq!(&image.pixels[0..4], &[0, 0, 255, 255]);
        assert_eq!(&image.pixels[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_image(&dir.path().join("absent.png"));
        assert!(matches!(result, Err(TextureLoadError::Decode { .. })));
    }

    #[test]
    fn test_loader_delivers_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "earth.png");
        let mut loader = TextureLoader::new();
        let handle = loader.request(TextureSlot::Earth, &path).unwrap();
        assert_eq!(handle.slot, TextureSlot::Earth);
        assert!(loader.is_current(&handle));
        assert_eq!(loader.pending(), 1);

        let done = drain_until(&mut loader, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].slot, TextureSlot::Earth);
        assert!(done[0].result.is_ok());
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_cancelled_results_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let stale = write_test_png(dir.path(), "stale.png");
        let fresh = write_test_png(dir.path(), "fresh.png");
        let mut loader = TextureLoader::new();

        let stale_handle = loader.request(TextureSlot::SatellitePrimary, &stale).unwrap();
        loader.cancel_all();
        assert!(!loader.is_current(&stale_handle));
        assert_eq!(loader.pending(), 0);
        loader.request(TextureSlot::SatelliteSecondary, &fresh);

        let done = drain_until(&mut loader, 1);
        std::thread::sleep(Duration::from_millis(50));
        let late = loader.drain_completed();
        assert_eq!(done.len() + late.len(), 1);
        assert_eq!(done[0].slot, TextureSlot::SatelliteSecondary);
    }

    #[test]
    fn test_request_after_shutdown_returns_none() {
        let mut loader = TextureLoader::new();
        loader.shutdown();
        assert!(loader.request(TextureSlot::Earth, "earth.png").is_none());
    }

    #[test]
    fn test_failed_decode_reported_not_panicked() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not an image").unwrap();
        let mut loader = TextureLoader::new();
        loader.request(TextureSlot::Earth, &bad);
        let done = drain_until(&mut loader, 1);
        assert!(done[0].result.is_err());
    }
}
