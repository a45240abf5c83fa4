//! Customization session
//!
//! Owns the texture surface and the placed-sticker list for the lifetime of
//! the window, and turns user actions into background work:
//!
//! - photo selected: upload, fetch the stored copy back, paint it centered
//! - sticker clicked: load the sticker image, paint it at the sticker rect
//! - submit: snapshot the surface as a PNG data URL and post the design
//!
//! Results are applied in `poll`, once per frame, in the order they finish.
//! Nothing is retried and nothing is cancelled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::assets::{self, AssetError};
use crate::compositor::{photo_rect, PlacedSticker, StickerKind, TextureSurface, STICKER_RECT};
use crate::config::StudioConfig;
use crate::model::{self, ModelError, MugMesh, MugModel};
use crate::net::{DesignBackend, DesignPayload, NetError, TaskQueue, UploadDesignReply, UploadImageReply};

/// Shown when the server rejects an upload without saying why
const UNKNOWN_ERROR: &str = "unknown error";

/// Severity of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// A message the user has to acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

/// Something the application shell has to react to
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The mug body finished loading; build the preview from it
    ModelReady(MugMesh),
    /// Show a blocking alert
    Alert(Alert),
}

/// Finished background work
enum Completion {
    ModelLoaded(Result<MugModel, ModelError>),
    PhotoUploaded(Result<UploadImageReply, NetError>),
    PhotoFetched {
        url: String,
        result: Result<RgbaImage, AssetError>,
    },
    StickerLoaded {
        kind: Option<StickerKind>,
        path: PathBuf,
        result: Result<RgbaImage, AssetError>,
    },
    DesignSubmitted(Result<UploadDesignReply, NetError>),
    DesignNotEncoded(image::ImageError),
}

pub struct Session {
    backend: Arc<dyn DesignBackend>,
    config: StudioConfig,
    surface: Option<TextureSurface>,
    stickers: Vec<PlacedSticker>,
    tasks: TaskQueue<Completion>,
    /// Events raised synchronously, delivered with the next poll
    outbox: Vec<SessionEvent>,
}

impl Session {
    pub fn new(backend: Arc<dyn DesignBackend>, config: StudioConfig) -> Self {
        Self {
            backend,
            config,
            surface: None,
            stickers: Vec::new(),
            tasks: TaskQueue::new(),
            outbox: Vec::new(),
        }
    }

    /// Start loading the configured mug model
    pub fn load_model(&mut self) {
        let path = self.config.model_path.clone();
        let mesh_name = self.config.mesh_name.clone();
        log::info!("Loading model {} (mesh '{}')", path.display(), mesh_name);

        self.tasks
            .spawn(move || Completion::ModelLoaded(model::load_model(&path, &mesh_name)));
    }

    /// Photo file(s) picked. Only the first one is used.
    pub fn on_photo_selected(&mut self, files: &[PathBuf]) {
        let Some(path) = files.first().cloned() else {
            return;
        };
        let backend = Arc::clone(&self.backend);

        self.tasks.spawn(move || {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());
            let result = std::fs::read(&path)
                .map_err(NetError::from)
                .and_then(|bytes| backend.upload_image(&file_name, &bytes));
            Completion::PhotoUploaded(result)
        });
    }

    /// Sticker button with the given kind attribute clicked
    pub fn on_sticker_clicked(&mut self, kind_attr: &str) {
        let kind = StickerKind::from_attr(kind_attr);
        let path = self.config.sticker_path(kind_attr);
        if kind.is_none() {
            log::debug!("Unknown sticker kind '{}'", kind_attr);
        }

        self.tasks.spawn(move || {
            let result = assets::load_image_file(&path);
            Completion::StickerLoaded { kind, path, result }
        });
    }

    /// Send the current design to the server
    pub fn on_submit(&mut self) {
        let Some(surface) = &self.surface else {
            self.outbox
                .push(SessionEvent::Alert(Alert::error("The texture has not been loaded yet")));
            return;
        };

        // Encoding happens on the worker; the clone is the snapshot
        let snapshot = surface.clone();
        let stickers = self.stickers.clone();
        log::info!("Submitting design with {} sticker(s)", stickers.len());

        let backend = Arc::clone(&self.backend);
        self.tasks.spawn(move || {
            let texture = match snapshot.to_data_url() {
                Ok(url) => url,
                Err(e) => return Completion::DesignNotEncoded(e),
            };
            let payload = DesignPayload { texture, stickers };
            Completion::DesignSubmitted(backend.upload_design(&payload))
        });
    }

    /// Apply everything that finished since the last call
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        for completion in self.tasks.drain() {
            self.apply(completion);
        }
        std::mem::take(&mut self.outbox)
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::ModelLoaded(Ok(model)) => self.install_model(model),
            Completion::ModelLoaded(Err(e)) => {
                log::error!("Failed to load model {}: {}", self.config.model_path.display(), e);
            }

            Completion::PhotoUploaded(Ok(reply)) => self.photo_uploaded(reply),
            Completion::PhotoUploaded(Err(e)) => {
                log::error!("Photo upload failed: {}", e);
                self.alert(Alert::error("Image upload error"));
            }

            Completion::PhotoFetched { url, result } => match result {
                Ok(image) => {
                    if let Some(surface) = &mut self.surface {
                        let rect = photo_rect(surface.width(), surface.height(), image.width(), image.height());
                        surface.paint(&image, rect);
                    } else {
                        log::warn!("Photo {} arrived before the texture; not painted", url);
                    }
                }
                Err(e) => log::warn!("Could not load uploaded photo {}: {}", url, e),
            },

            Completion::StickerLoaded { kind, path, result } => {
                self.sticker_loaded(kind, &path, result);
            }

            Completion::DesignSubmitted(Ok(reply)) => {
                if reply.is_ok() {
                    let filename = reply.filename.unwrap_or_default();
                    log::info!("Design saved as {}", filename);
                    self.alert(Alert::info(format!("Design submitted! File name: {}", filename)));
                } else {
                    let message = reply.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                    self.alert(Alert::error(format!("Submission failed: {}", message)));
                }
            }
            Completion::DesignSubmitted(Err(e)) => {
                log::error!("Design submission failed: {}", e);
                self.alert(Alert::error("An error occurred while sending the design"));
            }
            Completion::DesignNotEncoded(e) => {
                log::error!("Could not encode texture: {}", e);
                self.alert(Alert::error("An error occurred while sending the design"));
            }
        }
    }

    fn install_model(&mut self, model: MugModel) {
        log::info!(
            "Model ready: {} vertices, {} triangles",
            model.mesh.vertices.len(),
            model.mesh.triangle_count()
        );
        match &model.base_texture {
            Some(texture) => self.surface = Some(TextureSurface::from_image(texture)),
            None => log::warn!("Mug body has no texture; painting is disabled"),
        }
        self.outbox.push(SessionEvent::ModelReady(model.mesh));
    }

    fn photo_uploaded(&mut self, reply: UploadImageReply) {
        if !reply.is_ok() {
            let message = reply.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            self.alert(Alert::error(format!("Image upload failed: {}", message)));
            return;
        }
        let Some(url) = reply.url else {
            log::warn!("Upload succeeded but the reply has no image URL");
            return;
        };
        log::info!("Uploaded photo: {}", url);

        let backend = Arc::clone(&self.backend);
        self.tasks.spawn(move || {
            let result = backend
                .fetch(&url)
                .map_err(AssetError::from)
                .and_then(|bytes| assets::decode_image(&bytes));
            Completion::PhotoFetched { url, result }
        });
    }

    fn sticker_loaded(&mut self, kind: Option<StickerKind>, path: &Path, result: Result<RgbaImage, AssetError>) {
        let image = match result {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not load sticker '{}': {}", path.display(), e);
                return;
            }
        };
        let Some(kind) = kind else {
            return;
        };
        let Some(surface) = &mut self.surface else {
            log::debug!("Sticker {} ignored, no texture yet", kind.attr());
            return;
        };

        surface.paint(&image, STICKER_RECT);
        self.stickers.push(PlacedSticker::at_sticker_rect(kind));
    }

    fn alert(&mut self, alert: Alert) {
        self.outbox.push(SessionEvent::Alert(alert));
    }

    pub fn surface(&self) -> Option<&TextureSurface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut TextureSurface> {
        self.surface.as_mut()
    }

    /// Stickers placed so far, in placement order
    pub fn stickers(&self) -> &[PlacedSticker] {
        &self.stickers
    }

    /// Background jobs still running
    pub fn pending_tasks(&self) -> usize {
        self.tasks.in_flight()
    }
}
