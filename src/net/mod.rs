//! Design server client
//!
//! Two endpoints matter:
//! - `POST /upload_image`: multipart form, field `photo`; replies
//!   `{status, url, message}`
//! - `POST /upload_design`: JSON `{texture, stickers}`; replies
//!   `{status, filename, message}`
//!
//! A reply with `status != "ok"` is still a reply, not an error: the
//! caller shows its message. `NetError` is reserved for transport failures
//! and bodies that are not the expected JSON.

mod http;
mod tasks;

pub use http::HttpBackend;
pub use tasks::TaskQueue;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::compositor::PlacedSticker;

/// Status value the server uses for a successful request
pub const STATUS_OK: &str = "ok";

/// Server operations the session depends on.
///
/// Calls block; the session runs them on worker threads.
pub trait DesignBackend: Send + Sync + 'static {
    /// Upload a photo file under the form field `photo`
    fn upload_image(&self, file_name: &str, bytes: &[u8]) -> Result<UploadImageReply, NetError>;

    /// Submit the finished design
    fn upload_design(&self, payload: &DesignPayload) -> Result<UploadDesignReply, NetError>;

    /// Download a resource the server referred to (e.g. an uploaded photo URL)
    fn fetch(&self, url: &str) -> Result<Vec<u8>, NetError>;
}

/// Reply to a photo upload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadImageReply {
    pub status: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadImageReply {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Reply to a design submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadDesignReply {
    pub status: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadDesignReply {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Body of `POST /upload_design`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPayload {
    /// `data:image/png;base64,...` snapshot of the texture surface
    pub texture: String,
    /// Every sticker placed so far, in placement order
    pub stickers: Vec<PlacedSticker>,
}

/// Transport-level failure talking to the design server
#[derive(Debug, Clone, PartialEq)]
pub enum NetError {
    /// Could not connect, timed out, or the connection dropped
    Transport(String),
    /// Non-success HTTP status without a usable JSON reply
    Status { code: u16, body: String },
    /// Reply body was not the expected JSON
    BadReply(String),
    /// Local file could not be read for upload
    Io(String),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Transport(msg) => write!(f, "network error: {}", msg),
            NetError::Status { code, body } => write!(f, "HTTP {}: {}", code, body),
            NetError::BadReply(msg) => write!(f, "unexpected reply: {}", msg),
            NetError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for NetError {}

impl From<std::io::Error> for NetError {
    fn from(e: std::io::Error) -> Self {
        NetError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{PlacedSticker, StickerKind};

    #[test]
    fn test_image_reply_parsing() {
        let ok: UploadImageReply =
            serde_json::from_str(r#"{"status":"ok","url":"/static/uploads/a.png","message":"ok"}"#).unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.url.as_deref(), Some("/static/uploads/a.png"));

        let err: UploadImageReply = serde_json::from_str(r#"{"status":"error","message":"too large"}"#).unwrap();
        assert!(!err.is_ok());
        assert_eq!(err.url, None);
        assert_eq!(err.message.as_deref(), Some("too large"));
    }

    #[test]
    fn test_design_payload_shape() {
        let payload = DesignPayload {
            texture: "data:image/png;base64,AAAA".to_string(),
            stickers: vec![
                PlacedSticker::at_sticker_rect(StickerKind::Heart),
                PlacedSticker::at_sticker_rect(StickerKind::Cat),
            ],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["texture"], "data:image/png;base64,AAAA");
        assert_eq!(json["stickers"][0]["kind"], "heart");
        assert_eq!(json["stickers"][1]["kind"], "cat");
        assert_eq!(json["stickers"][1]["width"], 200);
    }
}
