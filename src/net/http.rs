//! HTTP backend (ureq)
//!
//! Blocking requests against the design server. Meant to be called from
//! worker threads, never from the frame loop.

use std::io::Read;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;

use super::{DesignBackend, DesignPayload, NetError, UploadDesignReply, UploadImageReply};

/// Largest body `fetch` will read
const MAX_FETCH_BYTES: u64 = 32 * 1024 * 1024;

/// Design server reached over HTTP
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `url`; server-relative paths resolve against the base
    pub fn resolve(&self, url: &str) -> String {
        resolve_url(&self.base_url, url)
    }
}

impl DesignBackend for HttpBackend {
    fn upload_image(&self, file_name: &str, bytes: &[u8]) -> Result<UploadImageReply, NetError> {
        let boundary = make_boundary();
        let body = multipart_body(&boundary, "photo", file_name, bytes);

        let result = self
            .agent
            .post(&self.resolve("/upload_image"))
            .set("Content-Type", &format!("multipart/form-data; boundary={}", boundary))
            .send_bytes(&body);
        read_reply(result)
    }

    fn upload_design(&self, payload: &DesignPayload) -> Result<UploadDesignReply, NetError> {
        let result = self
            .agent
            .post(&self.resolve("/upload_design"))
            .send_json(payload);
        read_reply(result)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, NetError> {
        let response = self
            .agent
            .get(&self.resolve(url))
            .call()
            .map_err(convert_error)?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_FETCH_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| NetError::Transport(e.to_string()))?;
        Ok(bytes)
    }
}

/// Decode a JSON reply.
///
/// Error statuses that still carry a well-formed reply (the server answers
/// 400 with `{"status": "error", ...}`) are returned as replies.
fn read_reply<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> Result<T, NetError> {
    match result {
        Ok(response) => response
            .into_json::<T>()
            .map_err(|e| NetError::BadReply(e.to_string())),
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            serde_json::from_str::<T>(&body).map_err(|_| NetError::Status { code, body })
        }
        Err(other) => Err(convert_error(other)),
    }
}

/// Convert ureq error to NetError
fn convert_error(e: ureq::Error) -> NetError {
    match e {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            NetError::Status { code, body }
        }
        ureq::Error::Transport(transport) => NetError::Transport(transport.to_string()),
    }
}

fn resolve_url(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), url)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), url)
    }
}

fn make_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("----MugStudioBoundary{:x}", nanos)
}

/// Guess the part content type from the file extension
fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Single-file `multipart/form-data` body
fn multipart_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    // Quotes and line breaks would break out of the header
    let safe_name: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\r' | '\n' => '_',
            c => c,
        })
        .collect();

    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, safe_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type_for(file_name)).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{PlacedSticker, StickerKind};
    use std::thread::{self, JoinHandle};

    /// What the mock server saw
    struct Captured {
        method: String,
        url: String,
        content_type: String,
        body: Vec<u8>,
    }

    /// Serve exactly one request with the given status and body
    fn serve_once(status: u16, reply: &'static [u8]) -> (String, JoinHandle<Captured>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();

        let handle = thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body).unwrap();

            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();
            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body,
            };

            let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            let response = tiny_http::Response::from_data(reply)
                .with_status_code(status)
                .with_header(header);
            request.respond(response).unwrap();
            captured
        });

        (format!("http://127.0.0.1:{}", port), handle)
    }

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(base, Duration::from_secs(5))
    }

    #[test]
    fn test_upload_image_sends_photo_field() {
        let (base, server) = serve_once(
            200,
            br#"{"status":"ok","url":"/static/uploads/cup.png","message":"uploaded"}"#,
        );

        let reply = backend(&base).upload_image("cup.png", b"\x89PNGfake").unwrap();
        assert!(reply.is_ok());
        assert_eq!(reply.url.as_deref(), Some("/static/uploads/cup.png"));

        let seen = server.join().unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.url, "/upload_image");
        assert!(seen.content_type.starts_with("multipart/form-data; boundary="));

        let body = String::from_utf8_lossy(&seen.body);
        assert!(body.contains("name=\"photo\"; filename=\"cup.png\""));
        assert!(body.contains("Content-Type: image/png"));
        assert!(body.contains("PNGfake"));
    }

    #[test]
    fn test_error_status_with_json_is_a_reply() {
        let (base, server) = serve_once(400, br#"{"status":"error","message":"too large"}"#);

        let reply = backend(&base).upload_image("big.jpg", b"jpeg").unwrap();
        assert!(!reply.is_ok());
        assert_eq!(reply.message.as_deref(), Some("too large"));
        server.join().unwrap();
    }

    #[test]
    fn test_error_status_without_json_is_an_error() {
        let (base, server) = serve_once(500, b"Internal Server Error");

        let err = backend(&base).upload_image("a.png", b"x").unwrap_err();
        assert_eq!(
            err,
            NetError::Status {
                code: 500,
                body: "Internal Server Error".to_string()
            }
        );
        server.join().unwrap();
    }

    #[test]
    fn test_upload_design_posts_json() {
        let (base, server) = serve_once(200, br#"{"status":"ok","filename":"design_42.png","message":"saved"}"#);

        let payload = DesignPayload {
            texture: "data:image/png;base64,AAAA".to_string(),
            stickers: vec![PlacedSticker::at_sticker_rect(StickerKind::Cat)],
        };
        let reply = backend(&base).upload_design(&payload).unwrap();
        assert!(reply.is_ok());
        assert_eq!(reply.filename.as_deref(), Some("design_42.png"));

        let seen = server.join().unwrap();
        assert_eq!(seen.url, "/upload_design");
        assert!(seen.content_type.starts_with("application/json"));
        let sent: DesignPayload = serde_json::from_slice(&seen.body).unwrap();
        assert_eq!(sent, payload);
    }

    #[test]
    fn test_malformed_success_body() {
        let (base, server) = serve_once(200, b"<html>not json</html>");

        let err = backend(&base)
            .upload_design(&DesignPayload {
                texture: String::new(),
                stickers: Vec::new(),
            })
            .unwrap_err();
        assert!(matches!(err, NetError::BadReply(_)));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_resolves_relative_url() {
        let (base, server) = serve_once(200, b"pixels");

        let bytes = backend(&base).fetch("/static/uploads/cup.png").unwrap();
        assert_eq!(bytes, b"pixels");
        assert_eq!(server.join().unwrap().url, "/static/uploads/cup.png");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Grab a free port, then release it so nothing is listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = backend(&format!("http://127.0.0.1:{}", port))
            .fetch("/x")
            .unwrap_err();
        assert!(matches!(err, NetError::Transport(_)));
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url("http://h:1/", "/a/b.png"), "http://h:1/a/b.png");
        assert_eq!(resolve_url("http://h:1", "a/b.png"), "http://h:1/a/b.png");
        assert_eq!(resolve_url("http://h:1", "https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn test_multipart_escapes_file_name() {
        let body = multipart_body("B", "photo", "we\"ird\r\n.PNG", b"data");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--B\r\n"));
        assert!(text.contains("filename=\"we_ird__.PNG\""));
        assert!(text.contains("Content-Type: image/png\r\n\r\ndata\r\n--B--\r\n"));
    }
}
