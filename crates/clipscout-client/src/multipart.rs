// crates/clipscout-client/src/multipart.rs
//
// Hand-assembled multipart/form-data bodies (RFC 7578). The detection
// service takes one file part plus a few text fields — not enough surface
// to justify a dedicated multipart dependency.

use std::io;
use std::path::Path;

use uuid::Uuid;

pub struct MultipartBody {
    boundary: String,
    buf:      Vec<u8>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBody {
    pub fn new() -> Self {
        // Uuid-derived boundary: long enough that colliding with field
        // content is not a practical concern.
        let boundary = format!("----clipscout-{}", Uuid::new_v4().simple());
        Self { boundary, buf: Vec::new() }
    }

    /// Append a plain text field.
    pub fn add_text(&mut self, name: &str, value: &str) {
        self.open_part();
        self.buf.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    /// Append a file part with explicit filename and content type.
    pub fn add_file_bytes(&mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) {
        self.open_part();
        self.buf.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
    }

    /// Append a file part read from disk. Filename comes from the path's
    /// file name component, content type from its extension.
    pub fn add_file(&mut self, name: &str, path: &Path) -> io::Result<()> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.add_file_bytes(name, &filename, content_type_for(path), &bytes);
        Ok(())
    }

    /// The `Content-Type` header value to send alongside this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the body with the final boundary and return the raw bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.buf
    }

    fn open_part(&mut self) {
        self.buf
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

/// Media content type from a file extension. The service only sniffs the
/// container anyway; octet-stream is a safe default for anything unknown.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov"         => "video/quicktime",
        "webm"        => "video/webm",
        "mkv"         => "video/x-matroska",
        "avi"         => "video/x-msvideo",
        _             => "application/octet-stream",
    }
}
