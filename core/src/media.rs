use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read media file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
}

/// A local image read into an embeddable form. The file is read once, with
/// no retry; the bytes travel inline as a data URL.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub name: String,
    pub mime_type: &'static str,
    pub data_url: String,
}

impl ImageAttachment {
    /// One-shot read of `path` into a `data:` URL. Only image extensions
    /// are accepted; anything else is refused before touching the disk.
    pub fn read(path: &Path) -> Result<Self, MediaError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        let mime_type = mime_for_extension(&ext).ok_or(MediaError::UnsupportedType(ext))?;
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
        tracing::debug!(%name, mime_type, bytes = bytes.len(), "image embedded");
        Ok(Self { name, mime_type, data_url })
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
