//! Card photos as sent to the vision model.

use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::Path;

use crate::error::{CoreError, Result};

/// An encoded card photo and its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Detect an image MIME type by file extension.
#[must_use]
pub fn detect_image_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tiff" | "tif" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

impl CardImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(CoreError::NoImage);
        }
        Ok(Self {
            mime_type: mime_type.into(),
            data,
        })
    }

    /// Read a photo from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime = detect_image_mime(path).ok_or_else(|| {
            CoreError::InvalidImage(format!("unsupported image type: {}", path.display()))
        })?;
        let data = std::fs::read(path)?;
        Self::new(mime, data)
    }

    /// Decode a `data:<mime>;base64,<payload>` URL, as produced by a browser
    /// camera capture or file picker.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (header, payload) = url
            .split_once(',')
            .ok_or_else(|| CoreError::InvalidImage("missing base64 payload".to_string()))?;
        if payload.is_empty() {
            return Err(CoreError::InvalidImage("missing base64 payload".to_string()));
        }

        let mime = header
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|mime| !mime.is_empty())
            .unwrap_or("image/jpeg");

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| CoreError::InvalidImage(e.to_string()))?;
        Self::new(mime, data)
    }

    /// Encode as a data URL for the chat completions `image_url` part.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}
