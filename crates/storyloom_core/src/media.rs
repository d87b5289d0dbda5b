//! Binary media payloads and their data-URL form.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Raw media bytes tagged with a MIME type.
///
/// # Examples
///
/// ```
/// use storyloom_core::MediaPayload;
///
/// let png = MediaPayload::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
/// let url = png.to_data_url();
/// assert!(url.starts_with("data:image/png;base64,"));
/// assert_eq!(MediaPayload::from_data_url(&url), Some(png));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaPayload {
    /// MIME type, e.g. "image/png" or "video/mp4"
    pub mime: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl MediaPayload {
    /// Creates a payload from a MIME type and bytes.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Base64 encoding of the bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Renders the payload as a `data:<mime>;base64,<bytes>` locator.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    /// Parses a `data:<mime>;base64,<bytes>` locator.
    ///
    /// Returns `None` when the string is not a base64 data URL.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, body) = rest.split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        let data = STANDARD.decode(body.trim()).ok()?;
        Some(Self::new(mime, data))
    }

    /// Guesses an image MIME type from a file extension, defaulting to PNG.
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "mp4" => "video/mp4",
            _ => "image/png",
        }
    }
}
