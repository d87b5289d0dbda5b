//! Image generation request bundles.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};

/// One element of an ordered generation bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum RequestPart {
    /// Inline reference image
    Image(MediaPayload),
    /// Instruction text
    Text(String),
}

impl RequestPart {
    /// Returns the text if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestPart::Text(text) => Some(text),
            RequestPart::Image(_) => None,
        }
    }

    /// Returns the payload if this is an image part.
    pub fn as_image(&self) -> Option<&MediaPayload> {
        match self {
            RequestPart::Image(payload) => Some(payload),
            RequestPart::Text(_) => None,
        }
    }
}

/// Ordered bundle of parts sent to the image gateway.
///
/// Order is significant: the model reads earlier parts as context for later
/// instructions.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ImageRequest, MediaPayload, RequestPart};
///
/// let request = ImageRequest {
///     parts: vec![
///         RequestPart::from(MediaPayload::new("image/png", vec![1, 2, 3])),
///         RequestPart::from("Character Ada Identity: ink sketch".to_string()),
///     ],
///     model: None,
/// };
/// assert_eq!(request.image_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Ordered parts
    pub parts: Vec<RequestPart>,
    /// Model override; the gateway default is used when `None`
    pub model: Option<String>,
}

impl ImageRequest {
    /// Number of image parts in the bundle.
    pub fn image_count(&self) -> usize {
        self.parts.iter().filter(|p| p.as_image().is_some()).count()
    }
}
