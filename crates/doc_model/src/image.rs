//! Logo image sources
//!
//! Logos are stored inside the document as data URIs so a snapshot is
//! self-contained. Raw bytes are accepted at construction time and encoded
//! on the way in.

use crate::ImageError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// An image reference held by the exam header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

/// Decoded image payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// MIME type declared by the data URI
    pub mime_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl ImageSource {
    /// Wrap an existing data URI (or any URL the host can display)
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Encode raw image bytes as a base64 data URI
    pub fn from_bytes(mime_type: &str, data: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(data)))
    }

    /// Get the URI string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the URI holds only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whether this is an inline data URI
    pub fn is_data_uri(&self) -> bool {
        self.0.trim_start().starts_with("data:")
    }

    /// Length of the stored URI in bytes
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }

    /// Decode the data URI into its MIME type and bytes
    pub fn decode(&self) -> Result<DecodedImage, ImageError> {
        let uri = self.0.trim();
        if uri.is_empty() {
            return Err(ImageError::Empty);
        }

        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::UnsupportedSource(truncate(uri)))?;

        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::MalformedDataUri("missing ',' separator".into()))?;

        let mut parts = meta.split(';');
        let mime_type = parts.next().unwrap_or("").trim().to_ascii_lowercase();
        let is_base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        if !is_base64 {
            return Err(ImageError::UnsupportedSource(
                "data URI without base64 encoding".into(),
            ));
        }

        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let data = STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;

        Ok(DecodedImage {
            mime_type: if mime_type.is_empty() {
                "application/octet-stream".to_string()
            } else {
                mime_type
            },
            data,
        })
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(48).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_bytes_roundtrip() {
        let source = ImageSource::from_bytes("image/png", &PNG_MAGIC);
        assert!(source.is_data_uri());
        let decoded = source.decode().unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.data, PNG_MAGIC.to_vec());
    }

    #[test]
    fn test_remote_url_unsupported() {
        let source = ImageSource::new("https://example.com/logo.png");
        assert!(matches!(source.decode(), Err(ImageError::UnsupportedSource(_))));
    }

    #[test]
    fn test_malformed_data_uri() {
        let source = ImageSource::new("data:image/png;base64");
        assert!(matches!(source.decode(), Err(ImageError::MalformedDataUri(_))));

        let source = ImageSource::new("data:image/png;base64,@@@");
        assert!(matches!(source.decode(), Err(ImageError::InvalidBase64(_))));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(ImageSource::new("  ").decode(), Err(ImageError::Empty));
    }
}
