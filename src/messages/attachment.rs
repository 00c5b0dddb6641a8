//! Encoded image payloads for user messages
//!
//! The chat endpoint expects the raw base64 payload with a declared MIME
//! type; local preview uses the full data-URI form. Both views come from the
//! same stored encoding so the two can never drift apart.

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// An image staged for, or carried by, a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Raw base64 payload, no data-URI prefix
    pub data: String,

    /// Declared MIME type, e.g. `image/jpeg`
    pub mime_type: String,
}

impl ImageAttachment {
    /// Encode raw image bytes
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: BASE64_STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Read and encode an image file, deriving the MIME type from the
    /// file extension (defaulting to `image/jpeg`).
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::InvalidInput(format!("Failed to read image file: {}", e)))?;

        let mime_type = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        };

        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// Parse a data URI, stripping the prefix and keeping the raw payload
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidInput("Not a data URI".into()))?;

        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidInput("Malformed data URI".into()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidInput("Data URI is not base64-encoded".into()))?;

        Ok(Self {
            data: data.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Full data-URI form, for local preview rendering
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode back to the original bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64_STANDARD
            .decode(&self.data)
            .map_err(|e| Error::InvalidInput(format!("Invalid base64 payload: {}", e)))
    }
}
