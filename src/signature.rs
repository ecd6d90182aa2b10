//! Pathologist signature payload.
//!
//! Held as a `data:<mime>;base64,<payload>` URL, which is what an uploaded
//! or hand-drawn signature looks like when it reaches the form. Decoding the
//! image itself is left to the PDF renderer, which tolerates failures.

use std::path::Path;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

const MAX_SIGNATURE_BYTES: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    mime_type: String,
    payload: String,
}

impl Signature {
    /// Wrap raw image bytes. Only PNG and JPEG are accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        if bytes.len() > MAX_SIGNATURE_BYTES {
            return Err(ReportError::Signature(format!(
                "image is {} bytes (max {MAX_SIGNATURE_BYTES})",
                bytes.len()
            )));
        }
        let mime_type = detect_image_mime(bytes)
            .ok_or_else(|| ReportError::Signature("unsupported image format (use PNG or JPEG)".into()))?;

        Ok(Self {
            mime_type: mime_type.into(),
            payload: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }

    /// Read an uploaded signature image from disk.
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a `data:image/...;base64,...` URL. The payload is not decoded here.
    pub fn from_data_url(url: &str) -> Result<Self, ReportError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ReportError::Signature("not a data URL".into()))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| ReportError::Signature("data URL is not base64-encoded".into()))?;
        if !mime_type.starts_with("image/") {
            return Err(ReportError::Signature(format!("not an image: {mime_type}")));
        }
        if payload.trim().is_empty() {
            return Err(ReportError::Signature("empty image payload".into()));
        }

        Ok(Self {
            mime_type: mime_type.into(),
            payload: payload.split_whitespace().collect(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }

    /// Raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ReportError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|e| ReportError::Signature(format!("invalid base64: {e}")))?;
        if bytes.len() > MAX_SIGNATURE_BYTES {
            return Err(ReportError::Signature("decoded image too large".into()));
        }
        Ok(bytes)
    }
}

impl TryFrom<String> for Signature {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_data_url(&value)
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.to_data_url()
    }
}

/// Image MIME type from magic bytes (NOT file extensions).
fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        _ => None,
    }
}
