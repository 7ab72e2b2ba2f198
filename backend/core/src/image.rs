//! The captured still image handed from the capture side to the submission client.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;

use pokedex_media::{detect_mime_type, is_image, DEFAULT_IMAGE_MIME};

use crate::error::AnalysisError;

/// File name used for snapshots taken from the camera.
pub const DEFAULT_FILE_NAME: &str = "photo.jpg";

/// Raw image bytes plus the metadata needed to upload them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub data: Bytes,
    pub mime_type: String,
    pub file_name: String,
}

impl CapturedImage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime_type: DEFAULT_IMAGE_MIME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Decode a `data:<mime>;base64,<payload>` URL, the form a canvas snapshot takes.
    pub fn from_data_url(url: &str) -> Result<Self, AnalysisError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| AnalysisError::Encoding("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AnalysisError::Encoding("data URL has no payload".into()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or("").trim();
        if !params.any(|p| p.trim() == "base64") {
            return Err(AnalysisError::Encoding("data URL is not base64-encoded".into()));
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| AnalysisError::Encoding(e.to_string()))?;

        let mime = if is_image(mime) { mime } else { DEFAULT_IMAGE_MIME };
        Ok(Self::new(data).with_mime_type(mime))
    }

    /// Read an image from disk, taking the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image: {}", path.display()))?;

        let mime = match detect_mime_type(path) {
            m if is_image(m) => m,
            _ => DEFAULT_IMAGE_MIME,
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_FILE_NAME);

        Ok(Self::new(data)
            .with_mime_type(mime)
            .with_file_name(file_name))
    }

    /// Standard (padded) base64 of the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_canvas_data_url() {
        let image = CapturedImage::from_data_url("data:image/jpeg;base64,/9j/4AA=").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.file_name, DEFAULT_FILE_NAME);
        assert_eq!(&image.data[..], &[0xFF, 0xD8, 0xFF, 0xE0, 0x00]);
        assert_eq!(image.to_base64(), "/9j/4AA=");
    }

    #[test]
    fn rejects_non_base64_data_url() {
        let err = CapturedImage::from_data_url("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, AnalysisError::Encoding(_)));
        assert!(CapturedImage::from_data_url("http://example.com/a.jpg").is_err());
    }

    #[tokio::test]
    async fn reads_file_with_extension_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let image = CapturedImage::from_path(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.file_name, "card.png");
        assert_eq!(image.len(), 4);
    }
}
