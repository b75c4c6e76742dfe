//! Image payloads: raw bytes plus a declared media type.

use crate::error::{Result, StudioError};
use base64::Engine;
use std::path::Path;

/// Image formats recognized when loading local files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
    /// GIF format.
    Gif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Looks up a format by MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// An image as raw bytes and its declared media type.
///
/// The media type is stored verbatim. Nothing in this crate re-encodes the
/// bytes, so a payload received from the service is offered for download
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
}

impl ImagePayload {
    /// Creates a payload without validation.
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Creates a payload from uploaded bytes, detecting the format.
    ///
    /// Fails with [`StudioError::Decode`] when the bytes are not a
    /// recognized image.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = ImageFormat::from_magic_bytes(&bytes)
            .ok_or_else(|| StudioError::Decode("unrecognized image format".into()))?;
        Ok(Self::new(bytes, format.mime_type()))
    }

    /// Reads a local image file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "read local image");
        Self::from_bytes(bytes)
    }

    /// Parses a `data:<media-type>;base64,<data>` URL.
    ///
    /// Whitespace inside the base64 body and missing padding are tolerated.
    /// The declared media type must be an `image/*` type.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::Decode("missing data: prefix".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::Decode("missing ',' in data URL".into()))?;
        let media_type = match header.rsplit_once(';') {
            Some((media_type, encoding)) if encoding.trim().eq_ignore_ascii_case("base64") => {
                media_type
            }
            _ => return Err(StudioError::Decode("data URL is not base64 encoded".into())),
        };
        // Drop parameters such as ";charset=..." from the media type.
        let media_type = media_type.split(';').next().unwrap_or_default().trim();

        if !media_type.to_ascii_lowercase().starts_with("image/") {
            return Err(StudioError::Decode(format!(
                "not an image media type: {media_type:?}"
            )));
        }

        let bytes = decode_base64_lenient(data)
            .map_err(|e| StudioError::Decode(format!("invalid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(StudioError::Decode("empty image data".into()));
        }

        Ok(Self::new(bytes, media_type))
    }

    /// Encodes the bytes as standard base64.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Returns the payload as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }

    /// Returns the known format for the declared media type, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.media_type)
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Decodes base64 that may contain whitespace or lack padding.
pub(crate) fn decode_base64_lenient(input: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if let Ok(data) = base64::engine::general_purpose::STANDARD.decode(&cleaned) {
        return Ok(data);
    }

    base64::engine::general_purpose::STANDARD_NO_PAD.decode(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"GIF89a\x01\x00"),
            Some(ImageFormat::Gif)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"hello world!"), None);
    }

    #[test]
    fn test_format_from_mime_type() {
        assert_eq!(
            ImageFormat::from_mime_type("image/png"),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_mime_type("IMAGE/JPEG"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_mime_type("image/heic"), None);
    }

    #[test]
    fn test_from_bytes_rejects_non_image() {
        let err = ImagePayload::from_bytes(b"plain text, not a picture".to_vec()).unwrap_err();
        assert!(matches!(err, StudioError::Decode(_)));
    }

    #[test]
    fn test_from_bytes_detects_media_type() {
        let payload = ImagePayload::from_bytes(JPEG_MAGIC.to_vec()).unwrap();
        assert_eq!(payload.media_type, "image/jpeg");
    }

    #[test]
    fn test_data_url_strips_envelope() {
        let payload = ImagePayload::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(payload.media_type, "image/png");
        assert_eq!(
            payload.bytes,
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn test_data_url_encoding_is_case_insensitive() {
        let payload = ImagePayload::from_data_url("data:image/png;BASE64,iVBORw0KGgo=").unwrap();
        assert_eq!(payload.media_type, "image/png");
        assert_eq!(payload.size(), 8);
    }

    #[test]
    fn test_data_url_lenient_base64() {
        let payload = ImagePayload::from_data_url("data:image/png;base64,iVBO\nRw0KGgo").unwrap();
        assert_eq!(payload.size(), 8);
    }

    #[test]
    fn test_data_url_preserves_unknown_image_type() {
        let payload = ImagePayload::from_data_url("data:image/heic;base64,AAAA").unwrap();
        assert_eq!(payload.media_type, "image/heic");
        assert_eq!(payload.format(), None);
    }

    #[test]
    fn test_data_url_rejects_malformed() {
        for url in [
            "iVBORw0KGgo=",
            "data:image/png,iVBORw0KGgo=",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64,@@@",
            "data:image/png;base64",
            "data:image/png;base64,",
        ] {
            let err = ImagePayload::from_data_url(url).unwrap_err();
            assert!(matches!(err, StudioError::Decode(_)), "accepted {url}");
        }
    }

    #[test]
    fn test_to_data_url() {
        let payload = ImagePayload::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png");
        assert_eq!(payload.to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_from_file_missing_is_decode_failure() {
        let err = ImagePayload::from_file("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::FailureKind::DecodeFailure);
    }
}
