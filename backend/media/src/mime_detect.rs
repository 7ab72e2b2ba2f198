//! MIME type detection for captured images.
//!
//! Extension lookup is used for files read from disk; magic-byte sniffing is
//! the fallback for uploads whose part carries no usable content type.

use std::path::Path;

/// MIME type assumed when nothing better is known. Camera snapshots are JPEG.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "heic"         => "image/heic",
        "heif"         => "image/heif",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        _              => "application/octet-stream",
    }
}

/// Sniff an image MIME type from the leading bytes of a payload.
pub fn sniff_image_mime(data: &[u8]) -> Option<&'static str> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("image/tiff"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', ..] => Some("image/heic"),
        _ => None,
    }
}

/// Pick the MIME type to forward for an uploaded image.
///
/// A declared `image/*` type wins, then sniffing, then [`DEFAULT_IMAGE_MIME`].
pub fn resolve_image_mime(declared: Option<&str>, data: &[u8]) -> String {
    if let Some(declared) = declared {
        let essence = declared.split(';').next().unwrap_or("").trim();
        if is_image(essence) {
            return essence.to_ascii_lowercase();
        }
    }
    sniff_image_mime(data)
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string()
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime_type(&PathBuf::from("photo.JPG")), "image/jpeg");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("file.xyz")), "application/octet-stream");
    }

    #[test]
    fn sniffs_png_and_jpeg() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some("image/jpeg"));
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(sniff_image_mime(&png), Some("image/png"));
        assert_eq!(sniff_image_mime(b"hello"), None);
    }

    #[test]
    fn declared_image_type_wins() {
        let jpeg = [0xFF, 0xD8, 0xFF];
        assert_eq!(resolve_image_mime(Some("image/png"), &jpeg), "image/png");
        assert_eq!(resolve_image_mime(Some("application/octet-stream"), &jpeg), "image/jpeg");
        assert_eq!(resolve_image_mime(None, b"????"), DEFAULT_IMAGE_MIME);
    }
}
