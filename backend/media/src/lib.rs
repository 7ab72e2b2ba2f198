//! Image media helpers shared by the capture side and the analysis endpoint.

pub mod mime_detect;

pub use mime_detect::{
    detect_mime_type, is_image, resolve_image_mime, sniff_image_mime, DEFAULT_IMAGE_MIME,
};
