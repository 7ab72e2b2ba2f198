pub mod error;
pub mod image;
pub mod prompt;
pub mod traits;

pub use error::{AnalysisError, ANALYSIS_FAILED_MESSAGE, NO_IMAGE_MESSAGE};
pub use image::{CapturedImage, DEFAULT_FILE_NAME};
pub use prompt::{CARD_SORTING_PROMPT, GENERAL_DESCRIPTION_PROMPT};
pub use traits::{AnalysisResult, VisionProvider, VisionRequest, VisionResponse};
