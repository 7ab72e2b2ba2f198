//! Client side of the analysis flow: upload one image, get the text back.

pub mod client;
pub mod error;
pub mod session;

pub use client::{AnalysisClient, Submitter, ANALYZE_PATH};
pub use error::{ClientError, DEFAULT_REJECTION_MESSAGE};
pub use session::{AnalysisSession, SubmitOutcome, FALLBACK_MESSAGE};
