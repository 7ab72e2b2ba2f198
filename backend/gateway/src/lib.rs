//! Pokedex analysis endpoint.
//!
//! Accepts a multipart image upload, forwards it with a fixed prompt to the
//! configured vision provider and returns the provider's text unchanged.

pub mod analyze;
pub mod error;
pub mod health_api;
pub mod server;

pub use analyze::{run_analysis, IMAGE_FIELD};
pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
