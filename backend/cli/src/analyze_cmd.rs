//! CLI Analyze Command
//!
//! Submits one image file to a running endpoint and prints the answer verbatim.

use std::path::Path;

use anyhow::{Context, Result};
use pokedex_client::AnalysisClient;
use pokedex_core::CapturedImage;

use crate::terminal_output::{note_error, note_info};

pub async fn run(file: &Path, server: &str) -> Result<()> {
    let image = if let Some(url) = file.to_str().filter(|s| s.starts_with("data:")) {
        CapturedImage::from_data_url(url).context("Invalid data URL")?
    } else {
        CapturedImage::from_path(file).await?
    };

    let client = AnalysisClient::for_server(server);
    note_info(&format!(
        "Submitting {} ({} bytes, {}) to {}",
        image.file_name,
        image.len(),
        image.mime_type,
        client.endpoint()
    ));

    match client.analyze(&image).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            note_error(&e.to_string());
            Err(e).context("Analysis failed")
        }
    }
}
