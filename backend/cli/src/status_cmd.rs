//! CLI Status Command
//!
//! Queries `/api/health` on a running endpoint.

use anyhow::Result;

use crate::terminal_output::{note_success, note_warn};

pub async fn run(server: &str) -> Result<()> {
    let url = format!("{}/api/health", server.trim_end_matches('/'));
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("Pokedex is running at {server}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => {
            note_warn(&format!("{url} answered {}", resp.status()));
        }
        Err(_) => {
            note_warn(&format!("Pokedex is not running at {server}"));
        }
    }
    Ok(())
}
