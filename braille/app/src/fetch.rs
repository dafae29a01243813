use anyhow::{Context, Result};
use common::table_store::{TableSource, TABLES_BASE_URL};
use log::debug;

/// Fetches table files over HTTP from a raw-file base URL.
pub struct UreqSource {
    base_url: String,
}

impl UreqSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for UreqSource {
    fn default() -> Self {
        Self::new(TABLES_BASE_URL)
    }
}

impl TableSource for UreqSource {
    fn fetch(&self, name: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, name);
        debug!("GET {}", url);
        let resp = ureq::get(&url)
            .call()
            .with_context(|| format!("Request failed for {}", url))?;
        let text = resp
            .into_string()
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(text)
    }
}
