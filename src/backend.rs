//! HTTP client for a remote catalogue source (GET /palette).

use std::time::Duration;

use tracing::info;

use crate::config::CatalogueFile;
use crate::error::PaletteError;

pub struct CatalogueClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl CatalogueClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PaletteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/palette", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the catalogue document the host serves.
    pub fn fetch(&self) -> Result<CatalogueFile, PaletteError> {
        let url = self.endpoint();
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PaletteError::Status {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }
        let file: CatalogueFile = resp.json()?;
        info!(url = %url, commands = file.commands.len(), "fetched catalogue");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = CatalogueClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8000/palette");
    }
}
