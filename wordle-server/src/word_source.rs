use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use wordle_core::{WordSource, WordSourceError};

#[derive(Debug, Deserialize)]
struct PuzzleResponse {
    solution: String,
}

/// Fetches the word of the day over HTTP. The URL template's `{date}` is
/// replaced with the puzzle date as `YYYY-MM-DD`.
pub struct NytWordSource {
    client: Client,
    url_template: String,
}

impl NytWordSource {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, WordSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WordSourceError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    fn url_for(&self, date: NaiveDate) -> String {
        self.url_template
            .replace("{date}", &date.format("%Y-%m-%d").to_string())
    }
}

#[async_trait]
impl WordSource for NytWordSource {
    async fn fetch_word(&self, date: NaiveDate) -> Result<String, WordSourceError> {
        let url = self.url_for(date);
        debug!(url = %url, "Fetching daily word");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Daily word request failed");
            WordSourceError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Daily word request returned error status");
            return Err(WordSourceError::Status(status.as_u16()));
        }

        let puzzle: PuzzleResponse = response
            .json()
            .await
            .map_err(|e| WordSourceError::Malformed(e.to_string()))?;

        Ok(puzzle.solution)
    }
}
