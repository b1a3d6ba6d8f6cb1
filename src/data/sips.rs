//! HTTP client for the supply-point lookup service.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::{Cups, LookupResponse};
use crate::error::{AppError, LookupError};

const SEARCH_PATH: &str = "/api/sips/search";

/// Anything that can answer a lookup for a validated CUPS.
///
/// The coordinator only talks to this trait, so tests and offline rendering
/// can substitute canned responses for the HTTP client.
pub trait LookupTransport {
    fn search(&self, cups: &Cups) -> Result<LookupResponse, LookupError>;
}

#[derive(Debug, Clone)]
pub struct SipsClient {
    client: Client,
    search_url: String,
}

impl SipsClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            search_url: format!("{}{SEARCH_PATH}", config.api_url),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl LookupTransport for SipsClient {
    fn search(&self, cups: &Cups) -> Result<LookupResponse, LookupError> {
        tracing::info!(%cups, url = %self.search_url, "querying lookup service");

        let resp = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest { cups: cups.as_str() })
            .send()
            .map_err(|e| {
                tracing::warn!(%cups, error = %e, "lookup request failed");
                LookupError::connection(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            // Error bodies are `{"error": "..."}` when the service produced them;
            // proxies and crashes may send anything else.
            let server_message = resp.json::<ErrorBody>().ok().and_then(|b| b.error);
            tracing::warn!(%cups, status = status.as_u16(), ?server_message, "lookup rejected");
            return Err(LookupError::from_status(status.as_u16(), server_message));
        }

        resp.json::<LookupResponse>().map_err(|e| LookupError::Transport {
            status: Some(status.as_u16()),
            message: format!("Respuesta no válida del servidor: {e}"),
        })
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    cups: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}
