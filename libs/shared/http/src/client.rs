use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Thin reqwest wrapper for reading JSON documents from public endpoints.
#[derive(Clone)]
pub struct JsonClient {
    client: Client,
}

impl JsonClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn get_json<T>(&self, url: &str) -> Result<T>
    where T: DeserializeOwned {
        debug!("Making request to {}", url);

        let response = self.client.get(url)
            .headers(self.get_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                404 => anyhow!("Resource not found: {}", url),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

impl Default for JsonClient {
    fn default() -> Self {
        Self::new()
    }
}
