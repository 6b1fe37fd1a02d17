// Shared HTTP client utilities

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("assetkeeper/", env!("CARGO_PKG_VERSION"));

lazy_static::lazy_static! {
    /// Shared HTTP client with proper User-Agent
    static ref CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client");
}

/// Response wrapper used by every catalogue endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: T,
}

async fn get(url: &str) -> Result<Response> {
    let response: Response = CLIENT.get(url).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
        anyhow::bail!("Resource not found: {}", url);
    }

    if !response.status().is_success() {
        anyhow::bail!("HTTP request failed: {} ({})", url, response.status());
    }

    Ok(response)
}

/// Fetch an enveloped JSON payload and return its `data`
pub async fn fetch_data<T: DeserializeOwned>(url: &str) -> Result<T> {
    let envelope: Envelope<T> = get(url).await?.json().await?;
    if !(200..300).contains(&envelope.status) {
        anyhow::bail!("API returned status {} for {}", envelope.status, url);
    }
    Ok(envelope.data)
}

/// Fetch raw bytes from a URL
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let bytes = get(url).await?.bytes().await?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses() {
        let json = r#"{"status": 200, "data": {"riotClientVersion": "release-09.07"}}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.data["riotClientVersion"], "release-09.07");
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("assetkeeper/"));
    }
}
