use anyhow::Context as _;
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use crate::core::time::Duration;
use crate::port::KeyValueStore;

/// Redis over the Upstash REST API. Values are written with an `EX` expiry.
#[derive(Debug, Clone)]
pub struct UpstashStore {
    client: ClientWithMiddleware,
    base_url: String,
    ttl: Duration,
}

#[derive(Debug, Deserialize)]
struct UpstashResponse {
    result: Option<serde_json::Value>,
}

impl UpstashStore {
    pub fn new(url: &str, token: &str, ttl: Duration) -> anyhow::Result<Self> {
        let client = HttpClientConfig::bearer(token).new_tracing_client()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_owned(),
            ttl,
        })
    }
}

impl KeyValueStore for UpstashStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/get/{}", self.base_url, key))
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Error reading {} from Upstash", key))?;

        let body: UpstashResponse = response.json().await.context("Error parsing Upstash response")?;

        Ok(match body.result {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(value)) => Some(value),
            //values stored by other clients may come back as raw JSON
            Some(other) => Some(other.to_string()),
        })
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.client
            .post(format!("{}/set/{}", self.base_url, key))
            .query(&[("EX", self.ttl.as_secs().to_string())])
            .body(value)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Error writing {} to Upstash", key))?;

        Ok(())
    }

    fn storage_name(&self) -> &'static str {
        "Upstash Redis"
    }
}
