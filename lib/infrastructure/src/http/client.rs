use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{self, HeaderMap};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    #[default]
    Bearer,
    //token is sent as-is, without a scheme prefix
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    token: Option<String>,
    #[serde(default)]
    scheme: AuthScheme,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl HttpClientConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            scheme: AuthScheme::Bearer,
            timeout_secs: None,
        }
    }

    pub fn raw(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            scheme: AuthScheme::Raw,
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    fn authorization_value(&self) -> Option<String> {
        self.token.as_ref().map(|token| match self.scheme {
            AuthScheme::Bearer => format!("Bearer {}", token),
            AuthScheme::Raw => token.clone(),
        })
    }

    pub fn new_tracing_client(&self) -> anyhow::Result<ClientWithMiddleware> {
        let mut headers = HeaderMap::new();

        if let Some(value) = self.authorization_value() {
            let mut auth_value =
                header::HeaderValue::from_str(&value).context("Invalid characters in authorization token")?;
            auth_value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build()?;

        Ok(reqwest_middleware::ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build())
    }
}
