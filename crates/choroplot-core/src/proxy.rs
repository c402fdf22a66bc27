use crate::{Error, Result};
use serde_json::json;
use std::time::Duration;

/// One completion round-trip. Implemented over HTTP by [`CompletionProxy`];
/// tests substitute canned clients.
pub trait CompletionClient {
    fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Where the reverse proxy lives and what goes in the request body. The
/// provider credential is held server-side; `api_key` is the user-supplied
/// key the proxy forwards, never a secret baked into this crate.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Blocking client for the reverse-proxy completion endpoint.
///
/// The body shape is the proxy's contract: `{apiKey, system, messages}`; the
/// reply is the provider's raw JSON, from which the first choice's message
/// content is extracted.
pub struct CompletionProxy {
    client: reqwest::blocking::Client,
    config: ProxyConfig,
}

impl CompletionProxy {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

impl CompletionClient for CompletionProxy {
    fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "apiKey": self.config.api_key,
            "system": system,
            "messages": [ { "role": "user", "content": user } ],
        });
        tracing::debug!(url = %self.config.url, "sending completion request");
        let reply: serde_json::Value = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                Error::model_response("reply carries no message content".to_string())
            })?;
        Ok(content.to_string())
    }
}
