use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ApiError;

/// Performs a single `GET` against the upstream API and returns the JSON body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<Value, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> ReqwestTransport {
        ReqwestTransport { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        ReqwestTransport::new(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &Url) -> Result<Value, ApiError> {
        debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let resp = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: upstream_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string()),
            });
        }

        Ok(serde_json::from_str::<Value>(&body)?)
    }
}

fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()?
        .error?
        .message
}
