//! Production transport: authenticated HTTP over reqwest.
//!
//! The access token is an opaque credential handle; acquisition and refresh
//! belong to the host. No retry or backoff happens here.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::contract::{RawResult, Transport};
use crate::error::ApsError;
use crate::request::{Method, RequestBody, RequestDescriptor};

pub struct HttpTransport {
    client: Client,
    access_token: String,
}

// The token is a credential; keep it out of debug output.
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(access_token: impl Into<String>) -> Self {
        HttpTransport {
            client: Client::new(),
            access_token: access_token.into(),
        }
    }

    /// Read the bearer token from `APS_ACCESS_TOKEN`, loading `.env` if
    /// present.
    pub fn from_env() -> Result<Self, ApsError> {
        dotenvy::dotenv().ok();
        let access_token = std::env::var("APS_ACCESS_TOKEN").map_err(|_| {
            ApsError::Configuration("APS_ACCESS_TOKEN environment variable is not set".into())
        })?;
        Ok(HttpTransport::new(access_token))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, request: &RequestDescriptor) -> Result<RawResult, ApsError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .bearer_auth(&self.access_token)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Raw(bytes) => builder.body(bytes.clone()),
        };

        debug!(method = request.method.as_str(), url = %request.url, "Dispatching request");
        let response = builder.send().await.map_err(|e| {
            ApsError::Transport(format!("request to {} failed: {e}", request.url))
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(
                status = %status,
                url = %request.url,
                "API returned error. Response body: {body}"
            );
            return Err(ApsError::Transport(format!(
                "HTTP {status} from {}: {body}",
                request.url
            )));
        }

        // Textual bodies stay text so the normaliser can parse them
        // opportunistically; everything else is opaque bytes.
        if content_type.contains("json") || content_type.starts_with("text/") {
            let text = response.text().await.map_err(|e| {
                ApsError::Transport(format!("failed to read response body: {e}"))
            })?;
            Ok(RawResult::Text(text))
        } else {
            let bytes = response.bytes().await.map_err(|e| {
                ApsError::Transport(format!("failed to read response body: {e}"))
            })?;
            Ok(RawResult::Binary(bytes.to_vec()))
        }
    }
}
