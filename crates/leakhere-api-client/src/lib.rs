//! Shared HTTP client for the LeakHere API.
//!
//! Provides a minimal client with generic GET/POST helpers, the domain endpoints in
//! [`api`] and the presigned object upload in [`object`]. Every call maps failures into
//! [`ApiError`], so callers can surface the server's `message` directly.

pub mod api;
pub mod object;

use std::time::Duration;

use anyhow::{Context, Result};
use leakhere_core::{ApiError, ClientConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the LeakHere API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Only a connect timeout is applied. Object uploads may legitimately run for minutes.
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    /// Create client from environment (`LEAKHERE_API_URL`, `LEAKHERE_CONNECT_TIMEOUT_SECS`).
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = send(request).await?;
        parse_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.build_url(path)).json(body);
        let response = send(request).await?;
        parse_json(response).await
    }

    /// POST JSON body, ignoring whatever the server answers on success.
    pub async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.client.post(self.build_url(path)).json(body);
        send(request).await?;
        Ok(())
    }

    /// Raw client for requests outside the API base URL.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Send `request`, turning transport failures and non-2xx statuses into [`ApiError`].
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

pub(crate) async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body.message.or(body.error).unwrap_or(text);

    tracing::debug!(status, message = %message, "API request failed");
    ApiError::Status { status, message }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}
