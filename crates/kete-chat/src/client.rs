//! Query endpoint client.
//!
//! [`QueryClient`] is the seam between the session and the backend; the
//! session only ever sees a parsed [`QueryResponse`] or a [`QueryError`].

use std::time::Duration;

use async_trait::async_trait;
use kete_core::config::EndpointConfig;
use kete_core::error::KeteError;
use kete_core::types::QueryResponse;
use reqwest::Client;

/// Why a query produced no usable response.
///
/// All variants are treated the same by the session (a failed query).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Something that can answer a user's query.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Send `text` as the sole query parameter and parse the reply.
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError>;
}

/// [`QueryClient`] over HTTP `GET <url>?<param>=<text>`.
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    client: Client,
    url: String,
    query_param: String,
}

impl HttpQueryClient {
    /// Build a client from the endpoint section of the configuration.
    pub fn new(config: &EndpointConfig) -> Result<Self, KeteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KeteError::Http(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            query_param: config.query_param.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError> {
        // reqwest percent-encodes the pair, so spaces, '&', '#' and non-ASCII
        // text reach the endpoint unchanged.
        let response = self
            .client
            .get(&self.url)
            .query(&[(self.query_param.as_str(), text)])
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| QueryError::Decode(e.to_string()))
    }
}

/// Body of an error response, or a placeholder if it could not be read.
fn error_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    read.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Could not read error response body");
        UNREADABLE_BODY.to_string()
    })
}

const UNREADABLE_BODY: &str = "<unreadable body>";
