//! Non-throwing HTTP GET
//!
//! Every request produces a [`ProbeResponse`], whatever the outcome. A 404 or
//! 500 comes back as a normal response with that status. A connection that
//! never yields a response comes back with status `0` and a
//! [`TransportFailure`] describing what went wrong. Callers branch on the
//! status instead of handling errors.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

/// Status recorded when no HTTP response was received
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Why a probe produced no usable response
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum TransportFailure {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl TransportFailure {
    fn from_send_error(error: &reqwest::Error) -> Self {
        let message = error.to_string();
        // A connect timeout reports both `is_connect` and `is_timeout`; it
        // counts as a connection failure.
        if error.is_builder() {
            TransportFailure::InvalidUrl(message)
        } else if error.is_connect() {
            TransportFailure::Connect(message)
        } else if error.is_timeout() {
            TransportFailure::Timeout(message)
        } else {
            TransportFailure::Other(message)
        }
    }
}

/// Outcome of a single GET request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResponse {
    pub url: String,
    /// HTTP status code, or [`NO_RESPONSE_STATUS`] when nothing came back
    pub status: u16,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TransportFailure>,
}

impl ProbeResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
            failure: None,
        }
    }

    /// A response for a request that never reached an HTTP status
    pub fn unreachable(url: impl Into<String>, failure: TransportFailure) -> Self {
        Self {
            url: url.into(),
            status: NO_RESPONSE_STATUS,
            body: String::new(),
            failure: Some(failure),
        }
    }

    /// The application answered 200 and its body was read
    pub fn is_ready(&self) -> bool {
        self.status == 200 && self.failure.is_none()
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.body.contains(marker)
    }
}

/// Issues GET requests that never fail on status codes
///
/// `timeout` bounds connecting and, separately, waiting for the response, so
/// a request takes at most twice `timeout` end to end.
#[derive(Clone, Debug)]
pub struct HttpProbe {
    client: Client,
    request_timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            request_timeout: timeout * 2,
        }
    }

    pub async fn get(&self, url: &str) -> ProbeResponse {
        log::debug!("GET {} (timeout {:?})", url, self.request_timeout);

        // `send` only errors on transport problems; status codes are never
        // promoted to errors since `error_for_status` is not called.
        let response = match self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let failure = TransportFailure::from_send_error(&e);
                log::debug!("GET {} -> no response: {}", url, failure);
                return ProbeResponse::unreachable(url, failure);
            }
        };

        let status = response.status().as_u16();
        log::debug!("GET {} -> {}", url, status);

        match response.text().await {
            Ok(body) => ProbeResponse::new(url, status, body),
            Err(e) => ProbeResponse {
                url: url.to_string(),
                status,
                body: String::new(),
                failure: Some(TransportFailure::Body(e.to_string())),
            },
        }
    }
}
