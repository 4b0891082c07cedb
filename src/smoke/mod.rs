//! Frontend smoke check
//!
//! One GET against the frontend, then one branch:
//!
//! - status other than 200 (including no response at all): log that the app
//!   is not ready and succeed with [`SmokeOutcome::Skipped`]
//! - status 200: the body must contain the marker, otherwise
//!   [`SmokeError::MarkerMissing`]
//!
//! No retries. The request honors the configured timeout and nothing else.

pub mod errors;

use serde::Serialize;

use crate::config::SmokeConfig;
use crate::probe::{HttpProbe, ProbeResponse};

pub use errors::SmokeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SmokeOutcome {
    /// The app answered 200 and rendered the marker
    Passed { url: String, status: u16 },
    /// The app was not ready; not a failure
    Skipped {
        url: String,
        status: u16,
        reason: String,
    },
}

impl SmokeOutcome {
    pub fn url(&self) -> &str {
        match self {
            SmokeOutcome::Passed { url, .. } | SmokeOutcome::Skipped { url, .. } => url,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            SmokeOutcome::Passed { status, .. } | SmokeOutcome::Skipped { status, .. } => *status,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SmokeOutcome::Skipped { .. })
    }
}

/// Decide the outcome for a response already in hand.
pub fn evaluate(response: &ProbeResponse, marker: &str) -> Result<SmokeOutcome, SmokeError> {
    if !response.is_ready() {
        let reason = match &response.failure {
            Some(failure) => failure.to_string(),
            None => format!("HTTP {}", response.status),
        };
        log::info!(
            "App not ready, skipping test ({}: {})",
            response.url,
            reason
        );
        return Ok(SmokeOutcome::Skipped {
            url: response.url.clone(),
            status: response.status,
            reason,
        });
    }

    if !response.contains(marker) {
        return Err(SmokeError::marker_missing(marker, response.url.clone()));
    }

    log::info!("✓ Found '{}' at {}", marker, response.url);
    Ok(SmokeOutcome::Passed {
        url: response.url.clone(),
        status: response.status,
    })
}

/// Smoke check against a single frontend page
#[derive(Clone, Debug)]
pub struct SmokeCheck {
    probe: HttpProbe,
    url: String,
    marker: String,
}

impl SmokeCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_probe(
            HttpProbe::new(config.timeout()),
            config.target_url(),
            config.marker.clone(),
        )
    }

    pub fn with_probe(probe: HttpProbe, url: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            probe,
            url: url.into(),
            marker: marker.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub async fn run(&self) -> Result<SmokeOutcome, SmokeError> {
        let response = self.probe.get(&self.url).await;
        evaluate(&response, &self.marker)
    }

    /// Run the check inside a test: panics when the marker is missing,
    /// returns normally when the app passed or was not ready.
    pub async fn assert_ready(&self) -> SmokeOutcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(e) => panic!("{}", e),
        }
    }
}
