//! # Smoke Check Error Types
//!
//! Only one condition fails a smoke check: the frontend answered 200 but the
//! rendered page lacks the marker. An unready or unreachable app is reported
//! as a skip, never as an error.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmokeError {
    #[error("Expected to find content '{marker}' at {url} but it was not present")]
    MarkerMissing { marker: String, url: String },
}

impl SmokeError {
    pub fn marker_missing(marker: impl Into<String>, url: impl Into<String>) -> Self {
        SmokeError::MarkerMissing {
            marker: marker.into(),
            url: url.into(),
        }
    }
}
