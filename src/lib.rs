//! OmniPDF smoke checks
//!
//! Checks that a deployed OmniPDF frontend (a Streamlit app) is up:
//! - Frontend smoke check: one GET against the app root, skipped when the app
//!   is not ready, asserting the page renders the `Streamlit` marker when it is
//! - Backend health: `GET /health` against every service the frontend uses
//! - Non-throwing HTTP probe underneath both

pub mod backend;
pub mod config;
pub mod probe;
pub mod report;
pub mod smoke;

pub use backend::{BackendMonitor, HealthStatus, ServiceHealth};
pub use config::{ConfigError, SmokeConfig};
pub use probe::{HttpProbe, ProbeResponse, TransportFailure};
pub use smoke::{SmokeCheck, SmokeError, SmokeOutcome};
