//! Backend service health
//!
//! The frontend depends on a handful of HTTP services. Each exposes
//! `GET /health`; a 200 means healthy, anything else is reported with enough
//! detail to tell a crashed service from a misrouted one. Probing never
//! fails as a whole: every service gets a status.

use std::fmt;

use futures_util::future::join_all;

use crate::config::{ServiceEndpoint, SmokeConfig};
use crate::probe::{HttpProbe, ProbeResponse, TransportFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// Answered with a non-200 status
    Http(u16),
    ConnectionError,
    Timeout,
    Error(String),
}

impl HealthStatus {
    pub fn from_response(response: &ProbeResponse) -> Self {
        match &response.failure {
            Some(TransportFailure::Connect(_)) => HealthStatus::ConnectionError,
            Some(TransportFailure::Timeout(_)) => HealthStatus::Timeout,
            Some(other) => HealthStatus::Error(other.to_string()),
            None if response.status == 200 => HealthStatus::Healthy,
            None => HealthStatus::Http(response.status),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Http(code) => write!(f, "HTTP {}", code),
            HealthStatus::ConnectionError => write!(f, "Connection Error"),
            HealthStatus::Timeout => write!(f, "Timeout"),
            HealthStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub name: String,
    /// Service base URL as configured (without `/health`)
    pub url: String,
    pub status: HealthStatus,
}

pub fn all_healthy(results: &[ServiceHealth]) -> bool {
    results.iter().all(|service| service.status.is_healthy())
}

pub struct BackendMonitor {
    probe: HttpProbe,
    services: Vec<ServiceEndpoint>,
}

impl BackendMonitor {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_probe(
            HttpProbe::new(config.backend_timeout()),
            config.services.clone(),
        )
    }

    pub fn with_probe(probe: HttpProbe, services: Vec<ServiceEndpoint>) -> Self {
        Self { probe, services }
    }

    /// Probe every service concurrently; results follow the configured order
    pub async fn check_all(&self) -> Vec<ServiceHealth> {
        let results = join_all(self.services.iter().map(|s| self.check_service(s))).await;

        let healthy = results.iter().filter(|r| r.status.is_healthy()).count();
        log::info!(
            "Backend health: {}/{} services healthy",
            healthy,
            results.len()
        );
        results
    }

    pub async fn check_service(&self, endpoint: &ServiceEndpoint) -> ServiceHealth {
        let health_url = format!("{}/health", endpoint.url.trim_end_matches('/'));
        let response = self.probe.get(&health_url).await;
        let status = HealthStatus::from_response(&response);

        if !status.is_healthy() {
            log::warn!("⚠ {} at {}: {}", endpoint.name, endpoint.url, status);
        }

        ServiceHealth {
            name: endpoint.name.clone(),
            url: endpoint.url.clone(),
            status,
        }
    }
}
