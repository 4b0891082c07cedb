//! Human and JSON renderings of check results for the CLI

use serde::Serialize;

use crate::backend::ServiceHealth;
use crate::smoke::{SmokeError, SmokeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmokeReport {
    pub url: String,
    pub verdict: Verdict,
    pub status: u16,
    pub detail: String,
}

impl SmokeReport {
    pub fn from_result(result: &Result<SmokeOutcome, SmokeError>) -> Self {
        match result {
            Ok(SmokeOutcome::Passed { url, status }) => Self {
                url: url.clone(),
                verdict: Verdict::Passed,
                status: *status,
                detail: "marker found".to_string(),
            },
            Ok(SmokeOutcome::Skipped {
                url,
                status,
                reason,
            }) => Self {
                url: url.clone(),
                verdict: Verdict::Skipped,
                status: *status,
                detail: format!("App not ready: {}", reason),
            },
            Err(e @ SmokeError::MarkerMissing { url, .. }) => Self {
                url: url.clone(),
                verdict: Verdict::Failed,
                status: 200,
                detail: e.to_string(),
            },
        }
    }

    pub fn render_text(&self) -> String {
        let label = match self.verdict {
            Verdict::Passed => "✓ PASS",
            Verdict::Skipped => "- SKIP",
            Verdict::Failed => "✗ FAIL",
        };
        format!("{}  {}  ({})", label, self.url, self.detail)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub name: String,
    pub url: String,
    pub status: String,
    pub healthy: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackendReport {
    pub healthy: usize,
    pub total: usize,
    pub services: Vec<ServiceReport>,
}

impl BackendReport {
    pub fn from_results(results: &[ServiceHealth]) -> Self {
        let services: Vec<ServiceReport> = results
            .iter()
            .map(|service| ServiceReport {
                name: service.name.clone(),
                url: service.url.clone(),
                status: service.status.to_string(),
                healthy: service.status.is_healthy(),
            })
            .collect();

        Self {
            healthy: services.iter().filter(|s| s.healthy).count(),
            total: services.len(),
            services,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::from("🔧 Backend Services Status\n");
        if self.services.is_empty() {
            out.push_str("  (no services configured)\n");
            return out;
        }

        for service in &self.services {
            if service.healthy {
                out.push_str(&format!("  ✅ {}  Status: {}\n", service.name, service.status));
            } else {
                // Unhealthy entries carry the URL so misrouted services are obvious
                out.push_str(&format!(
                    "  ❌ {}  Status: {}  URL: {}\n",
                    service.name, service.status, service.url
                ));
            }
        }
        out.push_str(&format!("{}/{} healthy\n", self.healthy, self.total));
        out
    }
}
