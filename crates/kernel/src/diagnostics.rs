//! Start-up diagnostics for the Supabase configuration.

use crate::credentials::{Credentials, ValidationFailure};
use crate::env::ResolutionReport;

/// Steps printed when configuration is missing or malformed.
pub const REMEDIATION: [&str; 3] = [
    "create a .env file in the project root",
    "set VITE_SUPABASE_URL and VITE_SUPABASE_ANON_KEY",
    "restart the application",
];

/// What start-up found, ready to be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReport {
    Configured {
        url: String,
    },
    Unconfigured {
        found: Vec<&'static str>,
        missing: Vec<&'static str>,
        failures: Vec<String>,
    },
}

impl DiagnosticReport {
    pub fn build(
        report: &ResolutionReport,
        credentials: &Credentials,
        failures: &[ValidationFailure],
    ) -> Self {
        if failures.is_empty() {
            return Self::Configured {
                url: credentials.url.clone(),
            };
        }

        Self::Unconfigured {
            found: report.found().collect(),
            missing: report.missing().collect(),
            failures: failures.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured { .. })
    }

    /// Human-readable lines, as printed by the CLI.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Configured { url } => vec![format!("Supabase configured: {url}")],
            Self::Unconfigured {
                found,
                missing,
                failures,
            } => {
                let mut lines = vec!["Supabase is not configured".to_string()];
                lines.extend(found.iter().map(|name| format!("  found:   {name}")));
                lines.extend(missing.iter().map(|name| format!("  missing: {name}")));
                lines.extend(failures.iter().map(|f| format!("  invalid: {f}")));
                lines.push("To fix:".to_string());
                lines.extend(
                    REMEDIATION
                        .iter()
                        .enumerate()
                        .map(|(i, step)| format!("  {}. {step}", i + 1)),
                );
                lines
            }
        }
    }
}

/// Write the report to the log. Never influences control flow.
pub fn emit(report: &DiagnosticReport) {
    match report {
        DiagnosticReport::Configured { url } => {
            tracing::info!(target: "supalink", %url, "Supabase configured");
        }
        DiagnosticReport::Unconfigured {
            found,
            missing,
            failures,
        } => {
            tracing::warn!(
                target: "supalink",
                ?found,
                ?missing,
                ?failures,
                remediation = ?REMEDIATION,
                "Supabase is not configured; using placeholder client"
            );
        }
    }
}
