use supalink_kernel::diagnostics::{self, DiagnosticReport};
use supalink_kernel::env::ResolutionReport;
use supalink_kernel::settings::{ClientSettings, ProbeSettings, SupabaseSettings};
use supalink_kernel::{Credentials, EnvResolver, ValidationRules};

use crate::client::SupabaseClient;
use crate::probe::{self, ProbeOutcome};

/// URL the client falls back to when configuration is missing or malformed.
pub const PLACEHOLDER_URL: &str = "https://placeholder-project.supabase.co";

/// Key the client falls back to when configuration is missing or malformed.
pub const PLACEHOLDER_KEY: &str = "placeholder-key";

/// The application's Supabase handle together with its validity flag.
///
/// Construct one at start-up and share it (usually behind an `Arc`) with
/// everything that needs database access.
#[derive(Debug, Clone)]
pub struct Supabase {
    client: SupabaseClient,
    configured: bool,
    diagnostics: DiagnosticReport,
}

impl Supabase {
    /// Resolve credentials from `resolver`, validate, log diagnostics, and build the client.
    pub fn from_env(resolver: &EnvResolver, settings: &SupabaseSettings) -> Self {
        let (credentials, resolution) = Credentials::resolve_with_report(resolver);
        let supabase = Self::build(
            &credentials,
            resolution,
            &settings.validation,
            &settings.client,
        );
        diagnostics::emit(&supabase.diagnostics);
        supabase
    }

    /// Build a handle from already-resolved credentials. Never fails.
    pub fn connect(
        credentials: &Credentials,
        rules: &ValidationRules,
        settings: &ClientSettings,
    ) -> Self {
        Self::build(credentials, ResolutionReport::default(), rules, settings)
    }

    fn build(
        credentials: &Credentials,
        resolution: ResolutionReport,
        rules: &ValidationRules,
        settings: &ClientSettings,
    ) -> Self {
        let failures = rules.failures(credentials);
        let configured = failures.is_empty();
        let diagnostics = DiagnosticReport::build(&resolution, credentials, &failures);

        let client = if configured {
            SupabaseClient::new(&credentials.url, &credentials.anon_key, settings)
        } else {
            SupabaseClient::new(PLACEHOLDER_URL, PLACEHOLDER_KEY, settings)
        };

        Self {
            client,
            configured,
            diagnostics,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(client: SupabaseClient, configured: bool) -> Self {
        let diagnostics = if configured {
            DiagnosticReport::Configured {
                url: client.url().to_string(),
            }
        } else {
            DiagnosticReport::Unconfigured {
                found: Vec::new(),
                missing: Vec::new(),
                failures: Vec::new(),
            }
        };
        Self {
            client,
            configured,
            diagnostics,
        }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }

    /// Whether the resolved credentials passed validation
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// What start-up found when the handle was built
    pub fn diagnostics(&self) -> &DiagnosticReport {
        &self.diagnostics
    }

    /// Run the connectivity probe against this handle
    pub async fn test_connection(&self, settings: &ProbeSettings) -> ProbeOutcome {
        probe::test_connection(self, settings).await
    }
}
