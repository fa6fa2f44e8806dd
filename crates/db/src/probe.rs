//! On-demand connectivity check.

use serde::{Deserialize, Serialize};
use supalink_kernel::settings::ProbeSettings;

use crate::factory::Supabase;

/// Error reported when the probe runs against a placeholder handle.
pub const NOT_CONFIGURED: &str = "Not configured";

/// Result of a probe, serialized as `{success, data?, error?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Issue one read-only query to confirm the backend is reachable.
///
/// Never returns an error: every failure is folded into the outcome and
/// mirrored to the log. Unconfigured handles short-circuit without I/O.
pub async fn test_connection(supabase: &Supabase, settings: &ProbeSettings) -> ProbeOutcome {
    if !supabase.is_configured() {
        tracing::warn!(target: "supalink", "connection test skipped: Supabase is not configured");
        return ProbeOutcome::failed(NOT_CONFIGURED);
    }

    tracing::info!(
        target: "supalink",
        url = %supabase.client().url(),
        table = %settings.table,
        "testing Supabase connection"
    );

    let result = supabase
        .client()
        .from(settings.table.as_str())
        .select(settings.columns.as_str())
        .limit(settings.limit)
        .execute()
        .await;

    match result {
        Ok(data) => {
            tracing::info!(
                target: "supalink",
                table = %settings.table,
                "Supabase connection test succeeded"
            );
            ProbeOutcome::ok(data)
        }
        Err(e) => {
            tracing::error!(
                target: "supalink",
                error = %e,
                status = ?e.status(),
                "Supabase connection test failed"
            );
            ProbeOutcome::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SupabaseClient;
    use crate::test_support::{spawn_rest_server, ServerReply};
    use serde_json::json;
    use supalink_kernel::settings::ClientSettings;
    use supalink_kernel::{Credentials, ValidationRules};

    fn local(url: &str, configured: bool) -> Supabase {
        Supabase::from_parts(
            SupabaseClient::new(url, "local-anon-key-0123456789", &ClientSettings::default()),
            configured,
        )
    }

    #[tokio::test]
    async fn unconfigured_probe_short_circuits() {
        let server = spawn_rest_server(ServerReply::Rows(json!([]))).await;
        let supabase = local(&server.url, false);

        let outcome = test_connection(&supabase, &ProbeSettings::default()).await;

        assert_eq!(outcome, ProbeOutcome::failed("Not configured"));
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn unconfigured_outcome_serializes_exactly() {
        let supabase = Supabase::connect(
            &Credentials::default(),
            &ValidationRules::default(),
            &ClientSettings::default(),
        );
        let outcome = supabase.test_connection(&ProbeSettings::default()).await;
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "success": false, "error": "Not configured" })
        );
    }

    #[tokio::test]
    async fn successful_probe_returns_rows() {
        let rows = json!([{ "id": "0b6e", "username": "ada" }]);
        let server = spawn_rest_server(ServerReply::Rows(rows.clone())).await;
        let supabase = local(&server.url, true);

        let outcome = test_connection(&supabase, &ProbeSettings::default()).await;

        assert_eq!(outcome, ProbeOutcome::ok(rows));
        let seen = server.last_request().unwrap();
        assert_eq!(seen.table, "profiles");
        assert_eq!(seen.limit.as_deref(), Some("1"));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn api_error_becomes_failure_message() {
        let server = spawn_rest_server(ServerReply::Error {
            status: 404,
            message: "relation \"public.profiles\" does not exist",
        })
        .await;
        let supabase = local(&server.url, true);

        let outcome = test_connection(&supabase, &ProbeSettings::default()).await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("relation \"public.profiles\" does not exist")
        );
        assert!(outcome.data.is_none());
    }

    #[tokio::test]
    async fn transport_error_becomes_failure_message() {
        // Bind and drop a listener so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let supabase = local(&format!("http://{}", addr), true);

        let outcome = test_connection(&supabase, &ProbeSettings::default()).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("request failed"));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_failure() {
        let server = spawn_rest_server(ServerReply::NotJson).await;
        let supabase = local(&server.url, true);

        let outcome = test_connection(&supabase, &ProbeSettings::default()).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("invalid response body"));
    }

    #[tokio::test]
    async fn concurrent_probes_share_one_handle() {
        let server = spawn_rest_server(ServerReply::Rows(json!([]))).await;
        let supabase = std::sync::Arc::new(local(&server.url, true));
        let settings = ProbeSettings::default();

        let (a, b) = tokio::join!(
            test_connection(&supabase, &settings),
            test_connection(&supabase, &settings)
        );

        assert!(a.success && b.success);
        assert_eq!(server.hits(), 2);
    }
}
