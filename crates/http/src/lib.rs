//! Debug console: an opt-in HTTP surface for manually invoking the debug
//! tools a host registered.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};

use supalink_kernel::settings::DebugSettings;
use supalink_kernel::DebugRegistry;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the debug console and serve until the process exits
pub async fn start_server(
    registry: Arc<DebugRegistry>,
    settings: &DebugSettings,
) -> anyhow::Result<()> {
    let app = build_router(registry.clone(), settings);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", settings.host, settings.port))
        .await
        .context("failed to bind to address")?;

    tracing::info!(
        tools = ?registry.names(),
        "debug console listening on http://{}:{}",
        settings.host,
        settings.port
    );

    axum::serve(listener, app)
        .await
        .context("debug console failed")?;

    Ok(())
}

/// Build the console router with health check and tool routes
pub fn build_router(registry: Arc<DebugRegistry>, settings: &DebugSettings) -> Router {
    // Layers only wrap routes added before them. Tool routes are mounted after
    // the timeout so a slow backend reports its own failure instead of a 408;
    // `supabase.client.request_timeout_ms` bounds those calls.
    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .with_timeout(settings.request_timeout_ms)
        .mount_tools(registry)
        .with_tracing()
        .with_request_id()
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use supalink_kernel::DebugTool;
    use tower::ServiceExt;

    struct SlowTool;

    #[async_trait::async_trait]
    impl DebugTool for SlowTool {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn invoke(&self) -> anyhow::Result<serde_json::Value> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(serde_json::json!({ "success": true }))
        }
    }

    #[tokio::test]
    async fn healthz() {
        let app = build_router(Arc::new(DebugRegistry::new()), &DebugSettings::default());
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn empty_registry_lists_nothing() {
        let app = build_router(Arc::new(DebugRegistry::new()), &DebugSettings::default());
        let response = app
            .oneshot(Request::get("/debug/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn tool_invocation_outlives_console_timeout() {
        let mut registry = DebugRegistry::new();
        registry.register(Arc::new(SlowTool));
        let settings = DebugSettings {
            request_timeout_ms: 50,
            ..DebugSettings::default()
        };
        let app = build_router(Arc::new(registry), &settings);

        let response = app
            .oneshot(
                Request::post("/debug/tools/slow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true }));
    }
}
