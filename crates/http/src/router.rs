//! Router builder for the debug console

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use supalink_kernel::DebugRegistry;

use crate::error::AppError;

/// Entry in the tool listing
#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Builder for constructing the debug console router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount the registry's tools under `/debug/tools`
    pub fn mount_tools(mut self, registry: Arc<DebugRegistry>) -> Self {
        let tools = Router::new()
            .route("/tools", get(list_tools))
            .route("/tools/{name}", post(invoke_tool))
            .with_state(registry);
        self.router = self.router.nest("/debug", tools);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_request(DefaultOnRequest::new().level(tracing::Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn list_tools(State(registry): State<Arc<DebugRegistry>>) -> Json<Vec<ToolInfo>> {
    let tools = registry
        .tools()
        .iter()
        .map(|tool| ToolInfo {
            name: tool.name(),
            description: tool.describe(),
        })
        .collect();
    Json(tools)
}

async fn invoke_tool(
    State(registry): State<Arc<DebugRegistry>>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = registry
        .get(&name)
        .ok_or_else(|| AppError::not_found(format!("no debug tool named '{}'", name)))?;

    tracing::info!(tool = %name, "invoking debug tool over HTTP");
    let value = tool.invoke().await?;
    Ok(Json(value))
}
