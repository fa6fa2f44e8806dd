//! Local stand-in for the PostgREST endpoint used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

#[derive(Clone)]
pub enum ServerReply {
    Rows(serde_json::Value),
    Error { status: u16, message: &'static str },
    NotJson,
}

#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub table: String,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
    pub select: Option<String>,
    pub limit: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    reply: ServerReply,
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<SeenRequest>>>,
}

pub struct TestServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<SeenRequest>>>,
}

impl TestServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.last.lock().unwrap().clone()
    }
}

pub async fn spawn_rest_server(reply: ServerReply) -> TestServer {
    let state = ServerState {
        reply,
        hits: Arc::new(AtomicUsize::new(0)),
        last: Arc::new(Mutex::new(None)),
    };
    let hits = state.hits.clone();
    let last = state.last.clone();

    let app = Router::new()
        .route("/rest/v1/{table}", get(handle))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        url: format!("http://{}", addr),
        hits,
        last,
    }
}

async fn handle(
    State(state): State<ServerState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    *state.last.lock().unwrap() = Some(SeenRequest {
        table,
        apikey: header("apikey"),
        authorization: header("authorization"),
        select: params.get("select").cloned(),
        limit: params.get("limit").cloned(),
    });

    match state.reply {
        ServerReply::Rows(rows) => Json(rows).into_response(),
        ServerReply::Error { status, message } => (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({ "code": "PGRST000", "details": null, "hint": null, "message": message })),
        )
            .into_response(),
        ServerReply::NotJson => (StatusCode::OK, "<html>maintenance</html>").into_response(),
    }
}
