//! Minimal Supabase REST (PostgREST) client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use supalink_kernel::settings::ClientSettings;

use crate::error::DbError;

/// Handle bound to one project URL and anon key.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Result<reqwest::Client, String>,
    url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client. Never fails: an HTTP client that cannot be built is
    /// reported as [`DbError::ClientUnavailable`] on the first request.
    pub fn new(
        url: impl Into<String>,
        anon_key: impl Into<String>,
        settings: &ClientSettings,
    ) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = settings.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let http = builder.build().map_err(|e| {
            tracing::warn!(error = %e, "failed to build HTTP client for Supabase");
            e.to_string()
        });

        Self {
            http,
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Project URL this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Anon key sent with every request
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Start a query against `table`
    pub fn from(&self, table: impl Into<String>) -> QueryBuilder<'_> {
        QueryBuilder {
            client: self,
            table: table.into(),
            columns: "*".to_string(),
            limit: None,
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), table)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // A key that is not a valid header value goes out without auth; the
        // server rejects the request and the caller sees that error.
        match (
            HeaderValue::from_str(&self.anon_key),
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key)),
        ) {
            (Ok(apikey), Ok(bearer)) => {
                headers.insert("apikey", apikey);
                headers.insert(AUTHORIZATION, bearer);
            }
            _ => {
                tracing::warn!(
                    url = %self.url,
                    "anon key is not a valid HTTP header value; sending request without apikey and authorization headers"
                );
            }
        }
        headers
    }
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.url)
            .field("http_ready", &self.http.is_ok())
            .finish_non_exhaustive()
    }
}

/// Read query under construction, mirroring `from(table).select(..).limit(..)`.
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table: String,
    columns: String,
    limit: Option<usize>,
}

/// Error object returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
    error: Option<String>,
}

impl<'a> QueryBuilder<'a> {
    /// Columns to return, in PostgREST `select` syntax
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Maximum number of rows
    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Send the query and return the decoded JSON rows
    pub async fn execute(self) -> Result<serde_json::Value, DbError> {
        let http = self
            .client
            .http
            .as_ref()
            .map_err(|e| DbError::ClientUnavailable(e.clone()))?;

        let mut query = vec![("select", self.columns.clone())];
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }

        tracing::debug!(
            table = %self.table,
            columns = %self.columns,
            limit = ?self.limit,
            "querying Supabase"
        );

        let response = http
            .get(self.client.rest_url(&self.table))
            .headers(self.client.auth_headers())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn api_error(status: u16, body: &str) -> DbError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("request failed with status {}", status)
            } else {
                body.trim().to_string()
            }
        });

    DbError::Api {
        status,
        code,
        message,
    }
}
