use thiserror::Error;

/// Errors raised by calls made through a [`crate::SupabaseClient`]
#[derive(Debug, Error)]
pub enum DbError {
    /// The HTTP client could not be built; reported on first use
    #[error("HTTP client unavailable: {0}")]
    ClientUnavailable(String),

    /// Request could not be sent or the response could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The REST API answered with an error object
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Response body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DbError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            DbError::Api { status, .. } => Some(*status),
            DbError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_message() {
        let err = DbError::Api {
            status: 404,
            code: Some("42P01".to_string()),
            message: "relation \"public.profiles\" does not exist".to_string(),
        };
        assert_eq!(err.to_string(), "relation \"public.profiles\" does not exist");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn client_unavailable_has_no_status() {
        let err = DbError::ClientUnavailable("no tls backend".to_string());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("no tls backend"));
    }
}
