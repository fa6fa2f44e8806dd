use std::fmt;

use serde::Deserialize;

use crate::env::{EnvResolver, ResolutionReport, ANON_KEY_VARS, URL_VARS};

/// Project URL and anonymous key, resolved once at start-up.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub anon_key: String,
}

impl Credentials {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Resolve both values, leaving a field empty when no candidate is set.
    pub fn resolve(resolver: &EnvResolver) -> Self {
        Self {
            url: resolver.first_of(&URL_VARS).unwrap_or_default(),
            anon_key: resolver.first_of(&ANON_KEY_VARS).unwrap_or_default(),
        }
    }

    /// Like [`Credentials::resolve`], also reporting which candidates were present.
    pub fn resolve_with_report(resolver: &EnvResolver) -> (Self, ResolutionReport) {
        let candidates = [URL_VARS[0], URL_VARS[1], ANON_KEY_VARS[0], ANON_KEY_VARS[1]];
        (Self::resolve(resolver), resolver.report(&candidates))
    }
}

// The key must never reach logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field(
                "anon_key",
                &format_args!("<{} chars>", self.anon_key.chars().count()),
            )
            .finish()
    }
}

/// A rule the credentials did not satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingUrl,
    MissingKey,
    PlaceholderUrl,
    WrongScheme { expected: String },
    KeyTooShort { length: usize, minimum: usize },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "project URL is empty"),
            Self::MissingKey => write!(f, "anon key is empty"),
            Self::PlaceholderUrl => {
                write!(f, "project URL still points at the placeholder project")
            }
            Self::WrongScheme { expected } => {
                write!(f, "project URL must start with {expected}")
            }
            Self::KeyTooShort { length, minimum } => {
                write!(f, "anon key has {length} characters, expected more than {minimum}")
            }
        }
    }
}

/// Shape heuristics applied to resolved credentials.
///
/// These are sanity checks against unset or template values, not a guarantee
/// that the credentials authenticate.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ValidationRules {
    #[serde(default = "ValidationRules::default_required_scheme")]
    pub required_scheme: String,
    #[serde(default = "ValidationRules::default_placeholder_marker")]
    pub placeholder_marker: String,
    /// The key must be strictly longer than this many characters.
    ///
    /// Length is counted in Unicode scalar values (`char`s), not bytes or
    /// UTF-16 code units. Real anon keys are ASCII JWTs, where all three agree;
    /// a key made of astral-plane characters counts each one once.
    #[serde(default = "ValidationRules::default_min_key_len")]
    pub min_key_len: usize,
}

impl ValidationRules {
    fn default_required_scheme() -> String {
        "https://".to_string()
    }

    fn default_placeholder_marker() -> String {
        "placeholder".to_string()
    }

    fn default_min_key_len() -> usize {
        20
    }

    /// Every rule `credentials` breaks, in a stable order.
    pub fn failures(&self, credentials: &Credentials) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        let url = credentials.url.as_str();
        let key = credentials.anon_key.as_str();

        if url.is_empty() {
            failures.push(ValidationFailure::MissingUrl);
        } else {
            if !self.placeholder_marker.is_empty() && url.contains(&self.placeholder_marker) {
                failures.push(ValidationFailure::PlaceholderUrl);
            }
            if !url.starts_with(&self.required_scheme) {
                failures.push(ValidationFailure::WrongScheme {
                    expected: self.required_scheme.clone(),
                });
            }
        }

        if key.is_empty() {
            failures.push(ValidationFailure::MissingKey);
        } else {
            let length = key.chars().count();
            if length <= self.min_key_len {
                failures.push(ValidationFailure::KeyTooShort {
                    length,
                    minimum: self.min_key_len,
                });
            }
        }

        failures
    }

    pub fn is_valid(&self, credentials: &Credentials) -> bool {
        self.failures(credentials).is_empty()
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required_scheme: Self::default_required_scheme(),
            placeholder_marker: Self::default_placeholder_marker(),
            min_key_len: Self::default_min_key_len(),
        }
    }
}
