use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::credentials::ValidationRules;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SUPALINK_ENV";
const CONFIG_DIR_ENV: &str = "SUPALINK_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
///
/// Supabase credentials are deliberately not part of this structure; they
/// are resolved through [`crate::EnvResolver`] so the fixed variable names
/// keep working regardless of config layering.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment: Environment = std::env::var(ENV_VAR_NAME)
            .unwrap_or_else(|_| DEFAULT_ENV.to_string())
            .parse()?;

        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to the `config` directory under the working directory.
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let builder = Self::file_layers(&config_dir, &environment).add_source(
            config::Environment::with_prefix("SUPALINK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::build(builder, environment)
    }

    /// Load configuration from files only, skipping `.env` and process variables.
    pub fn load_from(config_dir: &Path, environment: Environment) -> anyhow::Result<Self> {
        let builder = Self::file_layers(config_dir, &environment);
        Self::build(builder, environment)
    }

    fn file_layers(
        config_dir: &Path,
        environment: &Environment,
    ) -> config::ConfigBuilder<config::builder::DefaultState> {
        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment.as_str()));

        config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: Environment,
    ) -> anyhow::Result<Self> {
        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything written in the files.
        settings.environment = environment;

        Ok(settings)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SupabaseSettings {
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub client: ClientSettings,
}

/// What the connectivity probe reads.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProbeSettings {
    #[serde(default = "ProbeSettings::default_table")]
    pub table: String,
    #[serde(default = "ProbeSettings::default_columns")]
    pub columns: String,
    #[serde(default = "ProbeSettings::default_limit")]
    pub limit: usize,
}

impl ProbeSettings {
    fn default_table() -> String {
        "profiles".to_string()
    }

    fn default_columns() -> String {
        "*".to_string()
    }

    fn default_limit() -> usize {
        1
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            table: Self::default_table(),
            columns: Self::default_columns(),
            limit: Self::default_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Per-request timeout. Unset means the HTTP client's own behavior applies.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebugSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "DebugSettings::default_host")]
    pub host: String,
    #[serde(default = "DebugSettings::default_port")]
    pub port: u16,
    /// Timeout for `/healthz`. Tool invocations are not cut off by it.
    #[serde(default = "DebugSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl DebugSettings {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        8787
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}
