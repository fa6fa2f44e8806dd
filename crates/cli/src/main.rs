use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use supalink_app::AppContext;
use supalink_kernel::{DebugRegistry, EnvResolver, Settings};

/// Exit code for `check` when credentials are missing or malformed.
const EXIT_UNCONFIGURED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "supalink", version, about = "Inspect and probe the Supabase configuration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report which credential variables were found and whether they are valid
    Check,
    /// Query one row to verify the backend is reachable; prints the JSON outcome
    Probe,
    /// Serve the debug console regardless of the `debug.enabled` setting
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load supalink settings")?;
    supalink_telemetry::init(&settings.telemetry);

    let ctx = AppContext::bootstrap(settings, &EnvResolver::standard());
    tracing::info!(
        env = ctx.settings().environment.as_str(),
        command = ?cli.command,
        configured = ctx.is_configured(),
        "supalink cli starting"
    );

    match cli.command {
        Command::Check => {
            for line in ctx.supabase().diagnostics().lines() {
                println!("{line}");
            }
            Ok(if ctx.is_configured() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_UNCONFIGURED)
            })
        }
        Command::Probe => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            let outcome = runtime.block_on(ctx.test_connection());
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve { port } => {
            let mut debug = ctx.settings().debug.clone();
            if let Some(port) = port {
                debug.port = port;
            }

            let mut registry = DebugRegistry::new();
            ctx.register_debug_tools(&mut registry);

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(supalink_http::start_server(Arc::new(registry), &debug))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
