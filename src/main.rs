use std::sync::Arc;

use anyhow::Context;
use supalink_app::AppContext;
use supalink_kernel::{DebugRegistry, EnvResolver, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load supalink settings")?;
    supalink_telemetry::init(&settings.telemetry);

    let ctx = AppContext::bootstrap(settings, &EnvResolver::standard());

    if !ctx.settings().debug.enabled {
        tracing::info!("debug console disabled; nothing left to serve");
        return Ok(());
    }

    let mut registry = DebugRegistry::new();
    ctx.register_debug_tools(&mut registry);

    supalink_http::start_server(Arc::new(registry), &ctx.settings().debug)
        .await
        .context("debug console stopped")
}
