//! Supalink application library.
//!
//! [`AppContext::bootstrap`] performs the one-time start-up sequence and
//! owns the resulting Supabase handle. Code that needs database access
//! receives the handle from the context instead of reaching for a global.

use std::sync::Arc;

use supalink_db::{tools, ProbeOutcome, Supabase};
use supalink_kernel::{DebugRegistry, EnvResolver, Settings};

/// Everything built during start-up
pub struct AppContext {
    settings: Settings,
    supabase: Arc<Supabase>,
}

impl AppContext {
    /// Resolve credentials, log diagnostics, and build the shared client.
    ///
    /// Never fails: missing credentials yield a placeholder-backed handle.
    pub fn bootstrap(settings: Settings, resolver: &EnvResolver) -> Self {
        tracing::info!(
            env = ?settings.environment,
            sources = ?resolver.source_names(),
            "supalink bootstrap starting"
        );

        let supabase = Arc::new(Supabase::from_env(resolver, &settings.supabase));

        tracing::info!(configured = supabase.is_configured(), "supalink bootstrap complete");
        Self { settings, supabase }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared handle; clone the `Arc` to hand it to other components
    pub fn supabase(&self) -> &Arc<Supabase> {
        &self.supabase
    }

    pub fn is_configured(&self) -> bool {
        self.supabase.is_configured()
    }

    /// Run the connectivity probe with the configured probe settings
    pub async fn test_connection(&self) -> ProbeOutcome {
        self.supabase
            .test_connection(&self.settings.supabase.probe)
            .await
    }

    /// Register the Supabase debug tools with a host-provided registry
    pub fn register_debug_tools(&self, registry: &mut DebugRegistry) {
        tools::register(
            registry,
            self.supabase.clone(),
            self.settings.supabase.probe.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use supalink_kernel::env::MapEnv;

    const GOOD_KEY: &str = "abcdefghijklmnopqrstuvwxyz0123456789ABCDE";

    fn bootstrap(vars: MapEnv) -> AppContext {
        AppContext::bootstrap(Settings::default(), &EnvResolver::empty().with_source(vars))
    }

    #[test]
    fn bootstrap_with_credentials_is_configured() {
        let ctx = bootstrap(
            MapEnv::new()
                .with("SUPABASE_URL", "https://abc.supabase.co")
                .with("SUPABASE_ANON_KEY", GOOD_KEY),
        );
        assert!(ctx.is_configured());
        assert_eq!(ctx.supabase().client().url(), "https://abc.supabase.co");
    }

    #[tokio::test]
    async fn bootstrap_without_credentials_degrades() {
        let ctx = bootstrap(MapEnv::new());
        assert!(!ctx.is_configured());
        assert_eq!(ctx.supabase().client().url(), supalink_db::PLACEHOLDER_URL);

        let outcome = ctx.test_connection().await;
        assert_eq!(outcome, ProbeOutcome::failed(supalink_db::NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn debug_tools_share_the_context_handle() {
        let ctx = bootstrap(MapEnv::new());
        let mut registry = DebugRegistry::new();
        ctx.register_debug_tools(&mut registry);

        assert_eq!(registry.len(), 2);
        // Registry and context hold the same handle.
        assert_eq!(Arc::strong_count(ctx.supabase()), 3);

        let described = registry.invoke("supabase").await.unwrap();
        assert_eq!(described["configured"], json!(false));
    }
}
