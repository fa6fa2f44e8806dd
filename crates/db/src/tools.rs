//! Debug tools exposing the Supabase handle and probe for manual use.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use supalink_kernel::settings::ProbeSettings;
use supalink_kernel::{DebugRegistry, DebugTool};

use crate::factory::Supabase;

pub const HANDLE_TOOL: &str = "supabase";
pub const PROBE_TOOL: &str = "testSupabaseConnection";

/// Describes the shared handle. The anon key is never included.
pub struct HandleTool {
    supabase: Arc<Supabase>,
}

#[async_trait]
impl DebugTool for HandleTool {
    fn name(&self) -> &'static str {
        HANDLE_TOOL
    }

    fn describe(&self) -> &'static str {
        "Show the Supabase URL and whether credentials are configured"
    }

    async fn invoke(&self) -> anyhow::Result<serde_json::Value> {
        Ok(json!({
            "url": self.supabase.client().url(),
            "configured": self.supabase.is_configured(),
        }))
    }
}

/// Runs the connectivity probe.
pub struct ProbeTool {
    supabase: Arc<Supabase>,
    settings: ProbeSettings,
}

#[async_trait]
impl DebugTool for ProbeTool {
    fn name(&self) -> &'static str {
        PROBE_TOOL
    }

    fn describe(&self) -> &'static str {
        "Query one row to check the Supabase connection"
    }

    async fn invoke(&self) -> anyhow::Result<serde_json::Value> {
        let outcome = self.supabase.test_connection(&self.settings).await;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// Register the handle and probe tools under their fixed names.
pub fn register(registry: &mut DebugRegistry, supabase: Arc<Supabase>, settings: ProbeSettings) {
    registry.register(Arc::new(HandleTool {
        supabase: supabase.clone(),
    }));
    registry.register(Arc::new(ProbeTool { supabase, settings }));
}
