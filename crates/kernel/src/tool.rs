use async_trait::async_trait;

/// A named operation a host exposes for manual invocation while debugging.
///
/// Tools are registered explicitly with a [`crate::DebugRegistry`]; nothing
/// is attached to shared global state.
#[async_trait]
pub trait DebugTool: Send + Sync {
    /// Unique name the tool is invoked by
    fn name(&self) -> &'static str;

    /// One-line summary shown in tool listings
    fn describe(&self) -> &'static str {
        ""
    }

    /// Run the tool and return a JSON-serializable result
    async fn invoke(&self) -> anyhow::Result<serde_json::Value>;
}
