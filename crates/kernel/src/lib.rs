//! Core building blocks for Supalink: layered settings, environment
//! resolution, credential validation, start-up diagnostics, and the
//! debug-tool registry hosts use to expose manual operations.

pub mod credentials;
pub mod diagnostics;
pub mod env;
pub mod registry;
pub mod settings;
pub mod tool;

pub use credentials::{Credentials, ValidationFailure, ValidationRules};
pub use env::{EnvResolver, EnvSource};
pub use registry::DebugRegistry;
pub use settings::Settings;
pub use tool::DebugTool;
