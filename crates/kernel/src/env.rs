//! Environment variable resolution across build-time and process sources.
//!
//! Every lookup is a capability query: a source either has a non-empty
//! value for a key or it does not. Access failures (missing variable,
//! non-unicode contents) are reported as absence and never surface as errors.

use std::collections::BTreeMap;

/// Candidate names for the project URL, in precedence order.
pub const URL_VARS: [&str; 2] = ["VITE_SUPABASE_URL", "SUPABASE_URL"];

/// Candidate names for the anonymous API key, in precedence order.
pub const ANON_KEY_VARS: [&str; 2] = ["VITE_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY"];

/// A place environment values can come from.
pub trait EnvSource: Send + Sync {
    /// Short label used in diagnostics.
    fn name(&self) -> &'static str;

    /// Look up `key`, returning `None` when the source does not define it.
    fn get(&self, key: &str) -> Option<String>;
}

/// Values injected by the build tool when the crate was compiled.
///
/// Only the four credential variables are captured; anything else is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildEnv;

impl EnvSource for BuildEnv {
    fn name(&self) -> &'static str {
        "build"
    }

    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "VITE_SUPABASE_URL" => option_env!("VITE_SUPABASE_URL"),
            "SUPABASE_URL" => option_env!("SUPABASE_URL"),
            "VITE_SUPABASE_ANON_KEY" => option_env!("VITE_SUPABASE_ANON_KEY"),
            "SUPABASE_ANON_KEY" => option_env!("SUPABASE_ANON_KEY"),
            _ => None,
        };
        value.map(str::to_string)
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn name(&self) -> &'static str {
        "process"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory variables, for tests and embedders that manage their own config.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn name(&self) -> &'static str {
        "map"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Outcome of looking up a single candidate variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub name: &'static str,
    /// Label of the source that supplied a non-empty value, if any.
    pub found_in: Option<&'static str>,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        self.found_in.is_some()
    }
}

/// Presence of every candidate variable, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub lookups: Vec<Lookup>,
}

impl ResolutionReport {
    pub fn found(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lookups
            .iter()
            .filter(|l| l.is_found())
            .map(|l| l.name)
    }

    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lookups
            .iter()
            .filter(|l| !l.is_found())
            .map(|l| l.name)
    }
}

/// Ordered set of sources; earlier sources win.
pub struct EnvResolver {
    sources: Vec<Box<dyn EnvSource>>,
}

impl EnvResolver {
    /// A resolver with no sources. Every lookup is absent.
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Build-time values first, then the process environment.
    pub fn standard() -> Self {
        Self::empty().with_source(BuildEnv).with_source(ProcessEnv)
    }

    /// Append a source with lower precedence than the existing ones.
    pub fn with_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// First non-empty value for `key`, along with the source that supplied it.
    pub fn lookup(&self, key: &str) -> Option<(&'static str, String)> {
        self.sources.iter().find_map(|source| {
            source
                .get(key)
                .filter(|value| !value.is_empty())
                .map(|value| (source.name(), value))
        })
    }

    /// First non-empty value for `key` across all sources.
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.lookup(key).map(|(_, value)| value)
    }

    /// Try each candidate name in order; the first non-empty value wins.
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.resolve(key))
    }

    /// Record which of `keys` are defined, without short-circuiting.
    pub fn report(&self, keys: &[&'static str]) -> ResolutionReport {
        let lookups = keys
            .iter()
            .map(|&name| Lookup {
                name,
                found_in: self.lookup(name).map(|(source, _)| source),
            })
            .collect();
        ResolutionReport { lookups }
    }
}

impl Default for EnvResolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for EnvResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvResolver")
            .field("sources", &self.source_names())
            .finish()
    }
}
