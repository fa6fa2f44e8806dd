//! Supabase client factory for Supalink.
//!
//! [`Supabase::from_env`] runs the whole start-up sequence: resolve
//! credentials, validate them, log diagnostics, and build a client that is
//! always usable at construction time. When credentials are missing the
//! client points at a placeholder project and requests fail when made.

pub mod client;
pub mod error;
pub mod factory;
pub mod probe;
pub mod tools;

pub use client::{QueryBuilder, SupabaseClient};
pub use error::DbError;
pub use factory::{Supabase, PLACEHOLDER_KEY, PLACEHOLDER_URL};
pub use probe::{test_connection, ProbeOutcome, NOT_CONFIGURED};

#[cfg(test)]
pub(crate) mod test_support;
