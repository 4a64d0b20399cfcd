//! Credential resolution for the Supabase RPC call.
//!
//! Both values come from the command line or the process environment (a
//! `.env` file in the working directory is loaded at startup). Nothing is
//! ever written to disk.

use log::debug;
use std::{error::Error, fmt};

/// Base URL of the Supabase project.
pub const SUPABASE_URL: &str = "SUPABASE_URL";
/// Fallback for the base URL, shared with the web app's public config.
pub const NEXT_PUBLIC_SUPABASE_URL: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Service role key used as both the `apikey` and the bearer token.
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Resolved credentials for the upload.
#[derive(Clone)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Credentials {
    pub base_url: String,
    pub service_role_key: String,
}

/// Errors that can occur while resolving credentials.
#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is unset or empty
    MissingCredential(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCredential(name) => write!(
                f,
                "Missing required environment variable: {name}. Set this to \
                 your Supabase environment value before running."
            ),
        }
    }
}

impl Error for ConfigError {}

// Never print the key, even in debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

/// Returns the value if it is present and non-empty.
pub fn require(
    name: &'static str,
    value: Option<String>,
) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(name)),
    }
}

impl Credentials {
    /// Resolve the credentials, URL first.
    ///
    /// `fallback_url` (from `NEXT_PUBLIC_SUPABASE_URL`) is only used when
    /// `base_url` is unset or empty.
    pub fn resolve(
        base_url: Option<String>,
        fallback_url: Option<String>,
        service_role_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.filter(|url| !url.is_empty()).or_else(|| {
            let url = fallback_url?;
            debug!("Using {NEXT_PUBLIC_SUPABASE_URL} for the Supabase URL");
            Some(url)
        });

        let base_url = require(SUPABASE_URL, base_url)?;
        let service_role_key =
            require(SUPABASE_SERVICE_ROLE_KEY, service_role_key)?;

        Ok(Self {
            base_url,
            service_role_key,
        })
    }
}

// --- Tests ---
