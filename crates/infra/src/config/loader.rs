//! Configuration loader
//!
//! Loads application configuration from environment variables, with
//! defaults for everything that is unset.
//!
//! ## Environment Variables
//! - `PARTSYNC_BASE_URL`: API base URL (default `https://cad.onshape.com`)
//! - `PARTSYNC_TIMEOUT_SECS`: Per-request timeout in seconds (default 30)
//! - `PARTSYNC_MAX_CONCURRENCY`: Cap on in-flight row updates (default
//!   unbounded)
//! - `PARTSYNC_CATALOG_DOCUMENT_LIMIT`: Documents per catalog walk
//!   (default 50)

use partsync_domain::{
    ApiConfig, CatalogConfig, Config, PartSyncError, Result, SyncConfig,
};

/// Load configuration from the process environment.
///
/// Unset variables fall back to their defaults.
///
/// # Errors
/// Returns `PartSyncError::Config` when a variable is set but cannot be
/// parsed.
pub fn load() -> Result<Config> {
    let config = load_from(|name| std::env::var(name).ok())?;
    tracing::info!(base_url = %config.api.base_url, "configuration loaded from environment");
    Ok(config)
}

/// Load configuration through an arbitrary variable lookup.
///
/// # Errors
/// Returns `PartSyncError::Config` when a present value cannot be parsed.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let defaults = ApiConfig::default();
    let base_url = lookup("PARTSYNC_BASE_URL").unwrap_or(defaults.base_url);
    let timeout_seconds = parse_or(
        lookup("PARTSYNC_TIMEOUT_SECS"),
        defaults.timeout_seconds,
        "PARTSYNC_TIMEOUT_SECS",
    )?;

    let max_concurrency = match lookup("PARTSYNC_MAX_CONCURRENCY") {
        Some(raw) => Some(raw.parse::<usize>().map_err(|e| {
            PartSyncError::Config(format!("Invalid PARTSYNC_MAX_CONCURRENCY: {e}"))
        })?),
        None => None,
    };

    let document_limit = parse_or(
        lookup("PARTSYNC_CATALOG_DOCUMENT_LIMIT"),
        CatalogConfig::default().document_limit,
        "PARTSYNC_CATALOG_DOCUMENT_LIMIT",
    )?;

    Ok(Config {
        api: ApiConfig { base_url, timeout_seconds },
        sync: SyncConfig { max_concurrency },
        catalog: CatalogConfig { document_limit },
    })
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T, name: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| PartSyncError::Config(format!("Invalid {name}: {e}"))),
        None => Ok(default),
    }
}
