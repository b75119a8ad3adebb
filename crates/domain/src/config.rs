//! Configuration structures

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub sync: SyncConfig,
    pub catalog: CatalogConfig,
}

/// Onshape API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for API calls
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "https://cad.onshape.com".to_string(), timeout_seconds: 30 }
    }
}

/// Sync orchestrator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Cap on simultaneous in-flight row updates. `None` preserves the
    /// unbounded fan-out of the original tool.
    pub max_concurrency: Option<usize>,
}

/// Part catalog export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Maximum number of documents fetched per catalog walk
    pub document_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { document_limit: 50 }
    }
}
