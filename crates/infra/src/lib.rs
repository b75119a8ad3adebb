//! # PartSync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The signed Onshape API client and request signer
//! - A thin HTTP transport wrapper over reqwest
//! - The account-wide part catalog fetcher
//! - Environment-based configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `partsync-core`
//! - Depends on `partsync-domain` and `partsync-core`
//! - Contains all "impure" code (network I/O, clock, entropy)

pub mod api;
pub mod catalog;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{OnshapeClient, OnshapeClientConfig};
pub use catalog::fetch_all_parts;
pub use http::HttpClient;
