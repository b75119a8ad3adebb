//! Onshape API client for PartSync
//!
//! This module provides the signed HTTP transport for the Onshape REST
//! API. It handles canonical-string construction, HMAC-SHA256 request
//! signatures, wire headers, and response classification.
//!
//! # Architecture
//!
//! - Uses the crate's HttpClient (no direct reqwest)
//! - Per-request nonce + date signing, no token state
//! - Implements `partsync_core::ports::PartMetadataClient`
//! - No retries; the orchestrator owns failure policy

pub mod client;
pub mod errors;
pub mod signing;

pub use client::{OnshapeClient, OnshapeClientConfig};
pub use signing::{generate_nonce, http_date, request_signature, sign, string_to_sign};
