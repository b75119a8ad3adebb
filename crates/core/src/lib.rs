//! # PartSync Core
//!
//! Business logic for the bulk metadata synchronization engine.
//!
//! This crate contains:
//! - The property registry (canonical names to Onshape property ids)
//! - The part reference resolver
//! - The sync orchestrator and its transport port
//!
//! ## Architecture
//! - Defines port traits implemented by `partsync-infra`
//! - Depends only on `partsync-domain`
//! - No I/O; network calls happen behind the [`ports::PartMetadataClient`] seam

pub mod ports;
pub mod reference;
pub mod registry;
pub mod sync;

// Re-export commonly used items
pub use ports::PartMetadataClient;
pub use reference::resolve;
pub use sync::{SyncOptions, SyncService};
