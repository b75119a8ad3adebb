//! Sync orchestration for PartSync
//!
//! This module turns a batch of imported rows plus a column mapping into
//! concurrent per-row metadata updates:
//! - `mapping`: identifier validation, payload assembly, auto-mapping
//! - `service`: the settle-all orchestrator producing one outcome per row

pub mod mapping;
pub mod service;

pub use mapping::{auto_map, build_payload, identifier_column};
pub use service::{SyncOptions, SyncService};
