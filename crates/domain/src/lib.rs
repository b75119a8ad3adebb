//! # PartSync Domain
//!
//! Business domain types and models for PartSync.
//!
//! This crate contains:
//! - Sheet, column-mapping, and sync-outcome data types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - CSV sheet utilities behind the import/export interface
//!
//! ## Architecture
//! - No dependencies on other PartSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export sheet utilities
pub use utils::csv::{mint_row_id, parse_sheet, serialize_sheet, Sheet};
