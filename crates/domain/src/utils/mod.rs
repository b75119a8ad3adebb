//! Pure utility helpers shared across the workspace

pub mod csv;
