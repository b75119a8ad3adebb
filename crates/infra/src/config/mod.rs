//! Configuration loading

mod loader;

pub use loader::{load, load_from};
