//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to load it from disk and persist the library root.

mod load;
mod schema;

pub use load::{default_log_path, resolve_config_path, save_library_root};
pub use schema::*;
