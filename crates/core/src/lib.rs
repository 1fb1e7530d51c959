//! Shared foundation for the rulegen workspace.
//!
//! This crate provides:
//! - Environment-based configuration (`Config::from_env()`)
//! - Generic JSON document utilities: dot-path field addressing with
//!   first-array-element descent, and recursive deep merge

pub mod config;
pub mod document;

pub use config::Config;
pub use document::{deep_merge, string_at_path, value_at_path};
