//! Persistence contracts for rule records and template definitions.
//!
//! This crate provides:
//! - `TemplateProvider` / `RuleStore` collaborator traits
//! - `RuleRecord` / `RuleFilter` record types
//! - An in-memory implementation for tests and local development
//! - A caching wrapper that invalidates entries synchronously on write
//!
//! Physical document stores live behind the traits; the engine never
//! depends on a concrete backend.

pub mod cache;
pub mod memory;
pub mod traits;
pub mod types;

pub use cache::CachingTemplateProvider;
pub use memory::MemoryStore;
pub use traits::{RuleStore, StoreError, TemplateProvider};
pub use types::{NamedSchema, RuleFilter, RuleRecord};
