//! Persistence layer for the care home backend.
//!
//! This crate contains:
//! - The `EntityStore` trait every storage backend implements
//! - `MemoryStore`, the in-process arena implementation
//! - Store errors and operation metrics

pub mod error;
pub mod memory;
pub mod metrics;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::EntityStore;
