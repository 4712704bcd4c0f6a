//! Storage abstraction and implementations for pensum.
//!
//! This crate provides the trait-based template store contract with a JSON
//! file reference implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{TemplateStore, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
