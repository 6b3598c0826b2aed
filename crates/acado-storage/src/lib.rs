//! # acado-storage
//!
//! Storage backends and the generic repository for Acado.
//!
//! This crate provides:
//! - [`MemoryStore`]: in-process store (tests, demos, ephemeral servers)
//! - [`FileStore`]: one JSON file per collection under a data directory
//! - [`Repository`]: the generic data-access type every resource module wraps
//! - [`create_store`]: backend selection from [`StorageConfig`]

#![forbid(unsafe_code)]

pub mod backend;
pub mod file;
pub mod memory;
pub mod repository;

pub use acado_core::{Error, Result};
pub use backend::{create_store, StorageConfig};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::Repository;
