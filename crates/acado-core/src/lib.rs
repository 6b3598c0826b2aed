//! Acado Core: shared types, traits and errors.
//!
//! This crate provides the foundational types used across all Acado crates.
//! It has no internal Acado dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`document`]: Document identity and the [`Document`] trait
//! - [`filter`]: Structural field filters
//! - [`store`]: The [`DocumentStore`] capability trait
//! - [`keywords`]: Keyword list normalization

pub mod document;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod store;

// Re-export key types at crate root for convenience
pub use document::{Document, DocumentId, ACTIVE_FIELD};
pub use error::{Error, Result};
pub use filter::{Constraint, Filter};
pub use keywords::{format_keywords, normalize_stored, parse_keywords};
pub use store::DocumentStore;
