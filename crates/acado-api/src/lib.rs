//! # acado-api
//!
//! REST API server for the Acado education platform.
//!
//! Every resource module follows the same request flow:
//!
//! ```text
//! route -> RoleGate (writes) -> Schema -> ResourceService -> Repository -> DocumentStore
//! ```
//!
//! - [`config`]: `ApiConfig` loading (TOML file, `ACADO_*` environment)
//! - [`validation`]: declarative request-body schemas
//! - [`resource`]: the `Resource` trait and generic `ResourceService`
//! - [`handlers`]: the standard CRUD routes shared by all modules
//! - [`modules`]: course levels, course types, locations, wall posts
//! - [`routes`] / [`server`]: router assembly and lifecycle

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod modules;
pub mod resource;
pub mod routes;
pub mod server;
pub mod state;
pub mod validation;

pub use config::ApiConfig;
pub use error::{Error, Result};
pub use resource::{Resource, ResourceService};
pub use routes::create_router;
pub use server::Server;
pub use state::{Access, AppState};
