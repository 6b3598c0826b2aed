//! Shared application state.

use std::sync::Arc;

use acado_auth::{AuthConfig, Role, RoleGate};
use acado_storage::{create_store, MemoryStore, StorageConfig};
use axum::extract::FromRef;

use crate::modules::{CourseLevel, CourseType, Location, WallPost};
use crate::resource::ResourceService;
use crate::Result;

/// Whether role checks apply.
///
/// With auth disabled every caller is anonymous, so gates are opened
/// instead of refusing every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    enforced: bool,
}

impl Access {
    /// Access policy matching the auth configuration.
    pub fn new(enforced: bool) -> Self {
        Self { enforced }
    }

    /// Gate admitting `roles`, or an open gate when checks are off.
    pub fn gate(&self, roles: &[Role]) -> RoleGate {
        if self.enforced {
            RoleGate::new(roles.iter().copied())
        } else {
            RoleGate::open()
        }
    }
}

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Course level service.
    pub course_levels: ResourceService<CourseLevel>,
    /// Course type service.
    pub course_types: ResourceService<CourseType>,
    /// Location service.
    pub locations: ResourceService<Location>,
    /// Wall post service.
    pub wall_posts: ResourceService<WallPost>,
    /// Role check policy.
    pub access: Access,
}

impl AppState {
    /// Open every collection on the configured backend.
    pub async fn from_config(storage: &StorageConfig, auth: &AuthConfig) -> Result<Self> {
        tracing::info!(backend = %storage.backend, "opening document stores");
        Ok(Self {
            course_levels: ResourceService::from_store(create_store::<CourseLevel>(storage).await?),
            course_types: ResourceService::from_store(create_store::<CourseType>(storage).await?),
            locations: ResourceService::from_store(create_store::<Location>(storage).await?),
            wall_posts: ResourceService::from_store(create_store::<WallPost>(storage).await?),
            access: Access::new(auth.enabled),
        })
    }

    /// Empty in-memory state.
    pub fn in_memory(auth_enforced: bool) -> Self {
        Self {
            course_levels: ResourceService::from_store(Arc::new(MemoryStore::<CourseLevel>::new())),
            course_types: ResourceService::from_store(Arc::new(MemoryStore::<CourseType>::new())),
            locations: ResourceService::from_store(Arc::new(MemoryStore::<Location>::new())),
            wall_posts: ResourceService::from_store(Arc::new(MemoryStore::<WallPost>::new())),
            access: Access::new(auth_enforced),
        }
    }
}

impl FromRef<AppState> for ResourceService<CourseLevel> {
    fn from_ref(state: &AppState) -> Self {
        state.course_levels.clone()
    }
}

impl FromRef<AppState> for ResourceService<CourseType> {
    fn from_ref(state: &AppState) -> Self {
        state.course_types.clone()
    }
}

impl FromRef<AppState> for ResourceService<Location> {
    fn from_ref(state: &AppState) -> Self {
        state.locations.clone()
    }
}

impl FromRef<AppState> for ResourceService<WallPost> {
    fn from_ref(state: &AppState) -> Self {
        state.wall_posts.clone()
    }
}

impl FromRef<AppState> for Access {
    fn from_ref(state: &AppState) -> Self {
        state.access
    }
}
