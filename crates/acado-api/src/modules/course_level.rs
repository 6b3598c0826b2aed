//! Course levels (beginner, intermediate, ...).

use std::ops::Deref;

use acado_auth::Role;
use acado_core::{format_keywords, Document, DocumentId, Filter, Result};
use acado_storage::Repository;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keyword_list;
use crate::handlers::crud_routes;
use crate::resource::{clearable, Resource, ResourceService};
use crate::state::AppState;
use crate::validation::{Field, Schema};

/// Stored course level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseLevel {
    /// Identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Canonical comma-joined keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Soft-disable flag.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Document for CourseLevel {
    const COLLECTION: &'static str = "course_levels";

    fn id(&self) -> DocumentId {
        self.id
    }
}

/// `POST /api/course-levels` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseLevel {
    name: String,
    description: Option<String>,
    keywords: Option<Vec<String>>,
    is_active: Option<bool>,
}

/// `PUT /api/course-levels/{id}` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseLevel {
    name: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    keywords: Option<Option<Vec<String>>>,
    is_active: Option<bool>,
}

/// Course level as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseLevelView {
    id: DocumentId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    keywords: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseLevel> for CourseLevelView {
    fn from(level: CourseLevel) -> Self {
        Self {
            keywords: keyword_list(level.keywords.as_deref()),
            id: level.id,
            name: level.name,
            description: level.description,
            is_active: level.is_active,
            created_at: level.created_at,
            updated_at: level.updated_at,
        }
    }
}

/// Repository for course levels.
#[derive(Debug, Clone)]
pub struct CourseLevelRepository(Repository<CourseLevel>);

impl CourseLevelRepository {
    /// Levels with exactly this name.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<CourseLevel>> {
        self.find(&Filter::new().eq("name", name)).await
    }
}

impl From<Repository<CourseLevel>> for CourseLevelRepository {
    fn from(repository: Repository<CourseLevel>) -> Self {
        Self(repository)
    }
}

impl Deref for CourseLevelRepository {
    type Target = Repository<CourseLevel>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Resource for CourseLevel {
    type Repository = CourseLevelRepository;
    type Create = CreateCourseLevel;
    type Update = UpdateCourseLevel;
    type View = CourseLevelView;

    const WRITE_ROLES: &'static [Role] = &[Role::Admin, Role::SuperAdmin];

    fn create_schema() -> Schema {
        Schema::new()
            .field(Field::string("name").required().max_len(100))
            .field(Field::string("description").max_len(1000))
            .field(Field::string_array("keywords").max_len(50))
            .field(Field::boolean("isActive"))
    }

    fn from_create(input: CreateCourseLevel, now: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            name: input.name.trim().to_string(),
            description: input.description,
            keywords: input.keywords.and_then(format_keywords),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateCourseLevel) {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(keywords) = input.keywords {
            self.keywords = keywords.and_then(format_keywords);
        }
        if let Some(is_active) = input.is_active {
            self.is_active = is_active;
        }
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ResourceService<CourseLevel> {
    /// Levels with exactly this name.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<CourseLevel>> {
        self.repository().find_by_name(name).await
    }
}

async fn by_name(
    State(service): State<ResourceService<CourseLevel>>,
    Path(name): Path<String>,
) -> crate::Result<Json<Vec<CourseLevelView>>> {
    let levels = service.find_by_name(&name).await?;
    Ok(Json(levels.into_iter().map(Into::into).collect()))
}

/// Routes mounted at `/api/course-levels`.
pub fn routes() -> Router<AppState> {
    crud_routes::<CourseLevel>().route("/name/{name}", get(by_name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use acado_storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> ResourceService<CourseLevel> {
        ResourceService::from_store(Arc::new(MemoryStore::<CourseLevel>::new()))
    }

    #[tokio::test]
    async fn test_create_normalizes_keywords() {
        let service = service();
        let level = service
            .create(json!({"name": " Beginner ", "keywords": ["Intro", " intro", "BASICS"]}))
            .await
            .unwrap();

        assert_eq!(level.name, "Beginner");
        assert_eq!(level.keywords.as_deref(), Some("intro,basics"));
        assert!(level.is_active);
        assert_eq!(level.created_at, level.updated_at);
    }

    #[tokio::test]
    async fn test_empty_keywords_are_absent() {
        let service = service();
        let level = service
            .create(json!({"name": "Advanced", "keywords": ["  ", ""]}))
            .await
            .unwrap();
        assert_eq!(level.keywords, None);

        let stored = serde_json::to_value(&level).unwrap();
        assert!(stored.get("keywords").is_none());
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let service = service();
        let level = service
            .create(json!({"name": "Beginner", "description": "First steps"}))
            .await
            .unwrap();

        let updated = service
            .update(level.id, json!({"keywords": ["new"]}))
            .await
            .unwrap();
        assert_eq!(updated.name, "Beginner");
        assert_eq!(updated.description.as_deref(), Some("First steps"));
        assert_eq!(updated.keywords.as_deref(), Some("new"));
        assert!(updated.updated_at >= level.updated_at);
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let service = service();
        service.create(json!({"name": "Beginner"})).await.unwrap();
        service.create(json!({"name": "Expert"})).await.unwrap();

        let found = service.find_by_name("Expert").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Expert");
        assert!(service.find_by_name("expert").await.unwrap().is_empty());
    }

    #[test]
    fn test_view_renders_keywords_as_list() {
        let now = Utc::now();
        let view = CourseLevelView::from(CourseLevel {
            id: DocumentId::new(),
            name: "Beginner".to_string(),
            description: None,
            keywords: Some("intro,basics".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["keywords"], json!(["intro", "basics"]));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_view_drops_legacy_duplicate_keywords() {
        let now = Utc::now();
        let view = CourseLevelView::from(CourseLevel {
            id: DocumentId::new(),
            name: "Beginner".to_string(),
            description: None,
            keywords: Some("Intro,intro, basics".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["keywords"], json!(["intro", "basics"]));
    }

    #[tokio::test]
    async fn test_update_null_clears_optional_fields() {
        let service = service();
        let level = service
            .create(json!({"name": "Beginner", "description": "First steps", "keywords": ["intro"]}))
            .await
            .unwrap();

        let updated = service
            .update(level.id, json!({"description": null, "keywords": null}))
            .await
            .unwrap();
        assert_eq!(updated.name, "Beginner");
        assert_eq!(updated.description, None);
        assert_eq!(updated.keywords, None);
    }
}
