//! Course types (workshop, lecture series, ...).
//!
//! Each type carries a short code that external systems use to refer to
//! it. Codes are stored upper-cased and are unique within the collection.

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

/// Stored course type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseType {
    /// Identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Short upper-case code, e.g. `WS`.
    pub code: String,
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

impl Document for CourseType {
    const COLLECTION: &'static str = "course_types";

    fn id(&self) -> DocumentId {
        self.id
    }
}

/// `POST /api/course-types` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseType {
    name: String,
    code: String,
    description: Option<String>,
    keywords: Option<Vec<String>>,
    is_active: Option<bool>,
}

/// `PUT /api/course-types/{id}` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseType {
    name: Option<String>,
    code: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    keywords: Option<Option<Vec<String>>>,
    is_active: Option<bool>,
}

/// Course type as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseTypeView {
    id: DocumentId,
    name: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    keywords: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseType> for CourseTypeView {
    fn from(course_type: CourseType) -> Self {
        Self {
            keywords: keyword_list(course_type.keywords.as_deref()),
            id: course_type.id,
            name: course_type.name,
            code: course_type.code,
            description: course_type.description,
            is_active: course_type.is_active,
            created_at: course_type.created_at,
            updated_at: course_type.updated_at,
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Repository for course types.
#[derive(Debug, Clone)]
pub struct CourseTypeRepository(Repository<CourseType>);

impl CourseTypeRepository {
    /// The type with this code, compared case-insensitively.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<CourseType>> {
        self.find_one(&Filter::new().eq("code", normalize_code(code)))
            .await
    }
}

impl From<Repository<CourseType>> for CourseTypeRepository {
    fn from(repository: Repository<CourseType>) -> Self {
        Self(repository)
    }
}

impl Deref for CourseTypeRepository {
    type Target = Repository<CourseType>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Resource for CourseType {
    type Repository = CourseTypeRepository;
    type Create = CreateCourseType;
    type Update = UpdateCourseType;
    type View = CourseTypeView;

    const WRITE_ROLES: &'static [Role] = &[Role::Admin, Role::SuperAdmin];

    fn create_schema() -> Schema {
        Schema::new()
            .field(Field::string("name").required().max_len(100))
            .field(Field::string("code").required().max_len(20))
            .field(Field::string("description").max_len(1000))
            .field(Field::string_array("keywords").max_len(50))
            .field(Field::boolean("isActive"))
    }

    fn from_create(input: CreateCourseType, now: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            name: input.name.trim().to_string(),
            code: normalize_code(&input.code),
            description: input.description,
            keywords: input.keywords.and_then(format_keywords),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateCourseType) {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if let Some(code) = input.code {
            self.code = normalize_code(&code);
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

    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        vec![("code", self.code.clone())]
    }
}

impl ResourceService<CourseType> {
    /// The type with this code.
    ///
    /// # Errors
    ///
    /// [`acado_core::Error::NotFound`] when no type has the code.
    pub async fn find_by_code(&self, code: &str) -> Result<CourseType> {
        self.repository()
            .find_by_code(code)
            .await?
            .ok_or_else(|| acado_core::Error::not_found(CourseType::COLLECTION, code))
    }
}

async fn by_code(
    State(service): State<ResourceService<CourseType>>,
    Path(code): Path<String>,
) -> crate::Result<Json<CourseTypeView>> {
    Ok(Json(service.find_by_code(&code).await?.into()))
}

/// Routes mounted at `/api/course-types`.
pub fn routes() -> Router<AppState> {
    crud_routes::<CourseType>().route("/code/{code}", get(by_code))
}
