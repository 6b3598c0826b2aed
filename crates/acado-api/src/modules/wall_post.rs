//! Wall posts: announcements shown on the platform's news wall.
//!
//! Unlike the catalogue resources, instructors may write posts. Each post
//! has a visibility that decides which audience sees it in the feed.

use std::fmt;
use std::ops::Deref;

use acado_auth::{AuthenticatedUser, Role};
use acado_core::{format_keywords, Document, DocumentId, Filter, Result};
use acado_storage::Repository;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::Caller;
use super::keyword_list;
use crate::handlers::crud_routes;
use crate::resource::{clearable, Resource, ResourceService};
use crate::state::AppState;
use crate::validation::{Field, Schema};

/// Audience of a wall post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Everyone, including anonymous visitors.
    #[default]
    Public,
    /// Signed-in learners and staff.
    Learners,
    /// Instructors and administrators only.
    Staff,
}

impl Visibility {
    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["public", "learners", "staff"];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Learners => "learners",
            Self::Staff => "staff",
        }
    }

    /// Audiences a caller may read.
    pub fn readable_by(role: Option<Role>) -> &'static [Visibility] {
        match role {
            None => &[Self::Public],
            Some(Role::Learner) => &[Self::Public, Self::Learners],
            Some(Role::Instructor | Role::Admin | Role::SuperAdmin) => {
                &[Self::Public, Self::Learners, Self::Staff]
            }
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored wall post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallPost {
    /// Identifier.
    pub id: DocumentId,
    /// Headline.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Author address, lower-cased.
    pub author_email: String,
    /// Audience.
    pub visibility: Visibility,
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

impl Document for WallPost {
    const COLLECTION: &'static str = "wall_posts";

    fn id(&self) -> DocumentId {
        self.id
    }
}

/// `POST /api/wall-posts` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWallPost {
    title: String,
    body: String,
    author_email: String,
    visibility: Option<Visibility>,
    #[serde(default, deserialize_with = "clearable")]
    keywords: Option<Option<Vec<String>>>,
    is_active: Option<bool>,
}

/// `PUT /api/wall-posts/{id}` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWallPost {
    title: Option<String>,
    body: Option<String>,
    visibility: Option<Visibility>,
    #[serde(default, deserialize_with = "clearable")]
    keywords: Option<Option<Vec<String>>>,
    is_active: Option<bool>,
}

/// Wall post as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallPostView {
    id: DocumentId,
    title: String,
    body: String,
    author_email: String,
    visibility: Visibility,
    keywords: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WallPost> for WallPostView {
    fn from(post: WallPost) -> Self {
        Self {
            keywords: keyword_list(post.keywords.as_deref()),
            id: post.id,
            title: post.title,
            body: post.body,
            author_email: post.author_email,
            visibility: post.visibility,
            is_active: post.is_active,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl Resource for WallPost {
    type Repository = WallPostRepository;
    type Create = CreateWallPost;
    type Update = UpdateWallPost;
    type View = WallPostView;

    const WRITE_ROLES: &'static [Role] = &[Role::Instructor, Role::Admin, Role::SuperAdmin];

    fn create_schema() -> Schema {
        Schema::new()
            .field(Field::string("title").required().max_len(200))
            .field(Field::string("body").required().max_len(5000))
            .field(Field::email("authorEmail").required().max_len(254))
            .field(Field::one_of("visibility", Visibility::NAMES))
            .field(Field::string_array("keywords").max_len(50))
            .field(Field::boolean("isActive"))
    }

    // The author is fixed at creation.
    fn update_schema() -> Schema {
        Schema::new()
            .field(Field::string("title").required().max_len(200))
            .field(Field::string("body").required().max_len(5000))
            .field(Field::one_of("visibility", Visibility::NAMES))
            .field(Field::string_array("keywords").max_len(50))
            .field(Field::boolean("isActive"))
            .partial()
    }

    fn from_create(input: CreateWallPost, now: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            title: input.title.trim().to_string(),
            body: input.body,
            author_email: input.author_email.trim().to_lowercase(),
            visibility: input.visibility.unwrap_or_default(),
            keywords: input.keywords.flatten().and_then(format_keywords),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateWallPost) {
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(body) = input.body {
            self.body = body;
        }
        if let Some(visibility) = input.visibility {
            self.visibility = visibility;
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

/// Repository for wall posts.
#[derive(Debug, Clone)]
pub struct WallPostRepository(Repository<WallPost>);

impl WallPostRepository {
    /// Every post written by `email`, active or not.
    pub async fn find_by_author(&self, email: &str) -> Result<Vec<WallPost>> {
        self.find(&Filter::new().eq("authorEmail", email.trim().to_lowercase()))
            .await
    }

    /// Active posts whose visibility is in `audiences`.
    pub async fn find_visible_to(&self, audiences: &[Visibility]) -> Result<Vec<WallPost>> {
        let names = audiences.iter().map(Visibility::as_str);
        self.find(&Filter::active().any_of("visibility", names)).await
    }
}

impl From<Repository<WallPost>> for WallPostRepository {
    fn from(repository: Repository<WallPost>) -> Self {
        Self(repository)
    }
}

impl Deref for WallPostRepository {
    type Target = Repository<WallPost>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn newest_first(mut posts: Vec<WallPost>) -> Vec<WallPost> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

impl ResourceService<WallPost> {
    /// Posts by `email`, newest first.
    pub async fn find_by_author(&self, email: &str) -> Result<Vec<WallPost>> {
        Ok(newest_first(self.repository().find_by_author(email).await?))
    }

    /// The feed for `user`: active posts it may read, newest first.
    pub async fn feed(&self, user: Option<&AuthenticatedUser>) -> Result<Vec<WallPost>> {
        let audiences = Visibility::readable_by(user.map(|u| u.role));
        Ok(newest_first(
            self.repository().find_visible_to(audiences).await?,
        ))
    }
}

fn views(posts: Vec<WallPost>) -> Json<Vec<WallPostView>> {
    Json(posts.into_iter().map(Into::into).collect())
}

async fn by_author(
    State(service): State<ResourceService<WallPost>>,
    Path(email): Path<String>,
) -> crate::Result<Json<Vec<WallPostView>>> {
    Ok(views(service.find_by_author(&email).await?))
}

async fn feed(
    State(service): State<ResourceService<WallPost>>,
    Caller(user): Caller,
) -> crate::Result<Json<Vec<WallPostView>>> {
    Ok(views(service.feed(user.as_ref()).await?))
}

/// Routes mounted at `/api/wall-posts`.
pub fn routes() -> Router<AppState> {
    crud_routes::<WallPost>()
        .route("/author/{email}", get(by_author))
        .route("/feed", get(feed))
}
