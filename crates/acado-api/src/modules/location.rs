//! Teaching locations: campuses, rooms, partner venues.

use std::ops::Deref;

use acado_auth::Role;
use acado_core::{Document, DocumentId, Filter, Result};
use acado_storage::Repository;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::handlers::crud_routes;
use crate::resource::{clearable, Resource, ResourceService};
use crate::state::AppState;
use crate::validation::{Field, Schema};

/// Stored location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City.
    pub city: String,
    /// Country.
    pub country: String,
    /// Contact address for the venue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Soft-disable flag.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Document for Location {
    const COLLECTION: &'static str = "locations";

    fn id(&self) -> DocumentId {
        self.id
    }
}

/// `POST /api/locations` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    name: String,
    address: Option<String>,
    city: String,
    country: String,
    contact_email: Option<String>,
    is_active: Option<bool>,
}

/// `PUT /api/locations/{id}` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocation {
    name: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    address: Option<Option<String>>,
    city: Option<String>,
    country: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    contact_email: Option<Option<String>>,
    is_active: Option<bool>,
}

impl Resource for Location {
    type Repository = LocationRepository;
    type Create = CreateLocation;
    type Update = UpdateLocation;
    type View = Location;

    const WRITE_ROLES: &'static [Role] = &[Role::Admin, Role::SuperAdmin];

    fn create_schema() -> Schema {
        Schema::new()
            .field(Field::string("name").required().max_len(150))
            .field(Field::string("address").max_len(300))
            .field(Field::string("city").required().max_len(100))
            .field(Field::string("country").required().max_len(100))
            .field(Field::email("contactEmail").max_len(254))
            .field(Field::boolean("isActive"))
    }

    fn from_create(input: CreateLocation, now: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            name: input.name.trim().to_string(),
            address: input.address,
            city: input.city.trim().to_string(),
            country: input.country.trim().to_string(),
            contact_email: input.contact_email.map(|email| email.trim().to_lowercase()),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateLocation) {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if let Some(address) = input.address {
            self.address = address;
        }
        if let Some(city) = input.city {
            self.city = city.trim().to_string();
        }
        if let Some(country) = input.country {
            self.country = country.trim().to_string();
        }
        if let Some(email) = input.contact_email {
            self.contact_email = email.map(|email| email.trim().to_lowercase());
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

/// Repository for locations.
#[derive(Debug, Clone)]
pub struct LocationRepository(Repository<Location>);

impl LocationRepository {
    /// Active locations in `city`.
    pub async fn find_by_city(&self, city: &str) -> Result<Vec<Location>> {
        self.find(&Filter::active().eq("city", city.trim())).await
    }
}

impl From<Repository<Location>> for LocationRepository {
    fn from(repository: Repository<Location>) -> Self {
        Self(repository)
    }
}

impl Deref for LocationRepository {
    type Target = Repository<Location>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ResourceService<Location> {
    /// Active locations in `city`.
    pub async fn find_by_city(&self, city: &str) -> Result<Vec<Location>> {
        self.repository().find_by_city(city).await
    }
}

async fn by_city(
    State(service): State<ResourceService<Location>>,
    Path(city): Path<String>,
) -> crate::Result<Json<Vec<Location>>> {
    Ok(Json(service.find_by_city(&city).await?))
}

/// Routes mounted at `/api/locations`.
pub fn routes() -> Router<AppState> {
    crud_routes::<Location>().route("/city/{city}", get(by_city))
}
