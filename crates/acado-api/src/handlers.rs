//! Generic CRUD handlers, shared by every resource module.

use acado_core::{DocumentId, Error as CoreError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::extract::Caller;
use crate::resource::{Resource, ResourceService};
use crate::state::{Access, AppState};
use crate::Result;

/// The six standard routes for `R`, relative to its mount point.
///
/// | method   | path      | action             |
/// |----------|-----------|--------------------|
/// | `GET`    | `/`       | all documents      |
/// | `GET`    | `/active` | active documents   |
/// | `GET`    | `/{id}`   | one document       |
/// | `POST`   | `/`       | create             |
/// | `PUT`    | `/{id}`   | partial update     |
/// | `DELETE` | `/{id}`   | soft-disable       |
pub fn crud_routes<R>() -> Router<AppState>
where
    R: Resource,
    ResourceService<R>: FromRef<AppState>,
{
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/active", get(list_active::<R>))
        .route(
            "/{id}",
            get(get_one::<R>).put(update::<R>).delete(deactivate::<R>),
        )
}

/// Parse a path segment as a document id.
pub(crate) fn parse_id(raw: &str) -> Result<DocumentId> {
    raw.parse()
        .map_err(|_| CoreError::validation_field("id", format!("'{raw}' is not a valid id")).into())
}

fn views<R: Resource>(documents: Vec<R>) -> Json<Vec<R::View>> {
    Json(documents.into_iter().map(Into::into).collect())
}

async fn list<R: Resource>(
    State(service): State<ResourceService<R>>,
) -> Result<Json<Vec<R::View>>> {
    Ok(views(service.list().await?))
}

async fn list_active<R: Resource>(
    State(service): State<ResourceService<R>>,
) -> Result<Json<Vec<R::View>>> {
    Ok(views(service.list_active().await?))
}

async fn get_one<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
) -> Result<Json<R::View>> {
    let document = service.get(parse_id(&id)?).await?;
    Ok(Json(document.into()))
}

async fn create<R: Resource>(
    State(service): State<ResourceService<R>>,
    State(access): State<Access>,
    Caller(user): Caller,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<R::View>)> {
    access.gate(R::WRITE_ROLES).check(user.as_ref())?;
    let Json(body) = payload?;
    let document = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

async fn update<R: Resource>(
    State(service): State<ResourceService<R>>,
    State(access): State<Access>,
    Caller(user): Caller,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<R::View>> {
    access.gate(R::WRITE_ROLES).check(user.as_ref())?;
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let document = service.update(id, body).await?;
    Ok(Json(document.into()))
}

async fn deactivate<R: Resource>(
    State(service): State<ResourceService<R>>,
    State(access): State<Access>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<Json<R::View>> {
    access.gate(R::WRITE_ROLES).check(user.as_ref())?;
    let document = service.deactivate(parse_id(&id)?).await?;
    Ok(Json(document.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_valid() {
        let id = DocumentId::new();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_id_invalid() {
        let err = parse_id("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("not-a-uuid"));
    }
}
