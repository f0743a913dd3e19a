use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use models::pet::{NewPet, Pet, PetFilter, PetPatch};
use models::results::{DeleteResult, InsertResult, UpdateResult};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PetListQuery {
    /// Exact match on `owner_email`
    pub email: Option<String>,
    /// Exact match on `category`
    pub category: Option<String>,
}

impl From<PetListQuery> for PetFilter {
    fn from(q: PetListQuery) -> Self { PetFilter { email: q.email, category: q.category } }
}

#[utoipa::path(
    post,
    path = "/pets",
    tag = "pets",
    request_body = crate::openapi::NewPetDoc,
    responses(
        (status = 200, description = "Pet stored", body = crate::openapi::InsertResultDoc),
        (status = 400, description = "Missing name or category", body = crate::openapi::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InsertResult>, JsonApiError> {
    let Json(body) = body?;
    let input = NewPet::from_json(body)?;
    Ok(Json(state.pets.create(input).await?))
}

#[utoipa::path(
    get,
    path = "/pets",
    tag = "pets",
    params(PetListQuery),
    responses(
        (status = 200, description = "Matching pets", body = [crate::openapi::PetDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PetListQuery>, QueryRejection>,
) -> Result<Json<Vec<Pet>>, JsonApiError> {
    let Query(q) = query?;
    Ok(Json(state.pets.list(q.into()).await?))
}

#[utoipa::path(
    get,
    path = "/pets/recent",
    tag = "pets",
    responses(
        (status = 200, description = "Up to six newest pets, newest first", body = [crate::openapi::PetDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn recent(State(state): State<AppState>) -> Result<Json<Vec<Pet>>, JsonApiError> {
    Ok(Json(state.pets.recent().await?))
}

#[utoipa::path(
    get,
    path = "/pets/{id}",
    tag = "pets",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet", body = crate::openapi::PetDoc),
        (status = 404, description = "Pet not found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Pet>, JsonApiError> {
    Ok(Json(state.pets.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/pets/{id}",
    tag = "pets",
    params(("id" = String, Path, description = "Pet id")),
    request_body = crate::openapi::PetPatchDoc,
    responses(
        (status = 200, description = "Update counts; zero when no pet matched", body = crate::openapi::UpdateResultDoc),
        (status = 400, description = "Invalid patch body", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResult>, JsonApiError> {
    let Json(body) = body?;
    let patch = PetPatch::from_json(body)?;
    Ok(Json(state.pets.update(&id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/pets/{id}",
    tag = "pets",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Delete count; zero when no pet matched", body = crate::openapi::DeleteResultDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DeleteResult>, JsonApiError> {
    Ok(Json(state.pets.delete(&id).await?))
}
