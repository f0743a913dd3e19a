use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use models::order::{NewOrder, Order, OrderFilter, OrderPatch};
use models::results::{DeleteResult, InsertResult, UpdateResult};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Exact match on the order's own `email`
    pub email: Option<String>,
}

impl From<OrderListQuery> for OrderFilter {
    fn from(q: OrderListQuery) -> Self { OrderFilter { email: q.email } }
}

/// Resolves `productId`, then stores the order with the pet's name and price copied in.
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = crate::openapi::NewOrderDoc,
    responses(
        (status = 200, description = "Order stored", body = crate::openapi::InsertResultDoc),
        (status = 400, description = "Missing fields or unknown productId", body = crate::openapi::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InsertResult>, JsonApiError> {
    let Json(body) = body?;
    let input = NewOrder::from_json(body)?;
    Ok(Json(state.orders.create(input).await?))
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Matching orders", body = [crate::openapi::OrderDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, JsonApiError> {
    let Query(q) = query?;
    Ok(Json(state.orders.list(q.into()).await?))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = crate::openapi::OrderDoc),
        (status = 404, description = "Order not found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>, JsonApiError> {
    Ok(Json(state.orders.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = crate::openapi::OrderPatchDoc,
    responses(
        (status = 200, description = "Update counts; zero when no order matched", body = crate::openapi::UpdateResultDoc),
        (status = 400, description = "Invalid patch body", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResult>, JsonApiError> {
    let Json(body) = body?;
    let patch = OrderPatch::from_json(body)?;
    Ok(Json(state.orders.update(&id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Delete count; zero when no order matched", body = crate::openapi::DeleteResultDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DeleteResult>, JsonApiError> {
    Ok(Json(state.orders.delete(&id).await?))
}
