//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! The `*Doc` structs mirror the wire shapes; stored records also carry any
//! extra fields the client sent, which the schemas cannot enumerate.

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorBody { pub error: String }

#[derive(Serialize, ToSchema)]
pub struct NewPetDoc {
    pub name: String,
    pub category: String,
    pub owner_email: Option<String>,
    pub price: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct PetDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub owner_email: Option<String>,
    pub price: Option<f64>,
    /// RFC 3339 timestamp set on creation
    pub date: String,
}

#[derive(Serialize, ToSchema)]
pub struct PetPatchDoc {
    pub name: Option<String>,
    pub category: Option<String>,
    pub owner_email: Option<String>,
    pub price: Option<f64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderDoc {
    pub product_id: String,
    pub buyer_name: String,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub additional_notes: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_id: String,
    pub buyer_name: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
    pub address: String,
    pub phone: String,
    pub additional_notes: String,
    pub email: Option<String>,
    pub date: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatchDoc {
    pub product_id: Option<String>,
    pub buyer_name: Option<String>,
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub additional_notes: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResultDoc { pub acknowledged: bool, pub inserted_id: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultDoc {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResultDoc { pub acknowledged: bool, pub deleted_count: u64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::pets::create,
        crate::routes::pets::list,
        crate::routes::pets::recent,
        crate::routes::pets::get,
        crate::routes::pets::update,
        crate::routes::pets::delete,
        crate::routes::orders::create,
        crate::routes::orders::list,
        crate::routes::orders::get,
        crate::routes::orders::update,
        crate::routes::orders::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            NewPetDoc,
            PetDoc,
            PetPatchDoc,
            NewOrderDoc,
            OrderDoc,
            OrderPatchDoc,
            InsertResultDoc,
            UpdateResultDoc,
            DeleteResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "pets"),
        (name = "orders")
    )
)]
pub struct ApiDoc;
