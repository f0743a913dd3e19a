use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::document::{self, Document};
use crate::errors::ModelError;
use crate::pet::Pet;

/// Row shape for the Postgres backend; `order` is reserved in SQL, hence `pet_order`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pet_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_name: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
    pub address: String,
    pub phone: String,
    pub additional_notes: String,
    pub email: Option<String>,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub const REQUIRED_FIELDS_MESSAGE: &str = "productId & buyerName are required";

/// Keys a client may not set on create: server-managed or copied from the pet.
const CREATE_IGNORED: [&str; 3] = ["_id", "date", "productName"];

/// An order placed against a pet. `productName` and `price` are snapshots
/// taken when the order was created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_name: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
    pub address: String,
    pub phone: String,
    pub additional_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Order {
    pub fn apply(&mut self, patch: &OrderPatch) -> bool {
        let mut changed = false;
        if let Some(v) = patch.product_id {
            changed |= document::set_if_changed(&mut self.product_id, v);
        }
        if let Some(v) = &patch.buyer_name {
            changed |= document::set_if_changed(&mut self.buyer_name, v.clone());
        }
        if let Some(v) = &patch.product_name {
            changed |= document::set_if_changed(&mut self.product_name, v.clone());
        }
        if let Some(v) = patch.price {
            changed |= document::set_if_changed(&mut self.price, v);
        }
        if let Some(v) = patch.quantity {
            changed |= document::set_if_changed(&mut self.quantity, v);
        }
        if let Some(v) = &patch.address {
            changed |= document::set_if_changed(&mut self.address, v.clone());
        }
        if let Some(v) = &patch.phone {
            changed |= document::set_if_changed(&mut self.phone, v.clone());
        }
        if let Some(v) = &patch.additional_notes {
            changed |= document::set_if_changed(&mut self.additional_notes, v.clone());
        }
        if let Some(v) = &patch.email {
            changed |= document::set_if_changed(&mut self.email, v.clone());
        }
        changed |= document::merge_extra(&mut self.extra, &patch.extra);
        changed
    }
}

impl From<Model> for Order {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            buyer_name: m.buyer_name,
            product_name: m.product_name,
            price: m.price,
            quantity: m.quantity,
            address: m.address,
            phone: m.phone,
            additional_notes: m.additional_notes,
            email: m.email,
            date: m.date.with_timezone(&Utc),
            extra: document::from_column(m.extra),
        }
    }
}

impl From<&Order> for ActiveModel {
    fn from(o: &Order) -> Self {
        Self {
            id: Set(o.id),
            product_id: Set(o.product_id),
            buyer_name: Set(o.buyer_name.clone()),
            product_name: Set(o.product_name.clone()),
            price: Set(o.price),
            quantity: Set(o.quantity),
            address: Set(o.address.clone()),
            phone: Set(o.phone.clone()),
            additional_notes: Set(o.additional_notes.clone()),
            email: Set(o.email.clone()),
            date: Set(o.date.into()),
            extra: Set(Value::Object(o.extra.clone())),
        }
    }
}

/// Body of `POST /orders`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewOrder {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        let obj = document::into_object(body)?;
        serde_json::from_value(Value::Object(obj)).map_err(|e| ModelError::validation(e.to_string()))
    }

    /// Check the required fields; the product reference is resolved by the caller.
    pub fn into_draft(self) -> Result<OrderDraft, ModelError> {
        let (Some(product_ref), Some(buyer_name)) =
            (document::non_blank(self.product_id), document::non_blank(self.buyer_name))
        else {
            return Err(ModelError::validation(REQUIRED_FIELDS_MESSAGE));
        };
        let mut extra = self.extra;
        document::strip_keys(&mut extra, &CREATE_IGNORED);
        Ok(OrderDraft {
            product_ref,
            buyer_name,
            price: self.price,
            quantity: self.quantity,
            address: self.address,
            phone: self.phone,
            additional_notes: self.additional_notes,
            email: self.email,
            extra,
        })
    }
}

/// A validated order request waiting for its product lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderDraft {
    pub product_ref: String,
    pub buyer_name: String,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub additional_notes: Option<String>,
    pub email: Option<String>,
    pub extra: Document,
}

impl OrderDraft {
    /// The product reference as an id, if it is well formed.
    pub fn product_id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.product_ref.trim()).ok()
    }

    /// Copy name and price from the pet and fill the remaining defaults.
    pub fn snapshot(self, pet: &Pet, now: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4(),
            product_id: pet.id,
            buyer_name: self.buyer_name,
            product_name: pet.name.clone(),
            price: self.price.or(pet.price).unwrap_or(0.0),
            quantity: self.quantity.unwrap_or(1),
            address: self.address.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            additional_notes: self.additional_notes.unwrap_or_default(),
            email: self.email,
            date: now,
            extra: self.extra,
        }
    }
}

/// Body of `PATCH /orders/:id`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderPatch {
    pub product_id: Option<Uuid>,
    pub buyer_name: Option<String>,
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub additional_notes: Option<String>,
    pub email: Option<Option<String>>,
    pub extra: Document,
}

impl OrderPatch {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        let mut doc = document::into_object(body)?;
        document::reject_server_fields(&doc)?;
        Ok(Self {
            product_id: document::take_required(&mut doc, "productId", document::as_uuid)?,
            buyer_name: document::take_required(&mut doc, "buyerName", document::as_non_blank)?,
            product_name: document::take_required(&mut doc, "productName", document::as_string)?,
            price: document::take_required(&mut doc, "price", document::as_f64)?,
            quantity: document::take_required(&mut doc, "quantity", document::as_i64)?,
            address: document::take_required(&mut doc, "address", document::as_string)?,
            phone: document::take_required(&mut doc, "phone", document::as_string)?,
            additional_notes: document::take_required(&mut doc, "additionalNotes", document::as_string)?,
            email: document::take_field(&mut doc, "email", document::as_string)?,
            extra: doc,
        })
    }
}

/// Query of `GET /orders`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OrderFilter {
    pub email: Option<String>,
}

impl OrderFilter {
    pub fn normalized(self) -> Self {
        Self { email: document::non_blank(self.email) }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.email.as_ref().map_or(true, |e| order.email.as_ref() == Some(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::NewPet;
    use serde_json::json;

    fn pet(price: Option<f64>) -> Pet {
        let mut body = json!({ "name": "Rex", "category": "dog" });
        if let Some(p) = price {
            body["price"] = json!(p);
        }
        NewPet::from_json(body).unwrap().into_pet(Utc::now()).unwrap()
    }

    fn draft(body: Value) -> OrderDraft {
        NewOrder::from_json(body).unwrap().into_draft().unwrap()
    }

    #[test]
    fn create_requires_product_and_buyer() {
        for body in [
            json!({ "buyerName": "Ann" }),
            json!({ "productId": Uuid::new_v4().to_string() }),
            json!({ "productId": "", "buyerName": "Ann" }),
        ] {
            let err = NewOrder::from_json(body).unwrap().into_draft().unwrap_err();
            assert_eq!(err.message(), REQUIRED_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn snapshot_applies_defaults() {
        let p = pet(Some(99.0));
        let now = Utc::now();
        let order = draft(json!({ "productId": p.id.to_string(), "buyerName": "Ann" })).snapshot(&p, now);
        assert_eq!(order.product_id, p.id);
        assert_eq!(order.product_name, "Rex");
        assert_eq!(order.price, 99.0);
        assert_eq!(order.quantity, 1);
        assert_eq!(order.address, "");
        assert_eq!(order.phone, "");
        assert_eq!(order.additional_notes, "");
        assert_eq!(order.date, now);
        assert_eq!(order.email, None);
    }

    #[test]
    fn snapshot_keeps_supplied_values() {
        let p = pet(Some(99.0));
        let order = draft(json!({
            "productId": p.id.to_string(),
            "buyerName": "Ann",
            "price": 80,
            "quantity": 3,
            "address": "1 Main St",
            "phone": "555",
            "additionalNotes": "leave at door",
            "email": "ann@example.com",
            "productName": "Fake",
            "giftWrap": true
        }))
        .snapshot(&p, Utc::now());
        assert_eq!(order.price, 80.0);
        assert_eq!(order.quantity, 3);
        assert_eq!(order.address, "1 Main St");
        assert_eq!(order.phone, "555");
        assert_eq!(order.additional_notes, "leave at door");
        assert_eq!(order.email.as_deref(), Some("ann@example.com"));
        assert_eq!(order.product_name, "Rex");
        assert_eq!(order.extra.get("giftWrap"), Some(&json!(true)));
        assert!(!order.extra.contains_key("productName"));
    }

    #[test]
    fn price_falls_back_to_zero() {
        let p = pet(None);
        let order = draft(json!({ "productId": p.id.to_string(), "buyerName": "Ann" })).snapshot(&p, Utc::now());
        assert_eq!(order.price, 0.0);
    }

    #[test]
    fn malformed_product_ref_has_no_id() {
        let d = draft(json!({ "productId": "not-an-id", "buyerName": "Ann" }));
        assert_eq!(d.product_id(), None);
    }

    #[test]
    fn camel_case_wire_names() {
        let p = pet(Some(10.0));
        let order = draft(json!({ "productId": p.id.to_string(), "buyerName": "Ann" })).snapshot(&p, Utc::now());
        let v = serde_json::to_value(&order).unwrap();
        for key in ["_id", "productId", "buyerName", "productName", "price", "quantity", "address", "phone", "additionalNotes", "date"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        let back: Order = serde_json::from_value(v).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let p = pet(Some(10.0));
        let mut order = draft(json!({ "productId": p.id.to_string(), "buyerName": "Ann", "email": "a@x.io" }))
            .snapshot(&p, Utc::now());
        let before = order.clone();
        let patch = OrderPatch::from_json(json!({ "price": 50, "note": "rush" })).unwrap();
        assert!(order.apply(&patch));
        assert_eq!(order.price, 50.0);
        assert_eq!(order.product_name, before.product_name);
        assert_eq!(order.buyer_name, before.buyer_name);
        assert_eq!(order.email, before.email);
        assert_eq!(order.extra.get("note"), Some(&json!("rush")));

        let clear = OrderPatch::from_json(json!({ "email": null })).unwrap();
        assert!(order.apply(&clear));
        assert_eq!(order.email, None);
    }

    #[test]
    fn patch_validation() {
        assert!(OrderPatch::from_json(json!({ "buyerName": null })).is_err());
        assert!(OrderPatch::from_json(json!({ "productId": "nope" })).is_err());
        assert!(OrderPatch::from_json(json!({ "quantity": 1.5 })).is_err());
        assert!(OrderPatch::from_json(json!({ "_id": "x" })).is_err());
        let ok = OrderPatch::from_json(json!({ "productId": Uuid::new_v4().to_string() })).unwrap();
        assert!(ok.product_id.is_some());
    }

    #[test]
    fn filter_by_order_email() {
        let p = pet(None);
        let order = draft(json!({ "productId": p.id.to_string(), "buyerName": "Ann", "email": "a@x.io" }))
            .snapshot(&p, Utc::now());
        assert!(OrderFilter::default().matches(&order));
        assert!(OrderFilter { email: Some("a@x.io".into()) }.matches(&order));
        assert!(!OrderFilter { email: Some("b@x.io".into()) }.matches(&order));
    }
}
