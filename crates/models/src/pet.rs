use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::document::{self, Document};
use crate::errors::ModelError;

/// Row shape for the Postgres backend.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pet")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub owner_email: Option<String>,
    pub price: Option<f64>,
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

pub const REQUIRED_FIELDS_MESSAGE: &str = "Missing required fields: name, category";

/// A pet for sale, as stored and served.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Pet {
    /// Merge a patch; returns whether anything actually changed.
    pub fn apply(&mut self, patch: &PetPatch) -> bool {
        let mut changed = false;
        if let Some(name) = &patch.name {
            changed |= document::set_if_changed(&mut self.name, name.clone());
        }
        if let Some(category) = &patch.category {
            changed |= document::set_if_changed(&mut self.category, category.clone());
        }
        if let Some(owner_email) = &patch.owner_email {
            changed |= document::set_if_changed(&mut self.owner_email, owner_email.clone());
        }
        if let Some(price) = patch.price {
            changed |= document::set_if_changed(&mut self.price, price);
        }
        changed |= document::merge_extra(&mut self.extra, &patch.extra);
        changed
    }
}

impl From<Model> for Pet {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category: m.category,
            owner_email: m.owner_email,
            price: m.price,
            date: m.date.with_timezone(&Utc),
            extra: document::from_column(m.extra),
        }
    }
}

impl From<&Pet> for ActiveModel {
    fn from(p: &Pet) -> Self {
        Self {
            id: Set(p.id),
            name: Set(p.name.clone()),
            category: Set(p.category.clone()),
            owner_email: Set(p.owner_email.clone()),
            price: Set(p.price),
            date: Set(p.date.into()),
            extra: Set(Value::Object(p.extra.clone())),
        }
    }
}

/// Body of `POST /pets`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewPet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewPet {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        let obj = document::into_object(body)?;
        serde_json::from_value(Value::Object(obj)).map_err(|e| ModelError::validation(e.to_string()))
    }

    /// Validate required fields and stamp server-managed ones.
    pub fn into_pet(self, now: DateTime<Utc>) -> Result<Pet, ModelError> {
        let (Some(name), Some(category)) = (document::non_blank(self.name), document::non_blank(self.category)) else {
            return Err(ModelError::validation(REQUIRED_FIELDS_MESSAGE));
        };
        let mut extra = self.extra;
        document::strip_keys(&mut extra, &document::SERVER_FIELDS);
        Ok(Pet {
            id: Uuid::new_v4(),
            name,
            category,
            owner_email: self.owner_email,
            price: self.price,
            date: now,
            extra,
        })
    }
}

/// Body of `PATCH /pets/:id`; only supplied fields are applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub owner_email: Option<Option<String>>,
    pub price: Option<Option<f64>>,
    pub extra: Document,
}

impl PetPatch {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        let mut doc = document::into_object(body)?;
        document::reject_server_fields(&doc)?;
        Ok(Self {
            name: document::take_required(&mut doc, "name", document::as_non_blank)?,
            category: document::take_required(&mut doc, "category", document::as_non_blank)?,
            owner_email: document::take_field(&mut doc, "owner_email", document::as_string)?,
            price: document::take_field(&mut doc, "price", document::as_f64)?,
            extra: doc,
        })
    }
}

/// Query of `GET /pets`; absent or empty filters match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PetFilter {
    pub email: Option<String>,
    pub category: Option<String>,
}

impl PetFilter {
    pub fn normalized(self) -> Self {
        Self { email: document::non_blank(self.email), category: document::non_blank(self.category) }
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        let email_ok = self.email.as_ref().map_or(true, |e| pet.owner_email.as_ref() == Some(e));
        let category_ok = self.category.as_ref().map_or(true, |c| &pet.category == c);
        email_ok && category_ok
    }
}
