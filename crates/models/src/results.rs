//! Acknowledgements returned by write operations.
//!
//! Misses on update/delete are reported through the counts, not as errors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertResult {
    pub fn new(inserted_id: Uuid) -> Self { Self { acknowledged: true, inserted_id } }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Uuid>,
}

impl UpdateResult {
    pub fn unmatched() -> Self {
        Self { acknowledged: true, matched_count: 0, modified_count: 0, upserted_count: 0, upserted_id: None }
    }

    /// A record matched; `modified` is false when every supplied value was already stored.
    pub fn matched(modified: bool) -> Self {
        Self { matched_count: 1, modified_count: u64::from(modified), ..Self::unmatched() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self { Self { acknowledged: true, deleted_count } }
}
