//! Product directory client boundary.
//!
//! The directory is an external catalog service with a loose wire contract:
//! field casing varies between deployments, the availability state arrives as
//! either a name or a discriminant, and unavailable backends must degrade to a
//! not-found answer rather than failing the whole batch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::types::ProductState;

/// The subset of directory product data admission cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(alias = "Id")]
    pub id: i32,
    #[serde(
        rename = "productState",
        alias = "state",
        alias = "State",
        alias = "ProductState"
    )]
    pub state: ProductState,
    #[serde(alias = "RequiresApproval")]
    pub requires_approval: bool,
}

/// Outcome of one directory lookup. Transport failures, timeouts, and
/// unparseable payloads all collapse into `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryLookup {
    Found(ProductSnapshot),
    NotFound,
}

/// Interpret a raw directory response body.
pub fn parse_snapshot(body: &str) -> DirectoryLookup {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return DirectoryLookup::NotFound;
    }
    match serde_json::from_str::<ProductSnapshot>(trimmed) {
        Ok(snapshot) => DirectoryLookup::Found(snapshot),
        Err(_) => DirectoryLookup::NotFound,
    }
}

#[async_trait]
pub trait ProductDirectory: Send + Sync {
    async fn fetch(&self, product_id: i32) -> DirectoryLookup;
}
