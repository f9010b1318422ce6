//! Storage capability consumed by the trip handler.
//!
//! The handler never talks to DynamoDB directly; it is given a [`TripStore`]
//! so the table can be swapped for [`MemoryTripStore`] in tests and local runs.

mod dynamo;
mod memory;

pub use dynamo::DynamoTripStore;
pub use memory::MemoryTripStore;

use crate::error::TripResult;
use crate::trip::Trip;
use async_trait::async_trait;
use serde::Serialize;

/// Which slice of the table a scan should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of records. `None` reads as much as the backend returns
    /// in a single call.
    pub limit: Option<usize>,
    /// Exclusive start: the `id` of the last record of the previous page.
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn first() -> Self {
        Self::default()
    }

    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            limit: None,
            cursor: Some(cursor.into()),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripPage {
    pub items: Vec<Trip>,
    /// Present when the scan stopped before the end of the table.
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait TripStore: Send + Sync {
    /// Reads one page of records. Every call is a single backend request.
    async fn scan(&self, page: PageRequest) -> TripResult<TripPage>;

    /// Writes the record, replacing any record with the same `id`.
    async fn put(&self, trip: Trip) -> TripResult<()>;

    /// Removes the record with `id`. Succeeds whether or not it existed.
    async fn delete(&self, id: &str) -> TripResult<()>;
}
