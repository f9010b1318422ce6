use super::{PageRequest, TripPage, TripStore};
use crate::error::TripResult;
use crate::trip::Trip;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Strongly consistent in-process store, ordered by `id`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTripStore {
    trips: Arc<RwLock<BTreeMap<String, Trip>>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trips(trips: impl IntoIterator<Item = Trip>) -> Self {
        let trips = trips
            .into_iter()
            .map(|trip| (trip.id.clone(), trip))
            .collect();

        Self {
            trips: Arc::new(RwLock::new(trips)),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Trip> {
        self.trips.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trips.read().await.is_empty()
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn scan(&self, page: PageRequest) -> TripResult<TripPage> {
        let trips = self.trips.read().await;

        let start = match page.cursor.as_deref() {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };
        let mut remaining = trips
            .range::<str, _>((start, Bound::Unbounded))
            .map(|(_, trip)| trip);

        let items: Vec<Trip> = match page.limit {
            Some(limit) => remaining.by_ref().take(limit).cloned().collect(),
            None => remaining.by_ref().cloned().collect(),
        };

        let next_cursor = match (remaining.next(), items.last()) {
            (Some(_), Some(last)) => Some(last.id.clone()),
            _ => None,
        };

        Ok(TripPage { items, next_cursor })
    }

    async fn put(&self, trip: Trip) -> TripResult<()> {
        self.trips.write().await.insert(trip.id.clone(), trip);
        Ok(())
    }

    async fn delete(&self, id: &str) -> TripResult<()> {
        self.trips.write().await.remove(id);
        Ok(())
    }
}
