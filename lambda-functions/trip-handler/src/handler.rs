use crate::api::{TripRequest, TripResponse};
use crate::config::Config;
use crate::error::{TripError, TripResult};
use crate::store::{PageRequest, TripStore};
use crate::trip::{Trip, TripKey};
use http::Method;
use tracing::{error, info, warn};

/// Translates one HTTP request into one storage operation.
pub struct TripHandler<S> {
    store: S,
    config: Config,
}

impl<S: TripStore> TripHandler<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Never fails: storage and input errors become error responses.
    pub async fn handle(&self, request: TripRequest) -> TripResponse {
        info!(
            method = %request.method,
            path = ?request.path,
            "Handling trip request"
        );

        if !request.targets_trips() {
            warn!("No route for path {:?}", request.path);
            return TripResponse::not_found();
        }

        let result = match request.method {
            Method::OPTIONS => Ok(TripResponse::preflight()),
            Method::GET => self.list_trips(&request).await,
            Method::POST => self.create_trip(&request).await,
            Method::DELETE => self.delete_trip(&request).await,
            _ => {
                warn!("Method not allowed: {}", request.method);
                Ok(TripResponse::method_not_allowed())
            }
        };

        match result {
            Ok(response) => {
                info!(status = response.status, "Trip request completed");
                response
            }
            Err(err) => {
                let response = TripResponse::from_error(&err, self.config.kinded_errors);
                error!(
                    kind = %err.kind(),
                    status = response.status,
                    "Trip request failed: {}",
                    err
                );
                response
            }
        }
    }

    async fn list_trips(&self, request: &TripRequest) -> TripResult<TripResponse> {
        if !request.is_paginated() {
            let trips = self.scan_all().await?;
            return TripResponse::json(200, &trips);
        }

        let limit = match request.limit.as_deref() {
            Some(raw) => self.parse_limit(raw)?,
            None => self.config.max_page_size,
        };

        let page = self
            .store
            .scan(PageRequest {
                limit: Some(limit),
                cursor: request.cursor.clone(),
            })
            .await?;

        TripResponse::json(200, &page)
    }

    /// Follows the scan continuation until the table is exhausted.
    async fn scan_all(&self) -> TripResult<Vec<Trip>> {
        let mut trips = Vec::new();
        let mut cursor = None;

        loop {
            let page = self
                .store
                .scan(PageRequest {
                    limit: None,
                    cursor: cursor.take(),
                })
                .await?;

            trips.extend(page.items);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(trips)
    }

    async fn create_trip(&self, request: &TripRequest) -> TripResult<TripResponse> {
        let trip = Trip::from_body(request.body.as_deref())?;
        let id = trip.id.clone();

        self.store.put(trip).await?;

        info!("Stored trip {}", id);
        Ok(TripResponse::success(201))
    }

    async fn delete_trip(&self, request: &TripRequest) -> TripResult<TripResponse> {
        let key = TripKey::from_body(request.body.as_deref())?;

        self.store.delete(&key.id).await?;

        info!("Deleted trip {}", key.id);
        Ok(TripResponse::success(200))
    }

    fn parse_limit(&self, raw: &str) -> TripResult<usize> {
        let max = self.config.max_page_size;

        match raw.trim().parse::<usize>() {
            Ok(limit) if (1..=max).contains(&limit) => Ok(limit),
            _ => Err(TripError::InvalidInput(format!(
                "limit must be an integer between 1 and {}",
                max
            ))),
        }
    }
}
