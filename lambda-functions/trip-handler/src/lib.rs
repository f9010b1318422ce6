pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod provision;
pub mod store;
pub mod trip;

pub use api::{cors_headers, TripRequest, TripResponse};
pub use config::Config;
pub use error::{ErrorKind, TripError, TripResult};
pub use handler::TripHandler;
pub use store::{DynamoTripStore, MemoryTripStore, PageRequest, TripPage, TripStore};
pub use trip::{Trip, TripKey};
