use crate::error::{TripError, TripResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partition key of the trips table.
pub const ID_ATTRIBUTE: &str = "id";

/// A trip record. Only `id` is known to the service; every other attribute is
/// stored and returned exactly as the caller sent it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Trip {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Parses a POST body into a record.
    pub fn from_body(body: Option<&str>) -> TripResult<Self> {
        let trip: Trip = parse_body(body)?;
        require_id(&trip.id)?;
        Ok(trip)
    }
}

/// Body of a DELETE request.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TripKey {
    pub id: String,
}

impl TripKey {
    pub fn from_body(body: Option<&str>) -> TripResult<Self> {
        let key: TripKey = parse_body(body)?;
        require_id(&key.id)?;
        Ok(key)
    }
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: Option<&str>) -> TripResult<T> {
    let body = body.ok_or_else(|| TripError::InvalidInput("Missing request body".to_string()))?;
    serde_json::from_str(body).map_err(TripError::invalid_body)
}

// DynamoDB rejects empty strings in key attributes.
fn require_id(id: &str) -> TripResult<()> {
    if id.is_empty() {
        return Err(TripError::InvalidInput(
            "Trip id must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_trip_keeps_caller_attributes() {
        let body = r#"{"id": "t1", "km": 10, "note": "commute", "tags": ["work"]}"#;
        let trip = Trip::from_body(Some(body)).unwrap();

        assert_eq!(trip.id, "t1");
        assert_eq!(trip.attributes.get("km"), Some(&json!(10)));
        assert_eq!(trip.attributes.get("tags"), Some(&json!(["work"])));
        assert!(!trip.attributes.contains_key("id"));
    }

    #[test]
    fn test_trip_serializes_flat() {
        let trip = Trip::new("t1").with_attribute("km", 10);
        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json, json!({"id": "t1", "km": 10}));
    }

    #[test]
    fn test_trip_requires_id() {
        let err = Trip::from_body(Some(r#"{"km": 10}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_trip_rejects_empty_id() {
        let err = Trip::from_body(Some(r#"{"id": ""}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_trip_rejects_numeric_id() {
        let err = Trip::from_body(Some(r#"{"id": 7}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_body() {
        let err = TripKey::from_body(None).unwrap_err();
        assert_eq!(err.to_string(), "Missing request body");
    }

    #[test]
    fn test_trip_key_ignores_extra_fields() {
        let key = TripKey::from_body(Some(r#"{"id": "t1", "km": 3}"#)).unwrap();
        assert_eq!(key.id, "t1");
    }
}
