use crate::error::{TripError, TripResult};
use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use bon::Builder;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde_json::json;

pub const TRIPS_RESOURCE: &str = "/trips";
pub const ALLOWED_METHODS: &str = "GET,POST,DELETE,OPTIONS";

/// The parts of an API Gateway proxy event the dispatcher looks at.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub method: Method,
    #[builder(into)]
    pub path: Option<String>,
    #[builder(into)]
    pub body: Option<String>,
    /// Raw `limit` query parameter.
    #[builder(into)]
    pub limit: Option<String>,
    /// Raw `cursor` query parameter.
    #[builder(into)]
    pub cursor: Option<String>,
}

impl TripRequest {
    /// True unless the gateway forwarded a path other than the trips resource.
    pub fn targets_trips(&self) -> bool {
        match self.path.as_deref() {
            Some(path) => {
                let path = path.strip_suffix('/').unwrap_or(path);
                path == TRIPS_RESOURCE
            }
            None => true,
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.limit.is_some() || self.cursor.is_some()
    }
}

impl From<ApiGatewayProxyRequest> for TripRequest {
    fn from(request: ApiGatewayProxyRequest) -> Self {
        let query = &request.query_string_parameters;
        let limit = query.first("limit").map(str::to_string);
        let cursor = query.first("cursor").map(str::to_string);

        Self {
            method: request.http_method,
            path: request.path,
            body: request.body,
            limit,
            cursor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl TripResponse {
    fn new(status: u16, body: Option<String>) -> Self {
        let mut headers = cors_headers();
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn preflight() -> Self {
        Self::new(200, None)
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> TripResult<Self> {
        let body = serde_json::to_string(value)
            .map_err(|e| TripError::Unknown(format!("Failed to encode response: {}", e)))?;
        Ok(Self::new(status, Some(body)))
    }

    pub fn success(status: u16) -> Self {
        Self::new(status, Some(json!({ "success": true }).to_string()))
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::new(status, Some(json!({ "error": message }).to_string()))
    }

    pub fn method_not_allowed() -> Self {
        Self::error(405, "Method not allowed")
    }

    pub fn not_found() -> Self {
        Self::error(404, "Not found")
    }

    /// Every failure is a 500 unless `kinded` asks for the per-kind status.
    pub fn from_error(err: &TripError, kinded: bool) -> Self {
        let status = if kinded {
            err.kind().status_code()
        } else {
            500
        };
        Self::error(status, &err.to_string())
    }
}

impl From<TripResponse> for ApiGatewayProxyResponse {
    fn from(response: TripResponse) -> Self {
        ApiGatewayProxyResponse {
            status_code: i64::from(response.status),
            headers: response.headers,
            multi_value_headers: HeaderMap::new(),
            body: response.body.map(Body::Text),
            is_base64_encoded: false,
        }
    }
}

pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn body_json(response: &TripResponse) -> Value {
        serde_json::from_str(response.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_cors_headers_present() {
        for response in [
            TripResponse::preflight(),
            TripResponse::success(201),
            TripResponse::method_not_allowed(),
            TripResponse::not_found(),
            TripResponse::from_error(&TripError::InvalidInput("bad id".to_string()), true),
            TripResponse::from_error(&TripError::Unknown("boom".to_string()), false),
        ] {
            assert_eq!(response.headers["access-control-allow-origin"], "*");
            assert_eq!(response.headers["access-control-allow-headers"], "Content-Type");
            assert_eq!(
                response.headers["access-control-allow-methods"],
                "GET,POST,DELETE,OPTIONS"
            );
        }
    }

    #[test]
    fn test_preflight_has_no_body() {
        let response = TripResponse::preflight();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, None);
        assert!(response.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_error_mapping() {
        let err = TripError::StorageUnavailable("throttled".to_string());

        let response = TripResponse::from_error(&err, false);
        assert_eq!(response.status, 500);
        assert!(body_json(&response)["error"]
            .as_str()
            .unwrap()
            .contains("throttled"));

        let kinded = TripResponse::from_error(&err, true);
        assert_eq!(kinded.status, 503);

        let invalid = TripError::InvalidInput("Missing request body".to_string());
        assert_eq!(TripResponse::from_error(&invalid, false).status, 500);
        assert_eq!(TripResponse::from_error(&invalid, true).status, 400);
    }

    #[test]
    fn test_method_not_allowed_body() {
        let response = TripResponse::method_not_allowed();
        assert_eq!(response.status, 405);
        assert_eq!(body_json(&response), json!({"error": "Method not allowed"}));
    }

    #[test]
    fn test_targets_trips() {
        let request = |path: Option<&str>| {
            TripRequest::builder()
                .method(Method::GET)
                .maybe_path(path)
                .build()
        };

        assert!(request(None).targets_trips());
        assert!(request(Some("/trips")).targets_trips());
        assert!(request(Some("/trips/")).targets_trips());
        assert!(!request(Some("/prod/trips")).targets_trips());
        assert!(!request(Some("/users/trips")).targets_trips());
        assert!(!request(Some("/trips//")).targets_trips());
        assert!(!request(Some("/")).targets_trips());
        assert!(!request(Some("/trips/t1")).targets_trips());
    }

    #[test]
    fn test_from_proxy_request() {
        let proxy = ApiGatewayProxyRequest {
            http_method: Method::DELETE,
            path: Some("/trips".to_string()),
            body: Some(r#"{"id":"t1"}"#.to_string()),
            ..Default::default()
        };

        let request = TripRequest::from(proxy);
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.body.as_deref(), Some(r#"{"id":"t1"}"#));
        assert_eq!(request.limit, None);
        assert!(!request.is_paginated());
    }

    #[test]
    fn test_into_proxy_response() {
        let proxy = ApiGatewayProxyResponse::from(TripResponse::success(201));
        assert_eq!(proxy.status_code, 201);
        assert!(!proxy.is_base64_encoded);
        assert_eq!(proxy.headers["content-type"], "application/json");
        match proxy.body {
            Some(Body::Text(text)) => assert_eq!(text, r#"{"success":true}"#),
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
