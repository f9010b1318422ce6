use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::fmt;
use thiserror::Error;

pub type TripResult<T> = Result<T, TripError>;

/// DynamoDB error codes that indicate the table is temporarily unable to serve
/// the request. Anything else coming back from the service is `Unknown`.
const TRANSIENT_ERROR_CODES: &[&str] = &[
    "ThrottlingException",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "ServiceUnavailable",
    "InternalServerError",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    StorageUnavailable,
    Unknown,
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::StorageUnavailable => 503,
            Self::Unknown => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::StorageUnavailable => write!(f, "storage_unavailable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TripError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Trip storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("{0}")]
    Unknown(String),
}

impl TripError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn invalid_body(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("Invalid request body: {}", err))
    }
}

impl From<serde_dynamo::Error> for TripError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::Unknown(format!("Failed to convert trip item: {}", err))
    }
}

impl<E, R> From<SdkError<E, R>> for TripError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: fmt::Debug,
{
    fn from(err: SdkError<E, R>) -> Self {
        let message = DisplayErrorContext(&err).to_string();

        let transient = match &err {
            SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => true,
            _ => err
                .as_service_error()
                .and_then(|service_error| service_error.code())
                .is_some_and(is_transient_code),
        };

        if transient {
            Self::StorageUnavailable(message)
        } else {
            Self::Unknown(message)
        }
    }
}

pub fn is_transient_code(code: &str) -> bool {
    TRANSIENT_ERROR_CODES.contains(&code)
}
