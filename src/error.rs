use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors produced by the order and product transport clients.
///
/// These are passed through to the controllers unmodified; only the controllers
/// decide what the user gets to see.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Backend responded with status {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    pub fn closed() -> Self {
        TransportError::Unavailable("Transport closed".to_string())
    }

    pub fn dropped() -> Self {
        TransportError::Unavailable("Transport dropped the request".to_string())
    }

    /// The human readable message at `error.message` in a backend error body.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { body: Some(body), .. } => body
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// Errors returned by controller handles when the controller task is gone.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Controller closed")]
    Closed,
    #[error("Controller dropped the request")]
    Dropped,
    #[error("Controller is busy")]
    Busy,
}

/// Form fields that validation can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Product,
    Quantity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Product => write!(f, "product"),
            Field::Quantity => write!(f, "quantity"),
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{field} must be at least {min}, got {actual}")]
    BelowMinimum { field: Field, min: i64, actual: i64 },
    #[error("{field} is too large: {actual}")]
    TooLarge { field: Field, actual: i64 },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field) => *field,
            ValidationError::BelowMinimum { field, .. } => *field,
            ValidationError::TooLarge { field, .. } => *field,
        }
    }
}

/// Every validation failure found on one submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |e| e.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", reasons.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
