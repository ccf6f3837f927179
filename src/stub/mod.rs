pub mod canonical;
pub mod catalogue;
pub mod dispatch;
pub mod resolver;

use std::fmt;

use serde_json::Value;

/// Request header that lets a client force a configured status code.
pub const STATUS_OVERRIDE_HEADER: &str = "x-stub-status";

/// The response chosen for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct StubResponse {
    pub status: u16,
    pub body: Value,
}

#[derive(Debug)]
pub enum StubError {
    /// Unknown path, or a known path requested with the wrong method.
    NotFound,
    InvalidBody(serde_json::Error),
    /// The endpoint has no configured responses at all.
    NoMatchingResponse,
}

impl StubError {
    pub fn status_code(&self) -> u16 {
        match self {
            StubError::NotFound => 404,
            StubError::InvalidBody(_) => 400,
            StubError::NoMatchingResponse => 500,
        }
    }
}

impl fmt::Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StubError::NotFound => write!(f, "Not Found"),
            StubError::InvalidBody(_) => write!(f, "Invalid JSON in request body"),
            StubError::NoMatchingResponse => write!(f, "No matching response found"),
        }
    }
}

impl std::error::Error for StubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StubError::InvalidBody(e) => Some(e),
            _ => None,
        }
    }
}
