//! Result algebra for every remote call.
//!
//! # Design
//! A call produces `CallResult<T>`: either the decoded payload or exactly one
//! `Failure`. The failure set is closed and has no catch-all variant, so every
//! consumer matches each kind explicitly. The `Display` text of a `Failure`
//! is the human-facing message surfaced by the orchestrator's error signal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::TransportError;

/// Outcome of one remote call.
pub type CallResult<T> = Result<T, Failure>;

/// Endpoint-level errors reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    /// A structured error decoded from the response body.
    #[error("{title}")]
    Api {
        code: String,
        title: String,
        detail: Option<String>,
    },
}

impl From<ErrorEnvelope> for DomainError {
    fn from(envelope: ErrorEnvelope) -> Self {
        DomainError::Api {
            code: envelope.code,
            title: envelope.title,
            detail: envelope.detail,
        }
    }
}

/// Every way a call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The transport could not complete the exchange.
    #[error("Please check your network")]
    Network(#[source] TransportError),

    /// The body could not be decoded into the expected shape.
    #[error("Unexpected response")]
    InvalidResult { reason: String },

    /// The client was used before initialization completed.
    #[error("SDK Not initialized properly")]
    NotReady,
}

impl Failure {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Failure::InvalidResult {
            reason: reason.into(),
        }
    }
}

impl From<TransportError> for Failure {
    fn from(err: TransportError) -> Self {
        Failure::Network(err)
    }
}

/// Errors raised while building a request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request body serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RequestError> for Failure {
    fn from(err: RequestError) -> Self {
        Failure::invalid(err.to_string())
    }
}

/// The standard error body shared by most endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::TransportErrorKind;

    #[test]
    fn messages_match_failure_kinds() {
        assert_eq!(Failure::from(DomainError::Forbidden).to_string(), "Forbidden");
        assert_eq!(
            Failure::from(DomainError::Unauthorized).to_string(),
            "Unauthorized"
        );
        let api = DomainError::Api {
            code: "bad".to_string(),
            title: "Bad vehicle".to_string(),
            detail: Some("ignored in the message".to_string()),
        };
        assert_eq!(Failure::from(api).to_string(), "Bad vehicle");
        let network = TransportError::new(TransportErrorKind::Timeout, "timed out");
        assert_eq!(
            Failure::from(network).to_string(),
            "Please check your network"
        );
        assert_eq!(Failure::invalid("x").to_string(), "Unexpected response");
        assert_eq!(Failure::NotReady.to_string(), "SDK Not initialized properly");
    }

    #[test]
    fn envelope_detail_is_optional() {
        let envelope =
            ErrorEnvelope::decode(br#"{"code":"not_found","title":"Session not found"}"#)
                .unwrap();
        assert_eq!(envelope.code, "not_found");
        assert_eq!(envelope.title, "Session not found");
        assert!(envelope.detail.is_none());
    }

    #[test]
    fn envelope_requires_code_and_title() {
        assert!(ErrorEnvelope::decode(br#"{"title":"Missing code"}"#).is_err());
        assert!(ErrorEnvelope::decode(b"<html>").is_err());
    }
}
