//! Endpoint descriptors: how to decode a payload and which status codes an
//! endpoint reports as domain errors.
//!
//! # Design
//! Endpoints disagree on what a status code means (a 400 is a malformed
//! session on create but is not part of the fetch contract), so each
//! descriptor carries its own partial mapping. A code the descriptor does not
//! map yields `None` and is resolved by the translator's generic envelope
//! path. Descriptors are `const` items: stateless and shared by every call.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::{DomainError, ErrorEnvelope};
use crate::types::{Charger, ChargingLocation, Session, Vehicle};

/// Decoding and status mapping for one logical operation.
pub trait Endpoint: Send + Sync {
    type Payload;

    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Decode a 2xx body into the payload.
    fn decode(&self, body: &[u8]) -> Result<Self::Payload, serde_json::Error>;

    /// Map a non-2xx status to a domain error, or `None` if this endpoint
    /// does not claim the code.
    fn map_status(&self, status: u16, body: &[u8]) -> Option<DomainError>;
}

/// The distinct status-mapping behaviors found across the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMapping {
    /// 401 and 403 only.
    Standard,
    /// 400 and 404 carry a structured body; 401 and 403 are generic.
    CreateSession,
    /// 404 carries a structured body; 401 and 403 are generic.
    FetchSession,
}

impl ErrorMapping {
    pub fn map(&self, status: u16, body: &[u8]) -> Option<DomainError> {
        match (self, status) {
            (_, 401) => Some(DomainError::Unauthorized),
            (_, 403) => Some(DomainError::Forbidden),
            (ErrorMapping::CreateSession, 400 | 404) | (ErrorMapping::FetchSession, 404) => {
                structured(body)
            }
            _ => None,
        }
    }
}

fn structured(body: &[u8]) -> Option<DomainError> {
    ErrorEnvelope::decode(body).ok().map(DomainError::from)
}

/// A JSON endpoint with payload type `T`.
pub struct Descriptor<T> {
    name: &'static str,
    errors: ErrorMapping,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Descriptor<T> {
    pub const fn new(name: &'static str, errors: ErrorMapping) -> Self {
        Self {
            name,
            errors,
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("errors", &self.errors)
            .finish()
    }
}

impl<T: DeserializeOwned> Endpoint for Descriptor<T> {
    type Payload = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn decode(&self, body: &[u8]) -> Result<T, serde_json::Error> {
        decode_json(body)
    }

    fn map_status(&self, status: u16, body: &[u8]) -> Option<DomainError> {
        self.errors.map(status, body)
    }
}

/// Decode a JSON body. An empty body reads as `null`, so `()` and `Option`
/// payloads accept bodiless responses such as 204.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(body)
    }
}

pub const CREATE_SESSION: Descriptor<Session> =
    Descriptor::new("create_session", ErrorMapping::CreateSession);

pub const FETCH_SESSION: Descriptor<Session> =
    Descriptor::new("fetch_session", ErrorMapping::FetchSession);

pub const LIST_VEHICLES: Descriptor<Vec<Vehicle>> =
    Descriptor::new("list_vehicles", ErrorMapping::Standard);

pub const REMOVE_VEHICLE: Descriptor<()> =
    Descriptor::new("remove_vehicle", ErrorMapping::Standard);

pub const LIST_LOCATIONS: Descriptor<Vec<ChargingLocation>> =
    Descriptor::new("list_locations", ErrorMapping::Standard);

pub const LIST_CHARGERS: Descriptor<Vec<Charger>> =
    Descriptor::new("list_chargers", ErrorMapping::Standard);

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_FOUND: &[u8] = br#"{"code":"not_found","title":"Session not found"}"#;

    fn api(code: &str, title: &str) -> DomainError {
        DomainError::Api {
            code: code.to_string(),
            title: title.to_string(),
            detail: None,
        }
    }

    #[test]
    fn create_session_maps_auth_codes_regardless_of_body() {
        for body in [&b""[..], NOT_FOUND, b"garbage"] {
            assert_eq!(
                CREATE_SESSION.map_status(401, body),
                Some(DomainError::Unauthorized)
            );
            assert_eq!(
                CREATE_SESSION.map_status(403, body),
                Some(DomainError::Forbidden)
            );
        }
    }

    #[test]
    fn create_session_decodes_400_and_404_bodies() {
        let body = br#"{"code":"invalid_location","title":"Unknown location"}"#;
        assert_eq!(
            CREATE_SESSION.map_status(400, body),
            Some(api("invalid_location", "Unknown location"))
        );
        assert_eq!(
            CREATE_SESSION.map_status(404, NOT_FOUND),
            Some(api("not_found", "Session not found"))
        );
    }

    #[test]
    fn fetch_session_leaves_400_unmapped() {
        let body = br#"{"code":"invalid","title":"Invalid"}"#;
        assert_eq!(FETCH_SESSION.map_status(400, body), None);
        assert_eq!(
            FETCH_SESSION.map_status(404, NOT_FOUND),
            Some(api("not_found", "Session not found"))
        );
    }

    #[test]
    fn unmapped_codes_yield_none() {
        for status in [409, 422, 500, 502] {
            assert_eq!(CREATE_SESSION.map_status(status, NOT_FOUND), None);
            assert_eq!(FETCH_SESSION.map_status(status, NOT_FOUND), None);
            assert_eq!(LIST_VEHICLES.map_status(status, NOT_FOUND), None);
        }
        assert_eq!(LIST_CHARGERS.map_status(404, NOT_FOUND), None);
    }

    #[test]
    fn structured_code_with_bad_body_is_left_to_translator() {
        assert_eq!(CREATE_SESSION.map_status(404, b"not json"), None);
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        REMOVE_VEHICLE.decode(b"").unwrap();
        REMOVE_VEHICLE.decode(b"  \n").unwrap();
    }

    #[test]
    fn empty_body_is_invalid_for_lists() {
        assert!(LIST_VEHICLES.decode(b"").is_err());
    }

    #[test]
    fn descriptor_debug_shows_name() {
        let debug = format!("{:?}", FETCH_SESSION);
        assert!(debug.contains("fetch_session"));
        assert!(debug.contains("FetchSession"));
    }
}
