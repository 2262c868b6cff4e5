//! Stateless HTTP request builder for the charging API.
//!
//! # Design
//! `ChargeClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; translating the response is left to the endpoint
//! descriptors, so the caller (or `ApiService`) executes the round-trip in
//! between.

use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::CreateSession;

#[derive(Debug, Clone)]
pub struct ChargeClient {
    base_url: String,
}

impl ChargeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn build_create_session(&self, input: &CreateSession) -> Result<HttpRequest, RequestError> {
        let body = serde_json::to_string(input)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/sessions", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_fetch_session(&self, id: Uuid) -> HttpRequest {
        self.get(format!("{}/sessions/{id}", self.base_url))
    }

    pub fn build_list_vehicles(&self) -> HttpRequest {
        self.get(format!("{}/vehicles", self.base_url))
    }

    pub fn build_remove_vehicle(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/vehicles/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_list_locations(&self) -> HttpRequest {
        self.get(format!("{}/locations", self.base_url))
    }

    pub fn build_list_chargers(&self, location_id: Uuid) -> HttpRequest {
        self.get(format!("{}/locations/{location_id}/chargers", self.base_url))
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }
}
