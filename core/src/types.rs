//! Payload DTOs for the charging API.
//!
//! # Design
//! These mirror the mock-server schema but are defined independently;
//! integration tests catch drift between the two crates. The pipeline treats
//! them as opaque payloads, only the state publisher reads their fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vehicle linked to the current user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_percent: Option<u8>,
}

/// A site hosting one or more chargers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChargingLocation {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChargerStatus {
    Available,
    Occupied,
    OutOfOrder,
}

/// A single charger at a charging location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charger {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub status: ChargerStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Pending,
    Charging,
    Completed,
    Failed,
}

/// A charging session for one vehicle at one location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub location_id: Uuid,
    pub state: SessionState,
}

/// Request payload for starting a charging session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub vehicle_id: Uuid,
    pub location_id: Uuid,
}
