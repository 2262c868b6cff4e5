//! Display fields derived from the payload cache.

use std::fmt;

use tokio::sync::watch;

use crate::cache::Snapshot;
use crate::types::{ChargerStatus, SessionState};

pub const NO_VEHICLE: &str = "No vehicles found";
pub const NO_LOCATIONS: &str = "No charging locations found";

/// The vehicle action offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionLabel {
    Connect,
    Remove,
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionLabel::Connect => write!(f, "Connect"),
            ActionLabel::Remove => write!(f, "Remove"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub vehicle_name: String,
    pub battery: String,
    pub vehicle_action: ActionLabel,
    pub location_name: String,
    pub charger_summary: String,
    pub session_status: String,
}

impl DisplayState {
    pub fn derive(snapshot: &Snapshot) -> Self {
        let (vehicle_name, battery, vehicle_action) = match &snapshot.vehicle {
            Some(v) => (
                format!("{} {}", v.make, v.model),
                v.battery_percent.map(|p| format!("{p}%")).unwrap_or_default(),
                ActionLabel::Remove,
            ),
            None => (NO_VEHICLE.to_string(), String::new(), ActionLabel::Connect),
        };

        let first_location = snapshot
            .locations
            .as_ref()
            .and_then(|locations| locations.first());
        let location_name = first_location
            .map(|l| l.name.clone())
            .unwrap_or_else(|| NO_LOCATIONS.to_string());

        // Chargers of a location that is no longer first are stale.
        let chargers: Vec<_> = match (first_location, &snapshot.chargers) {
            (Some(location), Some(chargers)) => chargers
                .iter()
                .filter(|c| c.location_id == location.id)
                .collect(),
            _ => Vec::new(),
        };
        let charger_summary = if chargers.is_empty() {
            String::new()
        } else {
            let available = chargers
                .iter()
                .filter(|c| c.status == ChargerStatus::Available)
                .count();
            format!("{available} of {} chargers available", chargers.len())
        };

        let session_status = match snapshot.session.as_ref().map(|s| s.state) {
            Some(SessionState::Pending) => "Starting".to_string(),
            Some(SessionState::Charging) => "Charging".to_string(),
            Some(SessionState::Completed) => "Completed".to_string(),
            Some(SessionState::Failed) => "Failed".to_string(),
            None => String::new(),
        };

        Self {
            vehicle_name,
            battery,
            vehicle_action,
            location_name,
            charger_summary,
            session_status,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::derive(&Snapshot::default())
    }
}

/// Pushes a fresh `DisplayState` to subscribers on every cache write.
#[derive(Debug)]
pub struct StatePublisher {
    display: watch::Sender<DisplayState>,
}

impl StatePublisher {
    pub fn new(initial: &Snapshot) -> Self {
        Self {
            display: watch::Sender::new(DisplayState::derive(initial)),
        }
    }

    pub fn recompute(&self, snapshot: &Snapshot) {
        let next = DisplayState::derive(snapshot);
        self.display.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    pub fn current(&self) -> DisplayState {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }
}
