//! Latest known payload per tracked entity.
//!
//! Every write replaces one whole entry and synchronously republishes the
//! derived display state, so subscribers never observe a snapshot whose
//! display fields lag behind it.

use tokio::sync::watch;

use crate::publisher::{DisplayState, StatePublisher};
use crate::types::{Charger, ChargingLocation, Session, Vehicle};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub vehicle: Option<Vehicle>,
    pub locations: Option<Vec<ChargingLocation>>,
    pub chargers: Option<Vec<Charger>>,
    pub session: Option<Session>,
}

#[derive(Debug)]
pub struct PayloadCache {
    snapshot: watch::Sender<Snapshot>,
    publisher: StatePublisher,
}

impl PayloadCache {
    pub fn new() -> Self {
        let snapshot = Snapshot::default();
        let publisher = StatePublisher::new(&snapshot);
        Self {
            snapshot: watch::Sender::new(snapshot),
            publisher,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_display(&self) -> watch::Receiver<DisplayState> {
        self.publisher.subscribe()
    }

    pub fn display(&self) -> DisplayState {
        self.publisher.current()
    }

    pub fn vehicle(&self) -> Option<Vehicle> {
        self.snapshot.borrow().vehicle.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.snapshot.borrow().session.clone()
    }

    pub fn set_vehicle(&self, vehicle: Option<Vehicle>) {
        self.update(|s| s.vehicle = vehicle);
    }

    pub fn set_locations(&self, locations: Vec<ChargingLocation>) {
        self.update(|s| s.locations = Some(locations));
    }

    pub fn set_chargers(&self, chargers: Vec<Charger>) {
        self.update(|s| s.chargers = Some(chargers));
    }

    pub fn set_session(&self, session: Session) {
        self.update(|s| s.session = Some(session));
    }

    fn update(&self, apply: impl FnOnce(&mut Snapshot)) {
        // Display is republished while the snapshot write lock is held, so
        // snapshot receivers are only woken once it is current.
        self.snapshot.send_modify(|snapshot| {
            apply(snapshot);
            self.publisher.recompute(snapshot);
        });
    }
}

impl Default for PayloadCache {
    fn default() -> Self {
        Self::new()
    }
}
