//! The charging dashboard: every user-triggered operation, coordinated by one
//! `CallOrchestrator` and reflected in one `PayloadCache`.

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::cache::{PayloadCache, Snapshot};
use crate::error::CallResult;
use crate::http::Transport;
use crate::orchestrator::CallOrchestrator;
use crate::publisher::DisplayState;
use crate::service::ApiService;
use crate::types::CreateSession;

pub struct ChargingDashboard<T> {
    api: ApiService<T>,
    orchestrator: CallOrchestrator,
    cache: PayloadCache,
}

impl<T: Transport> ChargingDashboard<T> {
    pub fn new(api: ApiService<T>) -> Self {
        Self {
            api,
            orchestrator: CallOrchestrator::new(),
            cache: PayloadCache::new(),
        }
    }

    pub fn api(&self) -> &ApiService<T> {
        &self.api
    }

    /// Reload the vehicle and the charging locations concurrently, then the
    /// chargers of the first location. Returns `false` if dropped because
    /// another operation is in flight.
    pub async fn refresh(&self) -> bool {
        self.orchestrator
            .trigger(async {
                tokio::join!(self.load_vehicle(), self.load_locations_and_chargers());
            })
            .await
    }

    /// Unlink the current vehicle. A failure leaves the cached vehicle in place.
    pub async fn remove_vehicle(&self) -> bool {
        self.orchestrator
            .trigger(async {
                let Some(vehicle) = self.cache.vehicle() else {
                    debug!("no vehicle to remove");
                    return;
                };
                let result = self.api.remove_vehicle(vehicle.id).await;
                if self.settle(&result).is_some() {
                    self.cache.set_vehicle(None);
                }
            })
            .await
    }

    /// Start charging the current vehicle at `location_id`.
    pub async fn start_session(&self, location_id: Uuid) -> bool {
        self.orchestrator
            .trigger(async {
                let Some(vehicle) = self.cache.vehicle() else {
                    debug!("no vehicle to start a session for");
                    return;
                };
                let input = CreateSession {
                    vehicle_id: vehicle.id,
                    location_id,
                };
                let result = self.api.create_session(&input).await;
                if let Some(session) = self.settle(&result) {
                    self.cache.set_session(session.clone());
                }
            })
            .await
    }

    /// Re-read the current session.
    pub async fn refresh_session(&self) -> bool {
        self.orchestrator
            .trigger(async {
                let Some(session) = self.cache.session() else {
                    debug!("no session to refresh");
                    return;
                };
                let result = self.api.fetch_session(session.id).await;
                if let Some(session) = self.settle(&result) {
                    self.cache.set_session(session.clone());
                }
            })
            .await
    }

    async fn load_vehicle(&self) {
        let result = self.api.list_vehicles().await;
        if let Some(vehicles) = self.settle(&result) {
            self.cache.set_vehicle(vehicles.first().cloned());
        }
    }

    async fn load_locations_and_chargers(&self) {
        let result = self.api.list_locations().await;
        let Some(locations) = self.settle(&result) else {
            return;
        };
        self.cache.set_locations(locations.clone());

        let Some(first) = locations.first() else {
            debug!("no charging locations, skipping charger lookup");
            return;
        };
        let chargers = self.api.list_chargers(first.id).await;
        if let Some(chargers) = self.settle(&chargers) {
            self.cache.set_chargers(chargers.clone());
        }
    }

    /// Report a branch outcome and hand back its payload on success.
    fn settle<'r, P>(&self, result: &'r CallResult<P>) -> Option<&'r P> {
        self.orchestrator.report(result);
        result.as_ref().ok()
    }

    pub fn is_in_flight(&self) -> bool {
        self.orchestrator.is_in_flight()
    }

    pub fn subscribe_in_flight(&self) -> watch::Receiver<bool> {
        self.orchestrator.subscribe_in_flight()
    }

    pub fn last_error(&self) -> Option<String> {
        self.orchestrator.last_error()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.orchestrator.subscribe_error()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cache.snapshot()
    }

    pub fn display(&self) -> DisplayState {
        self.cache.display()
    }

    pub fn subscribe_display(&self) -> watch::Receiver<DisplayState> {
        self.cache.subscribe_display()
    }
}
