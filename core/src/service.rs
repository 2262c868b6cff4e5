//! Typed async calls: readiness check, transport round-trip, translation.

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::client::ChargeClient;
use crate::endpoint::{
    Endpoint, CREATE_SESSION, FETCH_SESSION, LIST_CHARGERS, LIST_LOCATIONS, LIST_VEHICLES,
    REMOVE_VEHICLE,
};
use crate::error::{CallResult, Failure};
use crate::http::{HttpRequest, Readiness, Transport};
use crate::translate::translate;
use crate::types::{Charger, ChargingLocation, CreateSession, Session, Vehicle};

pub struct ApiService<T> {
    client: ChargeClient,
    transport: T,
    readiness: Box<dyn Readiness>,
}

impl<T: Transport> ApiService<T> {
    /// A service that always reports itself ready.
    pub fn new(client: ChargeClient, transport: T) -> Self {
        Self {
            client,
            transport,
            readiness: Box::new(|| true),
        }
    }

    pub fn with_readiness(mut self, readiness: impl Readiness + 'static) -> Self {
        self.readiness = Box::new(readiness);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute one request against `endpoint`. Never panics and never
    /// returns an untranslated error.
    pub async fn call<E: Endpoint>(&self, endpoint: &E, request: HttpRequest) -> CallResult<E::Payload> {
        if !self.readiness.is_ready() {
            error!(endpoint = endpoint.name(), "call issued before the client was initialized");
            return Err(Failure::NotReady);
        }

        debug!(
            endpoint = endpoint.name(),
            method = request.method.as_str(),
            path = %request.path,
            "sending request"
        );
        let result = translate(endpoint, self.transport.send(request).await);
        if let Err(failure) = &result {
            warn!(endpoint = endpoint.name(), error = ?failure, "call failed");
        }
        result
    }

    pub async fn create_session(&self, input: &CreateSession) -> CallResult<Session> {
        let request = self.client.build_create_session(input)?;
        self.call(&CREATE_SESSION, request).await
    }

    pub async fn fetch_session(&self, id: Uuid) -> CallResult<Session> {
        self.call(&FETCH_SESSION, self.client.build_fetch_session(id)).await
    }

    pub async fn list_vehicles(&self) -> CallResult<Vec<Vehicle>> {
        self.call(&LIST_VEHICLES, self.client.build_list_vehicles()).await
    }

    pub async fn remove_vehicle(&self, id: Uuid) -> CallResult<()> {
        self.call(&REMOVE_VEHICLE, self.client.build_remove_vehicle(id)).await
    }

    pub async fn list_locations(&self) -> CallResult<Vec<ChargingLocation>> {
        self.call(&LIST_LOCATIONS, self.client.build_list_locations()).await
    }

    pub async fn list_chargers(&self, location_id: Uuid) -> CallResult<Vec<Charger>> {
        self.call(&LIST_CHARGERS, self.client.build_list_chargers(location_id))
            .await
    }
}
