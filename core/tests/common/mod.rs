//! Scripted in-memory transport shared by the async tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use charge_core::{
    ApiService, ChargeClient, ChargingDashboard, HttpMethod, HttpRequest, HttpResponse,
    RawOutcome, Transport, TransportError, TransportErrorKind,
};
use tokio::sync::Semaphore;

pub const BASE_URL: &str = "http://mock";

/// Answers each (method, path) with a scripted outcome. A gated path holds
/// its request until the test adds permits to the gate.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), RawOutcome>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Ok(HttpResponse::new(status, body)),
        );
    }

    pub fn fail(&self, method: HttpMethod, path: &str, kind: TransportErrorKind) {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Err(TransportError::new(kind, "scripted transport failure")),
        );
    }

    pub fn gate(&self, path: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), gate.clone());
        gate
    }

    pub fn sent(&self) -> Vec<(HttpMethod, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method, r.path.trim_start_matches(BASE_URL).to_string()))
            .collect()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.sent()
            .iter()
            .filter(|(m, p)| *m == method && p == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> RawOutcome {
        let path = request.path.trim_start_matches(BASE_URL).to_string();
        let method = request.method;
        self.sent.lock().unwrap().push(request);

        let gate = self.gates.lock().unwrap().get(&path).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.routes
            .lock()
            .unwrap()
            .get(&(method, path.clone()))
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::new(
                    TransportErrorKind::Other,
                    format!("unscripted {} {path}", method.as_str()),
                ))
            })
    }
}

pub fn dashboard(transport: ScriptedTransport) -> ChargingDashboard<ScriptedTransport> {
    ChargingDashboard::new(ApiService::new(ChargeClient::new(BASE_URL), transport))
}

/// Yield to spawned tasks until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub const VEHICLE_ID: &str = "00000000-0000-0000-0000-0000000000a1";
pub const LOCATION_ID: &str = "00000000-0000-0000-0000-0000000000b1";
pub const SESSION_ID: &str = "00000000-0000-0000-0000-0000000000c1";

pub fn vehicles_body() -> String {
    format!(r#"[{{"id":"{VEHICLE_ID}","make":"Volvo","model":"EX30","battery_percent":42}}]"#)
}

pub fn locations_body() -> String {
    format!(r#"[{{"id":"{LOCATION_ID}","name":"Harbour Car Park","address":"1 Quay St"}}]"#)
}

pub fn chargers_body() -> String {
    format!(
        r#"[
            {{"id":"00000000-0000-0000-0000-0000000000d1","location_id":"{LOCATION_ID}","name":"CP-1","status":"available"}},
            {{"id":"00000000-0000-0000-0000-0000000000d2","location_id":"{LOCATION_ID}","name":"CP-2","status":"occupied"}}
        ]"#
    )
}

pub fn session_body(state: &str) -> String {
    format!(
        r#"{{"id":"{SESSION_ID}","vehicle_id":"{VEHICLE_ID}","location_id":"{LOCATION_ID}","state":"{state}"}}"#
    )
}

pub fn chargers_path() -> String {
    format!("/locations/{LOCATION_ID}/chargers")
}

/// A transport answering the full refresh flow successfully.
pub fn happy_transport() -> ScriptedTransport {
    let transport = ScriptedTransport::default();
    transport.respond(HttpMethod::Get, "/vehicles", 200, &vehicles_body());
    transport.respond(HttpMethod::Get, "/locations", 200, &locations_body());
    transport.respond(HttpMethod::Get, &chargers_path(), 200, &chargers_body());
    transport
}
