use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const VEHICLE_ID: Uuid = Uuid::from_u128(0xa1);
pub const HARBOUR_ID: Uuid = Uuid::from_u128(0xb1);
pub const STATION_ID: Uuid = Uuid::from_u128(0xb2);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub battery_percent: Option<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChargingLocation {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Charger {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub location_id: Uuid,
    pub state: String,
}

#[derive(Deserialize)]
pub struct CreateSession {
    pub vehicle_id: Uuid,
    pub location_id: Uuid,
}

/// The standard error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub vehicles: Vec<Vehicle>,
    pub locations: Vec<ChargingLocation>,
    pub chargers: Vec<Charger>,
    pub sessions: HashMap<Uuid, Session>,
}

impl Store {
    /// One vehicle and two locations; only the first location has chargers.
    pub fn seeded() -> Self {
        let charger = |n: u128, status: &str| Charger {
            id: Uuid::from_u128(0xd0 + n),
            location_id: HARBOUR_ID,
            name: format!("CP-{n}"),
            status: status.to_string(),
        };
        Self {
            vehicles: vec![Vehicle {
                id: VEHICLE_ID,
                make: "Volvo".to_string(),
                model: "EX30".to_string(),
                battery_percent: Some(42),
            }],
            locations: vec![
                ChargingLocation {
                    id: HARBOUR_ID,
                    name: "Harbour Car Park".to_string(),
                    address: "1 Quay St".to_string(),
                },
                ChargingLocation {
                    id: STATION_ID,
                    name: "Central Station".to_string(),
                    address: "2 Rail Rd".to_string(),
                },
            ],
            chargers: vec![charger(1, "available"), charger(2, "occupied")],
            sessions: HashMap::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub api_key: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, code: &str, title: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            title: title.to_string(),
            detail: None,
        }),
    )
}

pub fn app() -> Router {
    app_with(Store::seeded(), None)
}

/// Router over `store`. With an `api_key`, every request must carry
/// `authorization: Bearer <key>`.
pub fn app_with(store: Store, api_key: Option<String>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(store)),
        api_key,
    };
    Router::new()
        .route("/vehicles", get(list_vehicles))
        .route("/vehicles/{id}", delete(delete_vehicle))
        .route("/locations", get(list_locations))
        .route("/locations/{id}/chargers", get(list_chargers))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(key) = &state.api_key {
        let expected = format!("Bearer {key}");
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return api_error(StatusCode::UNAUTHORIZED, "unauthorized", "Missing or invalid API key")
                .into_response();
        }
    }
    next.run(request).await
}

async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<Vehicle>> {
    Json(state.db.read().await.vehicles.clone())
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.db.write().await;
    let before = store.vehicles.len();
    store.vehicles.retain(|v| v.id != id);
    if store.vehicles.len() == before {
        return Err(api_error(StatusCode::NOT_FOUND, "vehicle_not_found", "Vehicle not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_locations(State(state): State<AppState>) -> Json<Vec<ChargingLocation>> {
    Json(state.db.read().await.locations.clone())
}

async fn list_chargers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Charger>>, ApiError> {
    let store = state.db.read().await;
    if !store.locations.iter().any(|l| l.id == id) {
        return Err(api_error(StatusCode::NOT_FOUND, "location_not_found", "Location not found"));
    }
    let chargers = store
        .chargers
        .iter()
        .filter(|c| c.location_id == id)
        .cloned()
        .collect();
    Ok(Json(chargers))
}

async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<CreateSession>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let mut store = state.db.write().await;
    if !store.vehicles.iter().any(|v| v.id == input.vehicle_id) {
        return Err(api_error(StatusCode::NOT_FOUND, "vehicle_not_found", "Vehicle not found"));
    }
    if !store.locations.iter().any(|l| l.id == input.location_id) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "invalid_location",
            "Unknown charging location",
        ));
    }
    let session = Session {
        id: Uuid::new_v4(),
        vehicle_id: input.vehicle_id,
        location_id: input.location_id,
        state: "pending".to_string(),
    };
    store.sessions.insert(session.id, session.clone());
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    let store = state.db.read().await;
    store
        .sessions
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "not_found", "Session not found"))
}
