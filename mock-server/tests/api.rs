use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{
    app, app_with, Charger, ErrorBody, Session, Store, Vehicle, HARBOUR_ID, STATION_ID, VEHICLE_ID,
};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn session_input(vehicle: uuid::Uuid, location: uuid::Uuid) -> String {
    format!(r#"{{"vehicle_id":"{vehicle}","location_id":"{location}"}}"#)
}

// --- vehicles ---

#[tokio::test]
async fn list_vehicles_returns_seed() {
    let resp = app().oneshot(get("/vehicles")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let vehicles: Vec<Vehicle> = body_json(resp).await;
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].id, VEHICLE_ID);
}

#[tokio::test]
async fn delete_unknown_vehicle_returns_envelope() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/vehicles/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, "vehicle_not_found");
}

// --- locations & chargers ---

#[tokio::test]
async fn chargers_are_scoped_to_location() {
    let resp = app()
        .oneshot(get(&format!("/locations/{HARBOUR_ID}/chargers")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let chargers: Vec<Charger> = body_json(resp).await;
    assert_eq!(chargers.len(), 2);

    let resp = app()
        .oneshot(get(&format!("/locations/{STATION_ID}/chargers")))
        .await
        .unwrap();
    let chargers: Vec<Charger> = body_json(resp).await;
    assert!(chargers.is_empty());
}

#[tokio::test]
async fn chargers_of_unknown_location_is_404() {
    let resp = app()
        .oneshot(get("/locations/00000000-0000-0000-0000-000000000000/chargers"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_uuid_returns_400() {
    let resp = app()
        .oneshot(get("/locations/not-a-uuid/chargers"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- sessions ---

#[tokio::test]
async fn create_session_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/sessions",
            &session_input(VEHICLE_ID, HARBOUR_ID),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let session: Session = body_json(resp).await;
    assert_eq!(session.state, "pending");
    assert_eq!(session.location_id, HARBOUR_ID);
}

#[tokio::test]
async fn create_session_unknown_location_is_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/sessions",
            &session_input(VEHICLE_ID, uuid::Uuid::nil()),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, "invalid_location");
}

#[tokio::test]
async fn get_unknown_session_is_404_envelope() {
    let resp = app()
        .oneshot(get("/sessions/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, "not_found");
    assert_eq!(body.title, "Session not found");
}

// --- auth ---

#[tokio::test]
async fn api_key_is_enforced_when_configured() {
    let router = app_with(Store::seeded(), Some("secret".to_string()));

    let resp = router.clone().oneshot(get("/vehicles")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, "unauthorized");

    let resp = router
        .oneshot(
            Request::builder()
                .uri("/vehicles")
                .header(http::header::AUTHORIZATION, "Bearer secret")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full lifecycle ---

#[tokio::test]
async fn session_and_vehicle_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // start a session
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/sessions",
            &session_input(VEHICLE_ID, HARBOUR_ID),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Session = body_json(resp).await;

    // read it back
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/sessions/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Session = body_json(resp).await;
    assert_eq!(fetched.id, created.id);

    // remove the vehicle
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/vehicles/{VEHICLE_ID}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // vehicle list is now empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/vehicles"))
        .await
        .unwrap();
    let vehicles: Vec<Vehicle> = body_json(resp).await;
    assert!(vehicles.is_empty());

    // a new session for the removed vehicle is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/sessions",
            &session_input(VEHICLE_ID, HARBOUR_ID),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
