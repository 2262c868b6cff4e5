//! Typed remote-call pipeline for the charging API.
//!
//! # Overview
//! Endpoint descriptors say how to decode each payload and which status codes
//! an endpoint reports as domain errors. The translator turns every raw
//! outcome into a `CallResult`, and the dashboard coordinates groups of calls
//! behind one in-flight flag, one error message, and a payload cache whose
//! derived display state is pushed to subscribers on every change.
//!
//! # Design
//! - Host-does-IO: `ChargeClient` builds plain-data requests; a `Transport`
//!   supplied by the host executes them.
//! - The failure set is closed (`Failure`), and its `Display` text is the
//!   user-facing message.
//! - Single-flight admission is an atomic compare-and-set released by drop.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod publisher;
pub mod service;
pub mod translate;
pub mod types;

pub use cache::{PayloadCache, Snapshot};
pub use client::ChargeClient;
pub use config::ClientConfig;
pub use dashboard::ChargingDashboard;
pub use endpoint::{Descriptor, Endpoint, ErrorMapping};
pub use error::{CallResult, DomainError, ErrorEnvelope, Failure, RequestError};
pub use http::{
    HttpMethod, HttpRequest, HttpResponse, RawOutcome, Readiness, Transport, TransportError,
    TransportErrorKind,
};
pub use orchestrator::{CallOrchestrator, FlightPermit, SingleFlight};
pub use publisher::{ActionLabel, DisplayState, StatePublisher};
pub use service::ApiService;
pub use translate::translate;
pub use types::{
    Charger, ChargerStatus, ChargingLocation, CreateSession, Session, SessionState, Vehicle,
};
