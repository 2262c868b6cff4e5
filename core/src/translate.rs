//! Translation of raw outcomes into `CallResult` values.
//!
//! Order of resolution for a completed exchange:
//! 1. a transport failure is `Failure::Network`;
//! 2. a 2xx status decodes the payload, or is `InvalidResult`;
//! 3. otherwise the descriptor's own mapping is consulted;
//! 4. an unclaimed status decodes the standard error envelope, or is
//!    `InvalidResult`.
//!
//! Readiness is checked by `ApiService` before the transport runs, so a
//! `NotReady` result never reaches this module.

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::{CallResult, DomainError, ErrorEnvelope, Failure};
use crate::http::RawOutcome;

pub fn translate<E: Endpoint>(endpoint: &E, outcome: RawOutcome) -> CallResult<E::Payload> {
    let response = outcome?;
    debug!(
        endpoint = endpoint.name(),
        status = response.status,
        "translating response"
    );

    if response.is_success() {
        return endpoint
            .decode(&response.body)
            .map_err(|e| Failure::invalid(format!("{}: {e}", endpoint.name())));
    }

    if let Some(err) = endpoint.map_status(response.status, &response.body) {
        return Err(Failure::Domain(err));
    }

    match ErrorEnvelope::decode(&response.body) {
        Ok(envelope) => Err(Failure::Domain(DomainError::from(envelope))),
        Err(e) => Err(Failure::invalid(format!(
            "{}: unmapped status {} with undecodable body: {e}",
            endpoint.name(),
            response.status
        ))),
    }
}
