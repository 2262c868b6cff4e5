//! C-ABI wrapper around `charge-core`.
//!
//! # Overview
//! Exposes request building and outcome translation through `extern "C"`
//! functions so a host in any language with a C FFI can run the transport
//! itself and still get the core's closed result taxonomy and user-facing
//! messages.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `charge_build_*` mirrors the core request builders 1:1.
//! - `charge_translate` / `charge_translate_transport_error` return a single
//!   `FfiCallResult` envelope for every endpoint; payloads travel as JSON.
//! - The C caller owns all returned pointers and must call the matching
//!   `charge_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use charge_core::endpoint::{
    CREATE_SESSION, FETCH_SESSION, LIST_CHARGERS, LIST_LOCATIONS, LIST_VEHICLES, REMOVE_VEHICLE,
};
use charge_core::{
    translate, CreateSession, Endpoint, Failure, HttpResponse, RawOutcome, TransportError,
    TransportErrorKind,
};
use serde_json::to_string as to_json;
use uuid::Uuid;

use types::*;

/// Read a UUID from a C string; `None` if null, not UTF-8, or malformed.
fn read_uuid(raw: *const c_char) -> Option<Uuid> {
    if raw.is_null() {
        return None;
    }
    let s = unsafe { CStr::from_ptr(raw) }.to_str().ok()?;
    Uuid::parse_str(s).ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `ChargeClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `charge_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn charge_client_new(base_url: *const c_char) -> *mut FfiChargeClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { CStr::from_ptr(base_url) }.to_str().unwrap_or("");
        let client = charge_core::ChargeClient::new(url);
        Box::into_raw(Box::new(FfiChargeClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `charge_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn charge_client_free(client: *mut FfiChargeClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a request listing the user's vehicles. Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn charge_build_list_vehicles(client: *const FfiChargeClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_vehicles())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request unlinking vehicle `id`.
///
/// Returns null if `client` or `id` is null, or if `id` is not a valid UUID.
#[unsafe(no_mangle)]
pub extern "C" fn charge_build_remove_vehicle(
    client: *const FfiChargeClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match read_uuid(id) {
            Some(id) => FfiHttpRequest::from_core(client.inner.build_remove_vehicle(id)),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request listing charging locations. Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn charge_build_list_locations(client: *const FfiChargeClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_locations())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request listing the chargers at `location_id`.
///
/// Returns null if an argument is null or `location_id` is not a valid UUID.
#[unsafe(no_mangle)]
pub extern "C" fn charge_build_list_chargers(
    client: *const FfiChargeClient,
    location_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match read_uuid(location_id) {
            Some(id) => FfiHttpRequest::from_core(client.inner.build_list_chargers(id)),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request starting a session for `vehicle_id` at `location_id`.
///
/// Returns null if an argument is null or not a valid UUID, or if
/// serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn charge_build_create_session(
    client: *const FfiChargeClient,
    vehicle_id: *const c_char,
    location_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(vehicle_id), Some(location_id)) = (read_uuid(vehicle_id), read_uuid(location_id))
        else {
            return std::ptr::null_mut();
        };
        let input = CreateSession {
            vehicle_id,
            location_id,
        };
        match client.inner.build_create_session(&input) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request reading session `id`.
///
/// Returns null if an argument is null or `id` is not a valid UUID.
#[unsafe(no_mangle)]
pub extern "C" fn charge_build_fetch_session(
    client: *const FfiChargeClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match read_uuid(id) {
            Some(id) => FfiHttpRequest::from_core(client.inner.build_fetch_session(id)),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Translate functions
// ---------------------------------------------------------------------------

fn translate_to_json<E>(endpoint: &E, outcome: RawOutcome) -> *mut FfiCallResult
where
    E: Endpoint,
    E::Payload: serde::Serialize,
{
    let result = translate(endpoint, outcome).and_then(|payload| {
        to_json(&payload).map_err(|e| Failure::InvalidResult {
            reason: e.to_string(),
        })
    });
    FfiCallResult::from_result(result)
}

fn dispatch(endpoint: FfiEndpoint, outcome: RawOutcome) -> *mut FfiCallResult {
    match endpoint {
        FfiEndpoint::CreateSession => translate_to_json(&CREATE_SESSION, outcome),
        FfiEndpoint::FetchSession => translate_to_json(&FETCH_SESSION, outcome),
        FfiEndpoint::ListVehicles => translate_to_json(&LIST_VEHICLES, outcome),
        FfiEndpoint::RemoveVehicle => translate_to_json(&REMOVE_VEHICLE, outcome),
        FfiEndpoint::ListLocations => translate_to_json(&LIST_LOCATIONS, outcome),
        FfiEndpoint::ListChargers => translate_to_json(&LIST_CHARGERS, outcome),
    }
}

/// Translate a completed HTTP exchange for `endpoint` (an `FfiEndpoint`
/// discriminant).
#[unsafe(no_mangle)]
pub extern "C" fn charge_translate(
    endpoint: u32,
    response: *const FfiHttpResponse,
) -> *mut FfiCallResult {
    catch_unwind(|| {
        let Some(endpoint) = FfiEndpoint::from_raw(endpoint) else {
            return FfiCallResult::invalid_argument("endpoint");
        };
        if response.is_null() {
            return FfiCallResult::invalid_argument("response");
        }
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() || resp.body_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
        };
        dispatch(endpoint, Ok(HttpResponse::new(resp.status, body)))
    })
    .unwrap_or_else(|_| FfiCallResult::panic("panic in charge_translate"))
}

/// Report that the host transport could not complete the exchange.
/// `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn charge_translate_transport_error(
    endpoint: u32,
    message: *const c_char,
) -> *mut FfiCallResult {
    catch_unwind(|| {
        let Some(endpoint) = FfiEndpoint::from_raw(endpoint) else {
            return FfiCallResult::invalid_argument("endpoint");
        };
        let message = if message.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned()
        };
        let err = TransportError::new(TransportErrorKind::Other, message);
        dispatch(endpoint, Err(err))
    })
    .unwrap_or_else(|_| FfiCallResult::panic("panic in charge_translate_transport_error"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `charge_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn charge_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiCallResult` returned by any `charge_translate*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn charge_free_result(result: *mut FfiCallResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.message);
        free_c_string(result.error_code);
        free_c_string(result.payload_json);
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
