//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! enums with explicit discriminants. Success payloads cross as JSON text so
//! one result envelope serves every endpoint. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use charge_core::{CallResult, DomainError, Failure, HttpMethod};

/// Opaque handle to a `ChargeClient`. C callers receive a pointer to this
/// and pass it back into every build function.
pub struct FfiChargeClient {
    pub(crate) inner: charge_core::ChargeClient,
}

/// Copy `s` into a heap C string, dropping interior NULs.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Endpoint selector passed to `charge_translate`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEndpoint {
    CreateSession = 0,
    FetchSession = 1,
    ListVehicles = 2,
    RemoveVehicle = 3,
    ListLocations = 4,
    ListChargers = 5,
}

impl FfiEndpoint {
    /// Validate a raw discriminant coming from C.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(FfiEndpoint::CreateSession),
            1 => Some(FfiEndpoint::FetchSession),
            2 => Some(FfiEndpoint::ListVehicles),
            3 => Some(FfiEndpoint::RemoveVehicle),
            4 => Some(FfiEndpoint::ListLocations),
            5 => Some(FfiEndpoint::ListChargers),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `charge_build_*` functions. The C caller executes the request,
/// adding its own auth headers, and passes the outcome to `charge_translate`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: charge_core::HttpRequest) -> *mut Self {
        let path = to_c_string(&req.path);
        let body = match req.body {
            Some(b) => to_c_string(&b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack after executing a request. The FFI
/// layer reads but does not free these fields. `body` may be null when
/// `body_len` is zero.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome kind of a translated call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResultKind {
    Success = 0,
    Unauthorized = 1,
    Forbidden = 2,
    ApiError = 3,
    NetworkFailure = 4,
    InvalidResult = 5,
    NotReady = 6,
    InvalidArgument = 7,
    Panic = 8,
}

/// Result envelope for every translation.
///
/// On success `kind` is `Success`, `payload_json` holds the decoded payload
/// re-encoded as JSON, and `message` is null. On failure `message` is the
/// user-facing text, `error_code` is the backend code for `ApiError` (null
/// otherwise), and `payload_json` is null.
#[repr(C)]
pub struct FfiCallResult {
    pub kind: FfiResultKind,
    pub message: *mut c_char,
    pub error_code: *mut c_char,
    pub payload_json: *mut c_char,
}

impl FfiCallResult {
    fn boxed(kind: FfiResultKind, message: Option<&str>, code: Option<&str>, payload: Option<&str>) -> *mut Self {
        Box::into_raw(Box::new(FfiCallResult {
            kind,
            message: message.map(to_c_string).unwrap_or(std::ptr::null_mut()),
            error_code: code.map(to_c_string).unwrap_or(std::ptr::null_mut()),
            payload_json: payload.map(to_c_string).unwrap_or(std::ptr::null_mut()),
        }))
    }

    /// Build a result from a translated call whose payload is already JSON.
    pub(crate) fn from_result(result: CallResult<String>) -> *mut Self {
        let failure = match result {
            Ok(json) => return Self::boxed(FfiResultKind::Success, None, None, Some(&json)),
            Err(failure) => failure,
        };
        let message = failure.to_string();
        let (kind, code) = match &failure {
            Failure::Domain(DomainError::Unauthorized) => (FfiResultKind::Unauthorized, None),
            Failure::Domain(DomainError::Forbidden) => (FfiResultKind::Forbidden, None),
            Failure::Domain(DomainError::Api { code, .. }) => {
                (FfiResultKind::ApiError, Some(code.as_str()))
            }
            Failure::Network(_) => (FfiResultKind::NetworkFailure, None),
            Failure::InvalidResult { .. } => (FfiResultKind::InvalidResult, None),
            Failure::NotReady => (FfiResultKind::NotReady, None),
        };
        Self::boxed(kind, Some(&message), code, None)
    }

    /// Build an error result for a null or malformed argument.
    pub(crate) fn invalid_argument(name: &str) -> *mut Self {
        let msg = format!("invalid argument: {name}");
        Self::boxed(FfiResultKind::InvalidArgument, Some(&msg), None, None)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiResultKind::Panic, Some(msg), None, None)
    }
}
