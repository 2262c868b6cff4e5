//! Single-flight coordination of call groups behind one loading flag and one
//! error message.
//!
//! # Design
//! Admission is a compare-and-set on an `AtomicBool`. The winner holds a
//! `FlightPermit` whose `Drop` clears the flag, so completion, failure, panic
//! unwinding, and cancellation (dropping the trigger future) all release it.
//! A rejected trigger drops its operation future unpolled: none of its calls
//! are issued and none of its side effects occur.
//!
//! The error message is last-writer-wins across concurrently resolving
//! branches: a success clears it, a failure sets it, in completion order.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::CallResult;

#[derive(Debug)]
pub struct SingleFlight {
    busy: AtomicBool,
    signal: watch::Sender<bool>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            signal: watch::Sender::new(false),
        }
    }

    /// Claim the flight, or `None` if one is already running.
    pub fn try_enter(&self) -> Option<FlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.signal.send_replace(true);
        Some(FlightPermit { flight: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of admission. Dropping it ends the flight.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flight.signal.send_replace(false);
        self.flight.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct CallOrchestrator {
    flight: SingleFlight,
    error: watch::Sender<Option<String>>,
}

impl CallOrchestrator {
    pub fn new() -> Self {
        Self {
            flight: SingleFlight::new(),
            error: watch::Sender::new(None),
        }
    }

    /// Run `operation` unless another one is in flight. Returns whether it ran.
    pub async fn trigger<F>(&self, operation: F) -> bool
    where
        F: Future<Output = ()>,
    {
        let Some(_permit) = self.flight.try_enter() else {
            info!("operation dropped, another one is in flight");
            return false;
        };
        operation.await;
        true
    }

    /// Publish the outcome of one branch to the shared error state.
    pub fn report<T>(&self, result: &CallResult<T>) {
        match result {
            Ok(_) => {
                self.error.send_replace(None);
            }
            Err(failure) => {
                debug!(error = %failure, "surfacing failure");
                self.error.send_replace(Some(failure.to_string()));
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.flight.is_busy()
    }

    pub fn subscribe_in_flight(&self) -> watch::Receiver<bool> {
        self.flight.subscribe()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}

impl Default for CallOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
