//! Call state request intake
//!
//! Validates a (vsid, call state) request, stores it on the target session and
//! decides whether the registry must be reconciled right away.
//!
//! When nothing is in call yet, the request is only stored: the routing layer
//! brings the device into call mode later and triggers the bulk pass itself.
//! Once any session is bearing (or the device is already in call), routing is
//! not re-triggered for the other sessions, so reconciliation runs here.

use tracing::debug;

use crate::adapters::CallBackend;
use crate::errors::RequestError;
use crate::reconcile::{reconcile_all, ReconcileOutcome};
use crate::registry::{is_any_session_bearing, SessionRegistry};
use crate::types::{AudioMode, CallState, Vsid};
use crate::validation::validate_request;

/// Store a raw call state request and reconcile if needed
///
/// Must be called with exclusive access to the registry for the whole call.
/// Invalid requests are rejected before anything is stored. When
/// reconciliation was not needed the returned outcome is empty.
pub fn set_requested_state<B>(
    registry: &mut SessionRegistry,
    backend: &mut B,
    identifier: u32,
    requested_state: i32,
    mode: AudioMode,
) -> Result<ReconcileOutcome, RequestError>
where
    B: CallBackend + ?Sized,
{
    let (kind, state) = validate_request(identifier, requested_state)?;
    set_requested_call_state(registry, backend, kind.vsid(), state, mode)
}

/// Typed form of [`set_requested_state`]
pub fn set_requested_call_state<B>(
    registry: &mut SessionRegistry,
    backend: &mut B,
    vsid: Vsid,
    state: CallState,
    mode: AudioMode,
) -> Result<ReconcileOutcome, RequestError>
where
    B: CallBackend + ?Sized,
{
    let session = registry
        .find_by_identifier_mut(vsid)
        .ok_or(RequestError::UnknownSession(vsid.as_u32()))?;
    session.request(state);
    debug!("vsid:{} requested {}", vsid, state);

    if is_any_session_bearing(registry) || mode.is_in_call() {
        Ok(reconcile_all(registry, backend))
    } else {
        debug!("No call in progress, deferring reconciliation for vsid:{}", vsid);
        Ok(ReconcileOutcome::default())
    }
}
