//! Input validation for call state requests

use crate::errors::RequestError;
use crate::types::{CallState, SessionKind, Vsid};

/// Whether `id` is one of the statically supported session identifiers
pub fn is_valid_identifier(id: u32) -> bool {
    match Vsid(id) {
        Vsid::VOICE | Vsid::VOICE2 | Vsid::VOLTE | Vsid::QCHAT => true,
        _ => false,
    }
}

/// Whether `raw` encodes one of the four call states
pub fn is_valid_call_state(raw: i32) -> bool {
    CallState::from_raw(raw).is_some()
}

/// Validate a raw (identifier, call state) pair
///
/// The identifier is checked first, so a request that is wrong on both
/// counts reports the unknown session.
pub fn validate_request(id: u32, raw_state: i32) -> Result<(SessionKind, CallState), RequestError> {
    if !is_valid_identifier(id) {
        return Err(RequestError::UnknownSession(id));
    }
    let kind = SessionKind::from_vsid(Vsid(id)).ok_or(RequestError::UnknownSession(id))?;
    let state = CallState::from_raw(raw_state).ok_or(RequestError::InvalidState(raw_state))?;
    Ok((kind, state))
}
