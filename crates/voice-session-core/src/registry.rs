//! Voice Session Registry
//!
//! Fixed table of voice call slots. One [`Session`] exists per supported
//! [`SessionKind`]; the slot order is the order in which reconciliation
//! visits sessions, so it also fixes the order of backend side effects.
//!
//! The registry does no locking of its own. Whoever owns it (normally
//! [`crate::controller::VoiceController`]) must hold an exclusive lock for
//! the whole validate, store and reconcile sequence.

use serde::{Deserialize, Serialize};

use crate::errors::LookupError;
use crate::types::{CallState, ResourceHandle, SessionKind, Usecase, Vsid, MAX_VOICE_SESSIONS};

/// Current and requested call state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCallState {
    /// State believed to be physically true
    pub current: CallState,
    /// Most recently requested target state
    pub requested: CallState,
}

impl SessionCallState {
    /// Whether `current` already matches `requested`
    pub fn is_settled(&self) -> bool {
        self.current == self.requested
    }
}

impl Default for SessionCallState {
    fn default() -> Self {
        Self {
            current: CallState::Inactive,
            requested: CallState::Inactive,
        }
    }
}

/// One hardware-bound voice call slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    kind: SessionKind,
    vsid: Vsid,
    pub(crate) state: SessionCallState,
    resource_handle: Option<ResourceHandle>,
}

impl Session {
    fn new(kind: SessionKind) -> Self {
        Self {
            kind,
            vsid: kind.vsid(),
            state: SessionCallState::default(),
            resource_handle: None,
        }
    }

    /// Kind bound to this slot
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Voice session identifier of this slot
    pub fn vsid(&self) -> Vsid {
        self.vsid
    }

    /// Audio usecase backing the call
    pub fn usecase(&self) -> Usecase {
        self.kind.usecase()
    }

    /// Current and requested state together
    pub fn state(&self) -> SessionCallState {
        self.state
    }

    /// State believed to be physically true
    pub fn current(&self) -> CallState {
        self.state.current
    }

    /// Target state awaiting reconciliation
    pub fn requested(&self) -> CallState {
        self.state.requested
    }

    /// Hardware control handle, once the binding layer has attached one
    pub fn resource_handle(&self) -> Option<ResourceHandle> {
        self.resource_handle
    }

    /// Record a requested state. `current` is left to the transition engine.
    pub(crate) fn request(&mut self, state: CallState) {
        self.state.requested = state;
    }
}

/// Fixed collection of voice sessions, one per supported identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRegistry {
    sessions: [Session; MAX_VOICE_SESSIONS],
}

impl SessionRegistry {
    /// Create a registry with every slot bound and `Inactive`
    pub fn new() -> Self {
        Self {
            sessions: SessionKind::ALL.map(Session::new),
        }
    }

    /// Rebind every slot to its identifier and reset all call state
    ///
    /// Resource handles are kept; they belong to the binding layer.
    pub fn init(&mut self) {
        for (slot, kind) in SessionKind::ALL.into_iter().enumerate() {
            let handle = self.sessions[slot].resource_handle;
            self.sessions[slot] = Session {
                resource_handle: handle,
                ..Session::new(kind)
            };
        }
        tracing::debug!("Initialized {} voice sessions", self.sessions.len());
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Sessions in slot order
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub(crate) fn sessions_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.iter_mut()
    }

    /// Session in the slot owned by `kind`
    pub fn session(&self, kind: SessionKind) -> &Session {
        &self.sessions[kind.slot()]
    }

    pub(crate) fn session_mut(&mut self, kind: SessionKind) -> &mut Session {
        &mut self.sessions[kind.slot()]
    }

    /// Session bound to `vsid`, if the identifier is known
    pub fn find_by_identifier(&self, vsid: Vsid) -> Option<&Session> {
        self.sessions.iter().find(|s| s.vsid == vsid)
    }

    pub(crate) fn find_by_identifier_mut(&mut self, vsid: Vsid) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.vsid == vsid)
    }

    /// Session backing an audio usecase
    pub fn session_for_usecase(&self, usecase: Usecase) -> &Session {
        self.session(SessionKind::from_usecase(usecase))
    }

    /// Attach the hardware control handle of a session
    pub fn bind_resource(&mut self, kind: SessionKind, handle: ResourceHandle) {
        tracing::debug!("Bound {} to vsid {}", handle, kind.vsid());
        self.session_mut(kind).resource_handle = Some(handle);
    }

    /// Detach the control handle of a session, returning it
    pub fn unbind_resource(&mut self, kind: SessionKind) -> Option<ResourceHandle> {
        self.session_mut(kind).resource_handle.take()
    }

    /// Whether every session has reached its requested state
    pub fn is_settled(&self) -> bool {
        self.sessions.iter().all(|s| s.state.is_settled())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Bind the fixed identifiers to their registry slots
pub fn init(registry: &mut SessionRegistry) {
    registry.init();
}

/// Whether any session currently occupies a call resource
pub fn is_any_session_bearing(registry: &SessionRegistry) -> bool {
    registry.sessions().any(|s| s.current().is_bearing())
}

/// Identifier of the first `Active` session in slot order
pub fn active_session_identifier(registry: &SessionRegistry) -> Option<Vsid> {
    registry
        .sessions()
        .find(|s| s.current() == CallState::Active)
        .map(Session::vsid)
}

/// Alias used by routing code
pub fn find_active_session(registry: &SessionRegistry) -> Option<Vsid> {
    active_session_identifier(registry)
}

/// Audio usecase bound to a registry slot
pub fn usecase_for_session_index(index: usize) -> Result<Usecase, LookupError> {
    SessionKind::from_slot(index).map(|kind| kind.usecase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn force_current(registry: &mut SessionRegistry, kind: SessionKind, state: CallState) {
        let session = registry.session_mut(kind);
        session.state.current = state;
        session.state.requested = state;
    }

    #[test]
    fn test_new_registry_is_idle() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.len(), MAX_VOICE_SESSIONS);
        assert!(registry.is_settled());
        assert!(!is_any_session_bearing(&registry));
        assert_eq!(active_session_identifier(&registry), None);

        let vsids: Vec<_> = registry.sessions().map(Session::vsid).collect();
        assert_eq!(vsids, vec![Vsid::VOICE, Vsid::VOICE2, Vsid::VOLTE, Vsid::QCHAT]);
    }

    #[test]
    fn test_find_by_identifier() {
        let registry = SessionRegistry::new();
        let volte = registry.find_by_identifier(Vsid::VOLTE).unwrap();
        assert_eq!(volte.kind(), SessionKind::Volte);
        assert_eq!(volte.usecase(), Usecase::VolteCall);
        assert!(registry.find_by_identifier(Vsid(0xDEAD)).is_none());
        assert!(registry.find_by_identifier(Vsid::ALL).is_none());
    }

    #[test]
    fn test_bearing_includes_hold_states() {
        let mut registry = SessionRegistry::new();
        force_current(&mut registry, SessionKind::QChat, CallState::LocalHold);
        assert!(is_any_session_bearing(&registry));
        assert_eq!(active_session_identifier(&registry), None);
    }

    #[test]
    fn test_active_lookup_prefers_lowest_slot() {
        let mut registry = SessionRegistry::new();
        force_current(&mut registry, SessionKind::Volte, CallState::Active);
        force_current(&mut registry, SessionKind::Voice2, CallState::Active);
        assert_eq!(find_active_session(&registry), Some(Vsid::VOICE2));
    }

    #[test]
    fn test_init_resets_state_but_keeps_handles() {
        let mut registry = SessionRegistry::new();
        registry.bind_resource(SessionKind::Voice, ResourceHandle(7));
        force_current(&mut registry, SessionKind::Voice, CallState::Hold);

        init(&mut registry);

        let voice = registry.session(SessionKind::Voice);
        assert_eq!(voice.state(), SessionCallState::default());
        assert_eq!(voice.resource_handle(), Some(ResourceHandle(7)));
        assert_eq!(registry.unbind_resource(SessionKind::Voice), Some(ResourceHandle(7)));
        assert_eq!(registry.session(SessionKind::Voice).resource_handle(), None);
    }

    #[test]
    fn test_usecase_lookup() {
        assert_eq!(usecase_for_session_index(0), Ok(Usecase::VoiceCall));
        assert_eq!(usecase_for_session_index(3), Ok(Usecase::QChatCall));
        assert_eq!(
            usecase_for_session_index(4),
            Err(LookupError::InvalidSessionIndex(4))
        );

        let registry = SessionRegistry::new();
        assert_eq!(registry.session_for_usecase(Usecase::Voice2Call).vsid(), Vsid::VOICE2);
    }
}
