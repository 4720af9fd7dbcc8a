//! Reconciliation driver
//!
//! Walks the registry in slot order and settles every session whose requested
//! state differs from its current state. Side effects are executed one at a
//! time through the [`CallBackend`], so stopping one call always happens
//! before starting another call in a later slot.

use tracing::{debug, debug_span, error, trace};

use crate::adapters::CallBackend;
use crate::errors::{ActionError, HardwareError};
use crate::registry::{Session, SessionRegistry};
use crate::state_table::{plan_transition, Action, CommitPolicy, Transition};
use crate::types::{CallState, LocalHoldMode, Vsid};

/// A handled transition attempted during reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransition {
    pub vsid: Vsid,
    pub from: CallState,
    /// State after the attempt; equals `from` when a gated action failed
    pub to: CallState,
    pub action: Action,
    pub error: Option<ActionError>,
}

impl AppliedTransition {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Handled transitions in slot order
    pub applied: Vec<AppliedTransition>,
    /// Most recent action failure, if any
    pub last_failure: Option<ActionError>,
}

impl ReconcileOutcome {
    pub fn is_ok(&self) -> bool {
        self.last_failure.is_none()
    }

    /// Collapse into a single success/failure signal
    pub fn into_result(self) -> Result<(), ActionError> {
        match self.last_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Bring every session's current state in line with its requested state
///
/// Every session is visited even after a failure. Only the last failure is
/// kept in the outcome.
pub fn reconcile_all<B>(registry: &mut SessionRegistry, backend: &mut B) -> ReconcileOutcome
where
    B: CallBackend + ?Sized,
{
    let _span = debug_span!("reconcile").entered();
    let mut outcome = ReconcileOutcome::default();

    for session in registry.sessions_mut() {
        trace!(
            "cur_state={} new_state={} vsid:{}",
            session.current(),
            session.requested(),
            session.vsid()
        );
        if session.state.is_settled() {
            continue;
        }

        let transition = plan_transition(session.current(), session.requested());
        if !transition.is_handled() {
            trace!(
                "{} cannot be handled in state={} vsid:{}",
                session.requested(),
                session.current(),
                session.vsid()
            );
            continue;
        }

        let applied = settle_session(session, transition, backend);
        if let Some(err) = &applied.error {
            outcome.last_failure = Some(err.clone());
        }
        outcome.applied.push(applied);
    }

    outcome
}

fn settle_session<B>(
    session: &mut Session,
    transition: Transition,
    backend: &mut B,
) -> AppliedTransition
where
    B: CallBackend + ?Sized,
{
    let vsid = session.vsid();
    debug!(
        "{} -> {} vsid:{} action={}",
        transition.from, transition.next, vsid, transition.action
    );

    let result = execute_action(session, transition.action, backend);
    if let Err(err) = &result {
        error!("{} -> {} failed: {}", transition.from, transition.next, err);
    }

    let commit = match transition.action.commit_policy() {
        CommitPolicy::Always => true,
        CommitPolicy::OnSuccess => result.is_ok(),
        CommitPolicy::Never => false,
    };
    if commit {
        session.state.current = transition.next;
    }

    AppliedTransition {
        vsid,
        from: transition.from,
        to: session.current(),
        action: transition.action,
        error: result.err(),
    }
}

fn execute_action<B>(session: &Session, action: Action, backend: &mut B) -> Result<(), ActionError>
where
    B: CallBackend + ?Sized,
{
    let vsid = session.vsid();
    let usecase = session.usecase();

    match action {
        Action::None | Action::Unhandled => Ok(()),
        Action::StartCall => backend
            .start_call(vsid, usecase)
            .map_err(|source| ActionError::Resource { vsid, usecase, source }),
        Action::StopCall => backend
            .stop_call(vsid, usecase)
            .map_err(|source| ActionError::Resource { vsid, usecase, source }),
        Action::EnterLocalHold => set_local_hold(session, LocalHoldMode::Start, backend),
        Action::ExitLocalHold => set_local_hold(session, LocalHoldMode::Stop, backend),
    }
}

fn set_local_hold<B>(session: &Session, mode: LocalHoldMode, backend: &mut B) -> Result<(), ActionError>
where
    B: CallBackend + ?Sized,
{
    let vsid = session.vsid();
    let handle = session.resource_handle().ok_or(ActionError::Hardware {
        vsid,
        source: HardwareError::NoHandle,
    })?;
    backend
        .set_local_hold(handle, mode)
        .map_err(|source| ActionError::Hardware { vsid, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BackendCall, RecordingBackend};
    use crate::types::{ResourceHandle, SessionKind, Usecase};

    fn registry_with(kind: SessionKind, current: CallState, requested: CallState) -> SessionRegistry {
        let mut registry = SessionRegistry::new();
        registry.bind_resource(kind, ResourceHandle(kind.slot() as u64 + 1));
        let session = registry.session_mut(kind);
        session.state.current = current;
        session.state.requested = requested;
        registry
    }

    #[test]
    fn test_settled_registry_makes_no_calls() {
        let mut registry = SessionRegistry::new();
        let mut backend = RecordingBackend::new();
        let outcome = reconcile_all(&mut registry, &mut backend);
        assert!(outcome.applied.is_empty());
        assert!(outcome.is_ok());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_start_call() {
        let mut registry = registry_with(SessionKind::Voice2, CallState::Inactive, CallState::Active);
        let mut backend = RecordingBackend::new();

        let outcome = reconcile_all(&mut registry, &mut backend);

        assert!(outcome.is_ok());
        assert_eq!(registry.session(SessionKind::Voice2).current(), CallState::Active);
        assert_eq!(
            backend.calls(),
            &[BackendCall::StartCall { vsid: Vsid::VOICE2, usecase: Usecase::Voice2Call }]
        );
    }

    #[test]
    fn test_missing_handle_rolls_back() {
        let mut registry = registry_with(SessionKind::Volte, CallState::Active, CallState::LocalHold);
        registry.unbind_resource(SessionKind::Volte);
        let mut backend = RecordingBackend::new();

        let outcome = reconcile_all(&mut registry, &mut backend);

        assert_eq!(registry.session(SessionKind::Volte).current(), CallState::Active);
        assert!(backend.calls().is_empty());
        assert!(matches!(
            outcome.last_failure,
            Some(ActionError::Hardware { source: HardwareError::NoHandle, .. })
        ));
    }

    #[test]
    fn test_exit_local_hold_to_hold() {
        let mut registry = registry_with(SessionKind::QChat, CallState::LocalHold, CallState::Hold);
        let mut backend = RecordingBackend::new();

        let outcome = reconcile_all(&mut registry, &mut backend);

        assert!(outcome.is_ok());
        assert_eq!(registry.session(SessionKind::QChat).current(), CallState::Hold);
        assert_eq!(
            backend.calls(),
            &[BackendCall::LocalHold { handle: ResourceHandle(4), mode: LocalHoldMode::Stop }]
        );
    }

    #[test]
    fn test_stop_then_start_in_one_pass() {
        let expected = vec![
            BackendCall::StopCall { vsid: Vsid::VOICE, usecase: Usecase::VoiceCall },
            BackendCall::StartCall { vsid: Vsid::VOLTE, usecase: Usecase::VolteCall },
        ];

        for _ in 0..3 {
            let mut registry = registry_with(SessionKind::Voice, CallState::Active, CallState::Inactive);
            registry.session_mut(SessionKind::Volte).state.requested = CallState::Active;
            let mut backend = RecordingBackend::new();

            let outcome = reconcile_all(&mut registry, &mut backend);

            assert!(outcome.is_ok());
            assert_eq!(backend.calls().to_vec(), expected);
            assert_eq!(registry.session(SessionKind::Voice).current(), CallState::Inactive);
            assert_eq!(registry.session(SessionKind::Volte).current(), CallState::Active);
            assert_eq!(applied_vsids(&outcome), vec![Vsid::VOICE, Vsid::VOLTE]);
        }
    }

    fn applied_vsids(outcome: &ReconcileOutcome) -> Vec<Vsid> {
        outcome.applied.iter().map(|t| t.vsid).collect()
    }

    #[test]
    fn test_last_failure_wins() {
        let mut registry = registry_with(SessionKind::Voice, CallState::Inactive, CallState::Active);
        registry.session_mut(SessionKind::QChat).state.requested = CallState::Active;
        let mut backend = RecordingBackend::new();
        backend.fail_start(Usecase::VoiceCall).fail_start(Usecase::QChatCall);

        let outcome = reconcile_all(&mut registry, &mut backend);

        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.last_failure.map(|e| e.vsid()), Some(Vsid::QCHAT));
    }

    #[test]
    fn test_unhandled_pair_is_silent() {
        let mut registry = registry_with(SessionKind::Voice, CallState::Inactive, CallState::Hold);
        let mut backend = RecordingBackend::new();

        let outcome = reconcile_all(&mut registry, &mut backend);

        assert!(outcome.applied.is_empty());
        assert!(outcome.is_ok());
        assert_eq!(registry.session(SessionKind::Voice).current(), CallState::Inactive);
        assert_eq!(registry.session(SessionKind::Voice).requested(), CallState::Hold);
    }
}
