//! Call state transition table
//!
//! [`plan_transition`] is the single source of truth for how a session moves
//! from its current state towards a requested one. It is a pure function: the
//! side effect it names is executed by [`crate::reconcile`], which also applies
//! the [`CommitPolicy`] of the action.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::CallState;

/// Side effect of a transition
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Bookkeeping only (hold/resume)
    None,
    /// Acquire and start the call resource
    StartCall,
    /// Stop and release the call resource
    StopCall,
    /// Put the device into local call hold
    EnterLocalHold,
    /// Take the device out of local call hold
    ExitLocalHold,
    /// Pair not handled in the current state
    Unhandled,
}

/// When the next state is committed relative to the action outcome
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CommitPolicy {
    /// Commit whatever the action returns
    Always,
    /// Commit only if the action succeeds
    OnSuccess,
    /// Never commit
    Never,
}

impl Action {
    pub fn commit_policy(&self) -> CommitPolicy {
        match self {
            Action::None | Action::StartCall | Action::StopCall => CommitPolicy::Always,
            Action::EnterLocalHold | Action::ExitLocalHold => CommitPolicy::OnSuccess,
            Action::Unhandled => CommitPolicy::Never,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::None => "none",
            Action::StartCall => "start-call",
            Action::StopCall => "stop-call",
            Action::EnterLocalHold => "enter-local-hold",
            Action::ExitLocalHold => "exit-local-hold",
            Action::Unhandled => "unhandled",
        };
        f.write_str(name)
    }
}

/// Planned transition for one session
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Transition {
    pub from: CallState,
    pub action: Action,
    /// State committed if the commit policy allows it
    pub next: CallState,
}

impl Transition {
    pub fn is_handled(&self) -> bool {
        self.action != Action::Unhandled
    }
}

/// Plan the transition from `current` towards `requested`
pub fn plan_transition(current: CallState, requested: CallState) -> Transition {
    use CallState::*;

    let (action, next) = match (current, requested) {
        (Inactive, Active) => (Action::StartCall, Active),
        (Hold, Active) => (Action::None, Active),
        (LocalHold, Active) => (Action::ExitLocalHold, Active),

        (Active | Hold | LocalHold, Inactive) => (Action::StopCall, Inactive),

        (Active, Hold) => (Action::None, Hold),
        (LocalHold, Hold) => (Action::ExitLocalHold, Hold),

        (Active | Hold, LocalHold) => (Action::EnterLocalHold, LocalHold),

        (Inactive, Inactive | Hold | LocalHold)
        | (Active, Active)
        | (Hold, Hold)
        | (LocalHold, LocalHold) => (Action::Unhandled, current),
    };

    Transition {
        from: current,
        action,
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallState::*;

    #[test]
    fn test_legal_transitions() {
        let table = [
            (Inactive, Active, Action::StartCall, Active),
            (Hold, Active, Action::None, Active),
            (LocalHold, Active, Action::ExitLocalHold, Active),
            (Active, Inactive, Action::StopCall, Inactive),
            (Hold, Inactive, Action::StopCall, Inactive),
            (LocalHold, Inactive, Action::StopCall, Inactive),
            (Active, Hold, Action::None, Hold),
            (LocalHold, Hold, Action::ExitLocalHold, Hold),
            (Active, LocalHold, Action::EnterLocalHold, LocalHold),
            (Hold, LocalHold, Action::EnterLocalHold, LocalHold),
        ];

        for (current, requested, action, next) in table {
            let t = plan_transition(current, requested);
            assert_eq!(t.action, action, "{} -> {}", current, requested);
            assert_eq!(t.next, next, "{} -> {}", current, requested);
            assert!(t.is_handled());
        }
    }

    #[test]
    fn test_unhandled_pairs_keep_current() {
        let unhandled = [
            (Inactive, Inactive),
            (Inactive, Hold),
            (Inactive, LocalHold),
            (Active, Active),
            (Hold, Hold),
            (LocalHold, LocalHold),
        ];
        for (current, requested) in unhandled {
            let t = plan_transition(current, requested);
            assert_eq!(t.action, Action::Unhandled);
            assert_eq!(t.next, current);
            assert_eq!(t.action.commit_policy(), CommitPolicy::Never);
        }
    }

    #[test]
    fn test_commit_policies() {
        assert_eq!(Action::StartCall.commit_policy(), CommitPolicy::Always);
        assert_eq!(Action::StopCall.commit_policy(), CommitPolicy::Always);
        assert_eq!(Action::EnterLocalHold.commit_policy(), CommitPolicy::OnSuccess);
        assert_eq!(Action::ExitLocalHold.commit_policy(), CommitPolicy::OnSuccess);
        assert_eq!(Action::None.commit_policy(), CommitPolicy::Always);
    }
}
