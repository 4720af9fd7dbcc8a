//! Error types for voice session coordination
//!
//! Request validation, backend actions and the crate-level error are kept
//! separate so that callers can tell a rejected request (nothing changed)
//! from a failed side effect (some sessions may have transitioned).

use thiserror::Error;

use crate::types::{Usecase, Vsid};

/// Result type alias for crate-level operations
pub type VoiceResult<T> = std::result::Result<T, VoiceError>;

/// Invalid request, rejected before any session state is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No session is bound to the identifier
    #[error("Unknown voice session: {0:#x}")]
    UnknownSession(u32),

    /// Call state value outside the supported range
    #[error("Invalid call state: {0}")]
    InvalidState(i32),
}

/// Failure of the local hold control channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HardwareError {
    /// Session has no bound control channel
    #[error("No hardware control handle bound to session")]
    NoHandle,

    /// Driver rejected the control request
    #[error("Hardware control failed ({code}): {reason}")]
    ControlFailed { code: i32, reason: String },
}

/// Failure of the call resource layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Failed to start call: {reason}")]
    StartFailed { reason: String },

    #[error("Failed to stop call: {reason}")]
    StopFailed { reason: String },
}

/// Registry slot lookup failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid voice session index: {0}")]
    InvalidSessionIndex(usize),
}

/// Side effect failure observed during reconciliation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Local hold toggle failed; the session kept its previous state
    #[error("Local hold control failed for vsid {vsid}: {source}")]
    Hardware {
        vsid: Vsid,
        #[source]
        source: HardwareError,
    },

    /// Call start/stop failed; the session state was still advanced
    #[error("Call resource failure for vsid {vsid} ({usecase}): {source}")]
    Resource {
        vsid: Vsid,
        usecase: Usecase,
        #[source]
        source: ResourceError,
    },
}

impl ActionError {
    /// Session the failure belongs to
    pub fn vsid(&self) -> Vsid {
        match self {
            ActionError::Hardware { vsid, .. } => *vsid,
            ActionError::Resource { vsid, .. } => *vsid,
        }
    }
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] RequestError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Malformed parameter {key}={value}")]
    MalformedParameter { key: String, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl VoiceError {
    pub fn config(message: impl Into<String>) -> Self {
        VoiceError::Config(message.into())
    }

    pub fn malformed(key: impl Into<String>, value: impl Into<String>) -> Self {
        VoiceError::MalformedParameter {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether the request was rejected without touching any session
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            VoiceError::InvalidArgument(_)
                | VoiceError::MissingParameter(_)
                | VoiceError::MalformedParameter { .. }
        )
    }
}
