//! # RVOIP Voice Session Core
//!
//! Coordinates several concurrent voice call sessions (primary voice,
//! secondary voice, VoLTE, QChat) that share one audio device.
//!
//! Each session keeps a `current` call state (what the hardware is doing) and
//! a `requested` one (what the telephony stack asked for). Requests are stored
//! by [`intake`] and settled by [`reconcile`], which walks the sessions in a
//! fixed order and drives the [`adapters::CallBackend`] according to the
//! transition table in [`state_table`].
//!
//! ```
//! use rvoip_voice_session_core::{
//!     AudioMode, CallState, RecordingBackend, SessionKind, VoiceConfig, VoiceController, Vsid,
//! };
//!
//! let controller = VoiceController::new(VoiceConfig::default(), RecordingBackend::new());
//! controller.set_mode(AudioMode::InCall).unwrap();
//! controller.set_call_state(Vsid::VOICE, CallState::Active).unwrap();
//!
//! assert_eq!(controller.active_session_id(), Some(Vsid::VOICE));
//! assert_eq!(
//!     controller.session_snapshot().session(SessionKind::Voice).current(),
//!     CallState::Active
//! );
//! ```
//!
//! The free functions operate on an explicitly passed [`SessionRegistry`] and
//! do no locking. [`VoiceController`] is the usual owner: it holds the
//! registry behind one mutex for the whole request.

pub mod adapters;
pub mod config;
pub mod controller;
pub mod errors;
pub mod history;
pub mod intake;
pub mod logging;
pub mod parameters;
pub mod reconcile;
pub mod registry;
pub mod state_table;
pub mod types;
pub mod validation;

pub use adapters::{BackendCall, CallBackend, RecordingBackend};
pub use config::VoiceConfig;
pub use controller::{DeviceContext, ParameterOutcome, VoiceController};
pub use errors::{
    ActionError, HardwareError, LookupError, RequestError, ResourceError, VoiceError, VoiceResult,
};
pub use history::{TransitionHistory, TransitionRecord, TransitionResult};
pub use intake::{set_requested_call_state, set_requested_state};
pub use parameters::{CallStateRequest, VoiceParameters};
pub use reconcile::{reconcile_all, AppliedTransition, ReconcileOutcome};
pub use registry::{
    active_session_identifier, find_active_session, init, is_any_session_bearing,
    usecase_for_session_index, Session, SessionCallState, SessionRegistry,
};
pub use state_table::{plan_transition, Action, CommitPolicy, Transition};
pub use types::{
    AudioMode, CallState, LocalHoldMode, ResourceHandle, SessionKind, Usecase, Vsid,
    MAX_VOICE_SESSIONS,
};
pub use validation::{is_valid_call_state, is_valid_identifier};
