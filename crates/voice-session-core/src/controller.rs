//! Voice Controller
//!
//! Owns the device context (registry, backend, audio mode and history) behind
//! a single exclusive lock. Every public operation takes the lock once and
//! holds it across validation, storing the request and reconciliation, which
//! is the critical section the core functions assume their caller provides.

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::adapters::CallBackend;
use crate::config::VoiceConfig;
use crate::errors::VoiceResult;
use crate::history::{TransitionHistory, TransitionRecord};
use crate::intake::{set_requested_call_state, set_requested_state};
use crate::parameters::VoiceParameters;
use crate::reconcile::{reconcile_all, ReconcileOutcome};
use crate::registry::{active_session_identifier, is_any_session_bearing, SessionRegistry};
use crate::types::{AudioMode, CallState, ResourceHandle, SessionKind, Vsid};
use crate::validation::validate_request;

/// Result of [`VoiceController::set_parameters`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterOutcome {
    /// Parameters carry no voice session request
    NotHandled,
    /// Request stored; reconciliation outcome attached (empty if deferred)
    Applied(ReconcileOutcome),
}

/// State guarded by the controller lock
#[derive(Debug)]
pub struct DeviceContext<B> {
    registry: SessionRegistry,
    backend: B,
    mode: AudioMode,
    history: TransitionHistory,
}

impl<B: CallBackend> DeviceContext<B> {
    fn new(backend: B, history_capacity: usize) -> Self {
        let mut registry = SessionRegistry::new();
        registry.init();
        Self {
            registry,
            backend,
            mode: AudioMode::default(),
            history: TransitionHistory::new(history_capacity),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn mode(&self) -> AudioMode {
        self.mode
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Run a full reconciliation pass and record it
    pub fn reconcile(&mut self) -> ReconcileOutcome {
        let outcome = reconcile_all(&mut self.registry, &mut self.backend);
        self.history.record_all(&outcome.applied);
        outcome
    }

    fn request(&mut self, vsid: Vsid, state: CallState) -> VoiceResult<ReconcileOutcome> {
        let outcome =
            set_requested_call_state(&mut self.registry, &mut self.backend, vsid, state, self.mode)?;
        self.history.record_all(&outcome.applied);
        Ok(outcome)
    }

    fn request_raw(&mut self, vsid: u32, call_state: i32) -> VoiceResult<ReconcileOutcome> {
        let outcome =
            set_requested_state(&mut self.registry, &mut self.backend, vsid, call_state, self.mode)?;
        self.history.record_all(&outcome.applied);
        Ok(outcome)
    }
}

/// Thread-safe owner of the voice session registry
pub struct VoiceController<B> {
    config: VoiceConfig,
    context: Mutex<DeviceContext<B>>,
}

impl<B: CallBackend> VoiceController<B> {
    pub fn new(config: VoiceConfig, backend: B) -> Self {
        info!(
            "Voice controller started (enabled={}, history={})",
            config.enabled, config.history_capacity
        );
        let context = DeviceContext::new(backend, config.history_capacity);
        Self {
            config,
            context: Mutex::new(context),
        }
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Handle an audio parameter string
    ///
    /// Invalid requests are rejected before the lock is taken. Backend
    /// failures during reconciliation are reported in the outcome, not as an
    /// error, since the request itself was accepted.
    pub fn set_parameters(&self, input: &str) -> VoiceResult<ParameterOutcome> {
        if !self.config.enabled {
            debug!("Multi-session voice disabled, ignoring parameters");
            return Ok(ParameterOutcome::NotHandled);
        }

        let params = VoiceParameters::parse(input);
        let request = match params.call_state_request()? {
            Some(request) => request,
            None => {
                debug!("Not handled here: {}", params);
                return Ok(ParameterOutcome::NotHandled);
            }
        };
        validate_request(request.vsid, request.call_state)?;

        let outcome = self
            .context
            .lock()
            .request_raw(request.vsid, request.call_state)?;
        Ok(ParameterOutcome::Applied(outcome))
    }

    /// Request a call state and surface any backend failure
    pub fn set_call_state(&self, vsid: Vsid, state: CallState) -> VoiceResult<()> {
        let outcome = self.context.lock().request(vsid, state)?;
        outcome.into_result()?;
        Ok(())
    }

    /// Update the device audio mode; entering a call flushes pending requests
    pub fn set_mode(&self, mode: AudioMode) -> VoiceResult<()> {
        let mut context = self.context.lock();
        if context.mode != mode {
            debug!("Audio mode {:?} -> {:?}", context.mode, mode);
        }
        context.mode = mode;
        if mode.is_in_call() {
            context.reconcile().into_result()?;
        }
        Ok(())
    }

    /// Run a bulk reconciliation pass
    pub fn update_calls(&self) -> VoiceResult<()> {
        self.context.lock().reconcile().into_result()?;
        Ok(())
    }

    pub fn mode(&self) -> AudioMode {
        self.context.lock().mode
    }

    /// Vsid of the session that owns audio routing
    pub fn active_session_id(&self) -> Option<Vsid> {
        active_session_identifier(&self.context.lock().registry)
    }

    pub fn is_in_call(&self) -> bool {
        is_any_session_bearing(&self.context.lock().registry)
    }

    /// Copy of the registry taken under the lock
    pub fn session_snapshot(&self) -> SessionRegistry {
        self.context.lock().registry.clone()
    }

    pub fn bind_resource(&self, kind: SessionKind, handle: ResourceHandle) {
        self.context.lock().registry.bind_resource(kind, handle);
    }

    /// Recorded transitions, oldest first
    pub fn history(&self) -> Vec<TransitionRecord> {
        self.context.lock().history.records().cloned().collect()
    }

    /// Run a closure with the device context locked
    pub fn with_context<R>(&self, f: impl FnOnce(&mut DeviceContext<B>) -> R) -> R {
        let mut context = self.context.lock();
        f(&mut *context)
    }
}
