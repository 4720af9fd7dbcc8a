//! In-memory call backend
//!
//! Records every backend call in order and fails on demand. Useful for tests
//! and for dry runs of reconciliation without audio hardware.

use std::collections::HashSet;

use super::backend::CallBackend;
use crate::errors::{HardwareError, ResourceError};
use crate::types::{LocalHoldMode, ResourceHandle, Usecase, Vsid};

/// A backend call observed by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    StartCall { vsid: Vsid, usecase: Usecase },
    StopCall { vsid: Vsid, usecase: Usecase },
    LocalHold { handle: ResourceHandle, mode: LocalHoldMode },
}

/// Backend that records calls instead of driving hardware
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    failing_starts: HashSet<Usecase>,
    failing_stops: HashSet<Usecase>,
    failing_handles: HashSet<ResourceHandle>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `start_call` fail for a usecase
    pub fn fail_start(&mut self, usecase: Usecase) -> &mut Self {
        self.failing_starts.insert(usecase);
        self
    }

    /// Make `stop_call` fail for a usecase
    pub fn fail_stop(&mut self, usecase: Usecase) -> &mut Self {
        self.failing_stops.insert(usecase);
        self
    }

    /// Make local hold control fail on a handle
    pub fn fail_local_hold(&mut self, handle: ResourceHandle) -> &mut Self {
        self.failing_handles.insert(handle);
        self
    }

    /// Stop injecting failures
    pub fn heal(&mut self) -> &mut Self {
        self.failing_starts.clear();
        self.failing_stops.clear();
        self.failing_handles.clear();
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }
}

impl CallBackend for RecordingBackend {
    fn start_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError> {
        self.calls.push(BackendCall::StartCall { vsid, usecase });
        if self.failing_starts.contains(&usecase) {
            return Err(ResourceError::StartFailed {
                reason: format!("{} start rejected", usecase),
            });
        }
        Ok(())
    }

    fn stop_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError> {
        self.calls.push(BackendCall::StopCall { vsid, usecase });
        if self.failing_stops.contains(&usecase) {
            return Err(ResourceError::StopFailed {
                reason: format!("{} stop rejected", usecase),
            });
        }
        Ok(())
    }

    fn set_local_hold(
        &mut self,
        handle: ResourceHandle,
        mode: LocalHoldMode,
    ) -> Result<(), HardwareError> {
        self.calls.push(BackendCall::LocalHold { handle, mode });
        if self.failing_handles.contains(&handle) {
            return Err(HardwareError::ControlFailed {
                code: -5,
                reason: format!("local hold {:?} rejected on {}", mode, handle),
            });
        }
        Ok(())
    }
}
