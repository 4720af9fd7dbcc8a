use crate::errors::{HardwareError, ResourceError};
use crate::types::{LocalHoldMode, ResourceHandle, Usecase, Vsid};

/// Call resource and hardware control operations consumed by reconciliation
///
/// Calls are made synchronously, one at a time, while the caller holds the
/// registry lock. Implementations may block but must not call back into the
/// registry. Failures are not retried.
pub trait CallBackend {
    /// Begin the call-bearing hardware path for a usecase
    fn start_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError>;

    /// Tear down the call-bearing hardware path for a usecase
    fn stop_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError>;

    /// Toggle local call hold on a session's control channel
    fn set_local_hold(
        &mut self,
        handle: ResourceHandle,
        mode: LocalHoldMode,
    ) -> Result<(), HardwareError>;
}

impl<B: CallBackend + ?Sized> CallBackend for &mut B {
    fn start_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError> {
        (**self).start_call(vsid, usecase)
    }

    fn stop_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError> {
        (**self).stop_call(vsid, usecase)
    }

    fn set_local_hold(
        &mut self,
        handle: ResourceHandle,
        mode: LocalHoldMode,
    ) -> Result<(), HardwareError> {
        (**self).set_local_hold(handle, mode)
    }
}

impl<B: CallBackend + ?Sized> CallBackend for Box<B> {
    fn start_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError> {
        (**self).start_call(vsid, usecase)
    }

    fn stop_call(&mut self, vsid: Vsid, usecase: Usecase) -> Result<(), ResourceError> {
        (**self).stop_call(vsid, usecase)
    }

    fn set_local_hold(
        &mut self,
        handle: ResourceHandle,
        mode: LocalHoldMode,
    ) -> Result<(), HardwareError> {
        (**self).set_local_hold(handle, mode)
    }
}
