//! Adapters to the audio HAL collaborators
//!
//! The transition engine never touches hardware directly; every side effect
//! goes through a [`CallBackend`].

pub mod backend;
pub mod recording;

pub use backend::CallBackend;
pub use recording::{BackendCall, RecordingBackend};
