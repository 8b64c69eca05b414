//! Engine module housing tone playback.
//!
//! This module exposes trait-based backends (`backend`) and the `EngineHandle`
//! orchestration layer (`core`).

pub mod backend;
pub mod core;

#[cfg(target_os = "android")]
pub use backend::OboeBackend;
#[cfg(not(target_os = "android"))]
pub use backend::CpalBackend;
pub use backend::{
    platform_backend, AudioBackend, DeviceInfo, StreamInfo, StubBackend, StubController,
};
pub use core::{EngineEvent, EngineHandle, StreamState};
