//! Audio engine error types

use thiserror::Error;

/// Errors that can occur during audio engine operations
///
/// A failed operation leaves the recorder in its pre-transition state;
/// no partial session mutation is committed on failure.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Microphone permission absent or revoked
    #[error("Recording permission denied")]
    PermissionDenied,

    /// Capture or playback hardware is already in use
    #[error("Audio hardware busy: {0}")]
    HardwareBusy(String),

    /// Playback requested with no recorded asset loaded
    #[error("No recording loaded")]
    NoRecording,

    /// Backend I/O failure
    #[error("Audio engine I/O error: {0}")]
    Io(String),
}

/// Result type for engine-backed recorder operations
pub type EngineResult<T> = Result<T, EngineError>;
