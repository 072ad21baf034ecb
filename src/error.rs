//! Error types for the affectscreen session engine

use thiserror::Error;

/// Fatal conditions that abort a screening session.
///
/// Transient conditions (dropped camera frames, frames with no face, a
/// classifier failing on one face) are absorbed inside the sequencer and
/// never appear here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing stimulus asset: {0}")]
    MissingStimulus(String),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Display failure: {0}")]
    Display(String),

    #[error("Invalid stimulus set: {0}")]
    InvalidStimulusSet(String),

    #[error("Invalid frame data: {0}")]
    InvalidFrame(String),

    #[error("Session cancelled")]
    Cancelled,

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
