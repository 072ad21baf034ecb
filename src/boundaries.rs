//! Boundary traits for injected collaborators
//!
//! The session engine never owns a real camera, display surface, or model.
//! Those live behind the traits below and are constructed once by the
//! composition root, then injected into `SessionScorer` - loading never
//! happens inside the scoring logic.

use crate::error::SessionError;
use crate::frame::{FacePatch, Frame};
use crate::types::{BoundingBox, EmotionLabel};

/// Minimum detectable face edge length in pixels.
///
/// Detector implementations must not return boxes smaller than this.
pub const MIN_FACE_SIZE: u32 = 30;

/// Live camera source.
///
/// Frame drops are expected under load; `capture` returns `None` for a
/// failed read and the observation loop silently skips that iteration.
pub trait CameraSource {
    /// Capture one color frame, or `None` if the read failed
    fn capture(&mut self) -> Option<Frame>;

    /// Release the device handle. Called exactly once, at session end or on
    /// the first fatal error.
    fn release(&mut self);
}

/// Full-screen stimulus display surface.
///
/// Acquired for the whole session, reused across stimuli, closed exactly
/// once at session end. Display failures are fatal: a session where the
/// child never saw the stimulus carries no usable signal.
pub trait StimulusDisplay {
    /// Show the uniform baseline/blank screen
    fn show_blank(&mut self) -> Result<(), SessionError>;

    /// Render a stimulus image
    fn show(&mut self, stimulus_name: &str, image: &Frame) -> Result<(), SessionError>;

    /// Remove the current stimulus from the screen
    fn clear(&mut self) -> Result<(), SessionError>;

    /// Destroy the surface. Called exactly once.
    fn close(&mut self);
}

/// Face detection model boundary.
///
/// An empty result is the common case to handle, not an error. Detector
/// errors on a single frame are absorbed by the sequencer (skip frame,
/// continue window).
pub trait FaceDetector {
    /// Detect faces in a color frame; grayscale conversion is the
    /// implementation's concern. Returned boxes have nonzero area and honor
    /// [`MIN_FACE_SIZE`]. No ordering guarantee.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, String>;
}

/// Emotion classification model boundary.
///
/// Consumes a prepared 48x48 normalized patch and returns the argmax label
/// over the model's output distribution. Side-effect-free. A failure applies
/// to one face only; the sequencer skips that face and continues the frame.
pub trait EmotionClassifier {
    fn classify(&self, patch: &FacePatch) -> Result<EmotionLabel, String>;
}

/// Stimulus asset source.
///
/// A missing asset is a fatal startup error: the session must fail before
/// any stimulus is shown.
pub trait StimulusSource {
    fn load(&self, name: &str) -> Result<Frame, SessionError>;
}
