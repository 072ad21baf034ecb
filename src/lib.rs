//! affectscreen - emotion-response session engine for two-modality ASD
//! screening
//!
//! The engine drives a timed visual-stimulus presentation while a camera
//! watches the child's face: baseline settle, stimulus hold, then a bounded
//! observation window during which frames are captured, faces detected, and
//! per-frame emotions classified. Per-stimulus label sequences reduce to
//! bounded scores via a neutral-ratio heuristic, and per-stimulus scores
//! reduce to one session outcome, with a distinguished sentinel when no face
//! was ever detected.
//!
//! ## Modules
//!
//! - **boundaries**: injected camera/display/detector/classifier traits
//! - **sequencer**: per-stimulus presentation state machine
//! - **aggregator**: neutral-ratio scoring of one observation window
//! - **session**: full-session orchestration and score reduction
//! - **risk**: fusion of survey and emotion modalities into a risk tier

pub mod aggregator;
pub mod boundaries;
pub mod error;
pub mod frame;
pub mod risk;
pub mod sequencer;
pub mod session;
pub mod stimulus;
pub mod timing;
pub mod types;

pub use aggregator::ResponseAggregator;
pub use boundaries::{
    CameraSource, EmotionClassifier, FaceDetector, StimulusDisplay, StimulusSource, MIN_FACE_SIZE,
};
pub use error::SessionError;
pub use frame::{FacePatch, Frame, PATCH_SIZE};
pub use risk::{fuse, RiskTier, SurveyAssessment};
pub use sequencer::StimulusSequencer;
pub use session::SessionScorer;
pub use stimulus::{Stimulus, StimulusSet, STANDARD_SEQUENCE};
pub use timing::{CancellationToken, Clock, ManualClock, SessionTiming, SystemClock};
pub use types::{EmotionLabel, SessionOutcome, SessionResult, StimulusResult};

/// Engine version embedded in every session result
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for session results
pub const PRODUCER_NAME: &str = "affectscreen";
