//! Session orchestration
//!
//! Runs the full stimulus sequence, accumulates the session-wide face
//! counter, reduces per-stimulus scores into the final outcome, and
//! guarantees camera/display teardown on every exit path.
//!
//! A session blocks for roughly (settle + hold + window) x stimulus count,
//! about 19.5 s with the default timing, so callers dispatch it off their
//! interaction thread and collect the result via a completion signal. That
//! dispatch is the caller's concern; the engine itself is strictly
//! sequential.

use chrono::Utc;
use uuid::Uuid;

use crate::aggregator::ResponseAggregator;
use crate::boundaries::{CameraSource, EmotionClassifier, FaceDetector, StimulusDisplay};
use crate::error::SessionError;
use crate::sequencer::StimulusSequencer;
use crate::stimulus::StimulusSet;
use crate::timing::{CancellationToken, Clock, SessionTiming, SystemClock};
use crate::types::{SessionOutcome, SessionResult, StimulusResult};
use crate::ENGINE_VERSION;

/// Top-level session runner.
///
/// All collaborators are injected at construction; model and asset loading
/// belongs to the composition root, never to the scoring logic.
pub struct SessionScorer {
    camera: Box<dyn CameraSource>,
    display: Box<dyn StimulusDisplay>,
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
    clock: Box<dyn Clock>,
    stimuli: StimulusSet,
    timing: SessionTiming,
    cancel: CancellationToken,
}

impl SessionScorer {
    pub fn new(
        camera: Box<dyn CameraSource>,
        display: Box<dyn StimulusDisplay>,
        detector: Box<dyn FaceDetector>,
        classifier: Box<dyn EmotionClassifier>,
        stimuli: StimulusSet,
    ) -> Self {
        Self {
            camera,
            display,
            detector,
            classifier,
            clock: Box::new(SystemClock::new()),
            stimuli,
            timing: SessionTiming::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the wall clock, mainly for tests
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the per-stimulus timing windows
    pub fn with_timing(mut self, timing: SessionTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Attach an externally held cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the full session to completion.
    ///
    /// Camera and display are released exactly once, whatever the exit path:
    /// success, cancellation, or a mid-session fatal error.
    pub fn run(&mut self) -> Result<SessionResult, SessionError> {
        let started_at = Utc::now();

        let collected = self.run_stimuli();

        // Unconditional teardown before inspecting the result
        self.display.close();
        self.camera.release();

        let (stimuli, total_faces_detected) = collected?;

        // The face counter, not score emptiness, is the authoritative gate:
        // a zero-face session carries no usable signal
        let outcome = if total_faces_detected == 0 {
            SessionOutcome::NoFaceDetected
        } else {
            SessionOutcome::Scored {
                final_score: final_score(&stimuli),
            }
        };

        Ok(SessionResult {
            session_id: Uuid::new_v4(),
            engine_version: ENGINE_VERSION.to_string(),
            started_at,
            completed_at: Utc::now(),
            total_faces_detected,
            stimuli,
            outcome,
        })
    }

    fn run_stimuli(&mut self) -> Result<(Vec<StimulusResult>, u64), SessionError> {
        let mut results = Vec::with_capacity(self.stimuli.len());
        let mut total_faces = 0u64;
        let cancel = self.cancel.clone();

        for stimulus in self.stimuli.iter() {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }

            let mut sequencer = StimulusSequencer::new(
                self.camera.as_mut(),
                self.display.as_mut(),
                self.detector.as_mut(),
                self.classifier.as_ref(),
                self.clock.as_ref(),
                self.timing,
                &cancel,
            );
            let labels = sequencer.run(stimulus, &mut total_faces)?;

            results.push(ResponseAggregator::score(&stimulus.name, &labels));
        }

        Ok((results, total_faces))
    }
}

/// Reduce per-stimulus scores to the final session score.
///
/// Arithmetic mean rounded half away from zero (`f64::round`; scores are
/// non-negative, so this is round-half-up: a mean of 1.5 rounds to 2).
/// All stimuli are equally weighted.
pub fn final_score(results: &[StimulusResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    let sum: u32 = results.iter().map(|r| r.score as u32).sum();
    let mean = sum as f64 / results.len() as f64;
    mean.round() as u8
}
