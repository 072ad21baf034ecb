//! Per-stimulus presentation and capture state machine
//!
//! Drives one stimulus through its fixed lifecycle: baseline settle, the
//! stimulus hold, then the timed observation window during which frames are
//! captured, faces detected, and emotions classified. All transient sensor
//! failures are absorbed here; only display failures and cancellation
//! escape.

use tracing::warn;

use crate::boundaries::{CameraSource, EmotionClassifier, FaceDetector, StimulusDisplay};
use crate::error::SessionError;
use crate::frame::{extract_patch, Frame};
use crate::stimulus::Stimulus;
use crate::timing::{CancellationToken, Clock, SessionTiming};
use crate::types::{EmotionLabel, FrameObservation};

/// Lifecycle phases for one stimulus presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusPhase {
    /// Blank screen shown, settle pause running
    BaselinePending,
    /// Stimulus rendered, pre-observation hold running
    StimulusShown,
    /// Capture loop active until the wall-clock deadline
    ObservationOpen,
    /// Terminal: stimulus cleared, labels handed off
    ObservationClosed,
}

/// Sequencer for one stimulus's full presentation lifecycle.
///
/// Borrows the session's boundary objects; constructed fresh per stimulus by
/// [`SessionScorer`](crate::session::SessionScorer).
pub struct StimulusSequencer<'a> {
    camera: &'a mut dyn CameraSource,
    display: &'a mut dyn StimulusDisplay,
    detector: &'a mut dyn FaceDetector,
    classifier: &'a dyn EmotionClassifier,
    clock: &'a dyn Clock,
    timing: SessionTiming,
    cancel: &'a CancellationToken,
}

impl<'a> StimulusSequencer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera: &'a mut dyn CameraSource,
        display: &'a mut dyn StimulusDisplay,
        detector: &'a mut dyn FaceDetector,
        classifier: &'a dyn EmotionClassifier,
        clock: &'a dyn Clock,
        timing: SessionTiming,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            camera,
            display,
            detector,
            classifier,
            clock,
            timing,
            cancel,
        }
    }

    /// Run the full state machine for one stimulus.
    ///
    /// Returns the raw label sequence collected during the observation
    /// window. `face_counter` is the session-wide detection count and is
    /// incremented once per detected face.
    pub fn run(
        &mut self,
        stimulus: &Stimulus,
        face_counter: &mut u64,
    ) -> Result<Vec<EmotionLabel>, SessionError> {
        let mut labels = Vec::new();
        let mut phase = StimulusPhase::BaselinePending;

        loop {
            phase = match phase {
                StimulusPhase::BaselinePending => {
                    if self.cancel.is_cancelled() {
                        return Err(SessionError::Cancelled);
                    }
                    self.display.show_blank()?;
                    self.clock.sleep(self.timing.baseline_settle);
                    StimulusPhase::StimulusShown
                }
                StimulusPhase::StimulusShown => {
                    self.display.show(&stimulus.name, &stimulus.image)?;
                    self.clock.sleep(self.timing.pre_observation);
                    StimulusPhase::ObservationOpen
                }
                StimulusPhase::ObservationOpen => {
                    self.observe(&mut labels, face_counter)?;
                    StimulusPhase::ObservationClosed
                }
                StimulusPhase::ObservationClosed => {
                    self.display.clear()?;
                    return Ok(labels);
                }
            };
        }
    }

    /// Capture loop bounded by a monotonic wall-clock deadline.
    ///
    /// Each iteration: capture, detect, classify every face, append. Frame
    /// drops and per-face model failures skip forward without aborting.
    fn observe(
        &mut self,
        labels: &mut Vec<EmotionLabel>,
        face_counter: &mut u64,
    ) -> Result<(), SessionError> {
        let deadline = self.clock.now() + self.timing.observation_window;

        while self.clock.now() < deadline {
            if self.cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }

            // Frame drops are expected; skip the iteration silently
            let Some(frame) = self.camera.capture() else {
                continue;
            };

            let observation = self.process_frame(&frame);
            *face_counter += observation.faces_in_frame as u64;
            labels.extend(observation.labels);
        }

        Ok(())
    }

    /// Detect and classify every face in one frame.
    ///
    /// Detection and classification are 1:1 for counting purposes: the face
    /// count reflects detections even when classification of a face fails.
    fn process_frame(&mut self, frame: &Frame) -> FrameObservation {
        let boxes = match self.detector.detect(frame) {
            Ok(boxes) => boxes,
            Err(error) => {
                warn!(%error, "face detector failed on frame, skipping");
                return FrameObservation {
                    faces_in_frame: 0,
                    labels: Vec::new(),
                };
            }
        };

        let faces_in_frame = boxes.len();
        let mut labels = Vec::with_capacity(faces_in_frame);

        for bbox in boxes {
            let patch = match extract_patch(frame, bbox) {
                Ok(patch) => patch,
                Err(error) => {
                    warn!(%error, "failed to prepare face patch, skipping face");
                    continue;
                }
            };
            match self.classifier.classify(&patch) {
                Ok(label) => labels.push(label),
                Err(error) => {
                    warn!(%error, "emotion classifier failed, skipping face");
                }
            }
        }

        FrameObservation {
            faces_in_frame,
            labels,
        }
    }
}
