//! Core types for the affectscreen session engine
//!
//! This module defines the vocabulary and result artifacts that flow through
//! a screening session: emotion labels, per-frame observations, per-stimulus
//! results, and the final session result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emotion vocabulary in the fixed FER+ ordering.
///
/// The ordering matters: classifier output distributions are mapped to labels
/// by index, so `from_index`/`from_scores` rely on this exact sequence.
/// `Neutral` is the distinguished baseline label consumed by the aggregation
/// heuristic; it is never a presented stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Neutral,
    Happy,
    Surprise,
    Sad,
    Angry,
    Disgust,
    Fear,
    Contempt,
}

/// Number of labels in the emotion vocabulary
pub const LABEL_COUNT: usize = 8;

/// All labels in vocabulary order (matches classifier output index order)
pub const LABELS: [EmotionLabel; LABEL_COUNT] = [
    EmotionLabel::Neutral,
    EmotionLabel::Happy,
    EmotionLabel::Surprise,
    EmotionLabel::Sad,
    EmotionLabel::Angry,
    EmotionLabel::Disgust,
    EmotionLabel::Fear,
    EmotionLabel::Contempt,
];

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Contempt => "contempt",
        }
    }

    /// Label at a given vocabulary index
    pub fn from_index(index: usize) -> Option<EmotionLabel> {
        LABELS.get(index).copied()
    }

    /// Argmax over a classifier output distribution, mapped through the
    /// vocabulary ordering. Returns `None` for empty or all-NaN input.
    pub fn from_scores(scores: &[f32]) -> Option<EmotionLabel> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &s) in scores.iter().enumerate().take(LABEL_COUNT) {
            if s.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((i, s)),
            }
        }
        best.and_then(|(i, _)| EmotionLabel::from_index(i))
    }
}

/// Axis-aligned face bounding box in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Per-frame record produced during an observation window.
///
/// Ephemeral: consumed immediately by the sequencer, never retained beyond
/// the window.
#[derive(Debug, Clone)]
pub struct FrameObservation {
    /// Number of faces detected in this frame
    pub faces_in_frame: usize,
    /// One label per classified face
    pub labels: Vec<EmotionLabel>,
}

/// Outcome for a single stimulus, immutable once created at the end of its
/// observation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusResult {
    /// Name of the presented stimulus
    pub stimulus_name: String,
    /// Fraction of collected labels classified Neutral; 1.0 when no label
    /// was collected (conservative maximal-neutrality default)
    pub neutral_ratio: f64,
    /// Bounded per-stimulus score in {0, 1, 2}
    pub score: u8,
}

/// Final session outcome.
///
/// `NoFaceDetected` signals missing data, not a measured result, and must
/// stay distinguishable downstream from a genuine score of 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Scored { final_score: u8 },
    NoFaceDetected,
}

/// Complete session result - the sole externally consumed artifact.
///
/// Feeds the two-modality fusion rule in the result layer (see `risk`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// Unique identifier for this session run
    pub session_id: Uuid,
    /// Engine version for provenance
    pub engine_version: String,
    /// Session start time (UTC)
    pub started_at: DateTime<Utc>,
    /// Session completion time (UTC)
    pub completed_at: DateTime<Utc>,
    /// Count of individual face detections across all frames and stimuli.
    /// Monotonic within a session; not a count of unique children.
    pub total_faces_detected: u64,
    /// Per-stimulus results in presentation order
    pub stimuli: Vec<StimulusResult>,
    /// Final outcome
    pub outcome: SessionOutcome,
}
