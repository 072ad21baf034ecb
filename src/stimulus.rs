//! Stimulus assets and the presented sequence
//!
//! A session presents a fixed ordered set of named emotional images. The
//! neutral image is deliberately absent: Neutral is the detection label the
//! aggregation heuristic keys on, not a presented stimulus, and presenting
//! it would bias the neutral ratio.

use crate::boundaries::StimulusSource;
use crate::error::SessionError;
use crate::frame::Frame;

/// Default presentation order
pub const STANDARD_SEQUENCE: [&str; 3] = ["happy", "sad", "surprise"];

/// One named stimulus image, loaded once per session
#[derive(Debug, Clone)]
pub struct Stimulus {
    pub name: String,
    pub image: Frame,
}

impl Stimulus {
    pub fn new(name: impl Into<String>, image: Frame) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

/// Ordered, non-empty stimulus set.
///
/// Order affects only the display sequence; per-stimulus scores are combined
/// order-independently.
#[derive(Debug, Clone)]
pub struct StimulusSet {
    stimuli: Vec<Stimulus>,
}

impl StimulusSet {
    pub fn new(stimuli: Vec<Stimulus>) -> Result<Self, SessionError> {
        if stimuli.is_empty() {
            return Err(SessionError::InvalidStimulusSet(
                "stimulus set is empty".to_string(),
            ));
        }
        Ok(Self { stimuli })
    }

    /// Load named assets up front, failing fast on the first missing one.
    /// Asset loading happens here, before any stimulus is shown, so a
    /// missing asset is always a startup failure.
    pub fn load(source: &dyn StimulusSource, names: &[&str]) -> Result<Self, SessionError> {
        let mut stimuli = Vec::with_capacity(names.len());
        for name in names {
            let image = source.load(name)?;
            stimuli.push(Stimulus::new(*name, image));
        }
        Self::new(stimuli)
    }

    /// Load the default happy/sad/surprise sequence
    pub fn load_standard(source: &dyn StimulusSource) -> Result<Self, SessionError> {
        Self::load(source, &STANDARD_SEQUENCE)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stimulus> {
        self.stimuli.iter()
    }

    pub fn len(&self) -> usize {
        self.stimuli.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stimuli.is_empty()
    }
}
