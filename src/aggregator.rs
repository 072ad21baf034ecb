//! Per-stimulus response aggregation
//!
//! Converts the raw emotion-label sequence collected during one stimulus's
//! observation window into a bounded score via the neutral-ratio heuristic.
//! A high neutral ratio means a blunted affective response to the stimulus.

use crate::types::{EmotionLabel, StimulusResult};

/// Below this ratio the response counts as strongly affective (score 0)
pub const LOW_NEUTRALITY_THRESHOLD: f64 = 0.4;

/// At or above this ratio the response counts as blunted (score 2)
pub const HIGH_NEUTRALITY_THRESHOLD: f64 = 0.7;

/// Aggregator for converting label sequences into per-stimulus scores
pub struct ResponseAggregator;

impl ResponseAggregator {
    /// Fraction of labels classified Neutral.
    ///
    /// An empty sequence yields 1.0: when no emotional signal was captured
    /// for a stimulus the conservative assumption is maximal neutrality,
    /// not an error.
    pub fn neutral_ratio(labels: &[EmotionLabel]) -> f64 {
        if labels.is_empty() {
            return 1.0;
        }
        let neutral = labels
            .iter()
            .filter(|&&l| l == EmotionLabel::Neutral)
            .count();
        neutral as f64 / labels.len() as f64
    }

    /// Map a neutral ratio to a score in {0, 1, 2}.
    ///
    /// Strictly monotonic non-decreasing step function: higher neutrality
    /// never lowers the score. No hysteresis, no smoothing across stimuli.
    pub fn score_ratio(neutral_ratio: f64) -> u8 {
        if neutral_ratio < LOW_NEUTRALITY_THRESHOLD {
            0
        } else if neutral_ratio < HIGH_NEUTRALITY_THRESHOLD {
            1
        } else {
            2
        }
    }

    /// Score one stimulus's label sequence into an immutable result
    pub fn score(stimulus_name: &str, labels: &[EmotionLabel]) -> StimulusResult {
        let neutral_ratio = Self::neutral_ratio(labels);
        StimulusResult {
            stimulus_name: stimulus_name.to_string(),
            neutral_ratio,
            score: Self::score_ratio(neutral_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionLabel::{Happy, Neutral};

    #[test]
    fn test_empty_sequence_defaults_to_high_neutrality() {
        assert_eq!(ResponseAggregator::neutral_ratio(&[]), 1.0);
        let result = ResponseAggregator::score("happy", &[]);
        assert_eq!(result.score, 2);
        assert_eq!(result.neutral_ratio, 1.0);
    }

    #[test]
    fn test_all_affective_scores_zero() {
        let labels = [Happy, Happy, Happy];
        let result = ResponseAggregator::score("happy", &labels);
        assert_eq!(result.neutral_ratio, 0.0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_moderate_neutrality() {
        // 2/3 = 0.667, inside [0.4, 0.7)
        let labels = [Neutral, Neutral, Happy];
        let result = ResponseAggregator::score("sad", &labels);
        assert!((result.neutral_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_upper_boundary_inclusive() {
        // 7/10 = 0.7 exactly; >= 0.7 lands in the top bucket
        let mut labels = vec![Neutral; 7];
        labels.extend_from_slice(&[Happy; 3]);
        let result = ResponseAggregator::score("surprise", &labels);
        assert_eq!(result.neutral_ratio, 0.7);
        assert_eq!(result.score, 2);
    }

    #[test]
    fn test_lower_boundary() {
        // 0.4 exactly is not below the low threshold
        assert_eq!(ResponseAggregator::score_ratio(0.4), 1);
        assert_eq!(ResponseAggregator::score_ratio(0.39999), 0);
    }

    #[test]
    fn test_score_bounded_and_monotonic() {
        let mut previous = 0;
        for i in 0..=100 {
            let ratio = i as f64 / 100.0;
            let score = ResponseAggregator::score_ratio(ratio);
            assert!(score <= 2);
            assert!(score >= previous, "score decreased at ratio {ratio}");
            previous = score;
        }
    }
}
