//! Two-modality risk fusion
//!
//! Combines the opaque survey classifier's risk tier with the emotion
//! session outcome into the final screening tier. Kept as a pure function so
//! the result layer applies the exact documented rule.

use serde::{Deserialize, Serialize};

use crate::types::SessionOutcome;

/// Three-level screening risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

/// Output of the external survey classifier, consumed as-is.
///
/// `probability` is absent when the underlying model offers no probability
/// support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAssessment {
    pub tier: RiskTier,
    pub probability: Option<f64>,
}

/// Fuse survey and emotion modalities into the final tier.
///
/// Returns `None` when the emotion outcome is the no-face sentinel: missing
/// data must not masquerade as a measurement, so fusion is undefined until
/// the emotion session is re-run.
///
/// Rule: survey High or emotion score 2 gives High; otherwise survey
/// Moderate or emotion score 1 gives Moderate; otherwise Low.
pub fn fuse(survey: &SurveyAssessment, emotion: &SessionOutcome) -> Option<RiskTier> {
    let emotion_score = match emotion {
        SessionOutcome::Scored { final_score } => *final_score,
        SessionOutcome::NoFaceDetected => return None,
    };

    let tier = if survey.tier == RiskTier::High || emotion_score == 2 {
        RiskTier::High
    } else if survey.tier == RiskTier::Moderate || emotion_score == 1 {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    };
    Some(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey(tier: RiskTier) -> SurveyAssessment {
        SurveyAssessment {
            tier,
            probability: Some(0.5),
        }
    }

    fn scored(final_score: u8) -> SessionOutcome {
        SessionOutcome::Scored { final_score }
    }

    #[test]
    fn test_high_survey_dominates() {
        assert_eq!(
            fuse(&survey(RiskTier::High), &scored(0)),
            Some(RiskTier::High)
        );
    }

    #[test]
    fn test_blunted_emotion_dominates() {
        assert_eq!(
            fuse(&survey(RiskTier::Low), &scored(2)),
            Some(RiskTier::High)
        );
    }

    #[test]
    fn test_moderate_paths() {
        assert_eq!(
            fuse(&survey(RiskTier::Moderate), &scored(0)),
            Some(RiskTier::Moderate)
        );
        assert_eq!(
            fuse(&survey(RiskTier::Low), &scored(1)),
            Some(RiskTier::Moderate)
        );
    }

    #[test]
    fn test_low_when_both_low() {
        assert_eq!(
            fuse(&survey(RiskTier::Low), &scored(0)),
            Some(RiskTier::Low)
        );
    }

    #[test]
    fn test_sentinel_blocks_fusion() {
        // A no-face session is missing data, never a Low result
        assert_eq!(
            fuse(&survey(RiskTier::High), &SessionOutcome::NoFaceDetected),
            None
        );
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskTier::Moderate).unwrap(),
            "\"moderate\""
        );
    }
}
