//! Agreement levels for council verdicts

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Levels of agreement a domain can report for a round.
///
/// The five ordinary levels form an ordered scale. `SafetyBlock` sits
/// outside that ordering: it is a terminal sentinel that only the safety
/// domain may assert, and aggregation math can never produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgreementLevel {
    StrongAgreement,
    Agreement,
    Neutral,
    Disagreement,
    StrongDisagreement,
    SafetyBlock,
}

impl AgreementLevel {
    /// Get the string identifier for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementLevel::StrongAgreement => "strong_agreement",
            AgreementLevel::Agreement => "agreement",
            AgreementLevel::Neutral => "neutral",
            AgreementLevel::Disagreement => "disagreement",
            AgreementLevel::StrongDisagreement => "strong_disagreement",
            AgreementLevel::SafetyBlock => "safety_block",
        }
    }

    /// Numeric score used by the consensus aggregation.
    ///
    /// `SafetyBlock` maps to a sentinel value; it is screened out before
    /// any averaging takes place.
    pub fn score(&self) -> f64 {
        match self {
            AgreementLevel::StrongAgreement => 1.0,
            AgreementLevel::Agreement => 0.8,
            AgreementLevel::Neutral => 0.5,
            AgreementLevel::Disagreement => 0.2,
            AgreementLevel::StrongDisagreement => 0.0,
            AgreementLevel::SafetyBlock => -1.0,
        }
    }

    /// Agreement or better
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            AgreementLevel::StrongAgreement | AgreementLevel::Agreement
        )
    }

    /// Check if this level is the safety veto sentinel
    pub fn is_veto(&self) -> bool {
        matches!(self, AgreementLevel::SafetyBlock)
    }
}

impl std::fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgreementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong_agreement" => Ok(AgreementLevel::StrongAgreement),
            "agreement" => Ok(AgreementLevel::Agreement),
            "neutral" => Ok(AgreementLevel::Neutral),
            "disagreement" => Ok(AgreementLevel::Disagreement),
            "strong_disagreement" => Ok(AgreementLevel::StrongDisagreement),
            "safety_block" => Ok(AgreementLevel::SafetyBlock),
            other => Err(format!("unknown agreement level: {}", other)),
        }
    }
}

impl Serialize for AgreementLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgreementLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(AgreementLevel::StrongAgreement.score(), 1.0);
        assert_eq!(AgreementLevel::Agreement.score(), 0.8);
        assert_eq!(AgreementLevel::Neutral.score(), 0.5);
        assert_eq!(AgreementLevel::Disagreement.score(), 0.2);
        assert_eq!(AgreementLevel::StrongDisagreement.score(), 0.0);
        assert_eq!(AgreementLevel::SafetyBlock.score(), -1.0);
    }

    #[test]
    fn test_is_positive() {
        assert!(AgreementLevel::StrongAgreement.is_positive());
        assert!(AgreementLevel::Agreement.is_positive());
        assert!(!AgreementLevel::Neutral.is_positive());
        assert!(!AgreementLevel::SafetyBlock.is_positive());
    }

    #[test]
    fn test_round_trips_through_str() {
        for level in [
            AgreementLevel::StrongAgreement,
            AgreementLevel::Agreement,
            AgreementLevel::Neutral,
            AgreementLevel::Disagreement,
            AgreementLevel::StrongDisagreement,
            AgreementLevel::SafetyBlock,
        ] {
            let parsed: AgreementLevel = level.as_str().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }
}
