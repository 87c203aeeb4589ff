//! Weighted consensus aggregation over the seven domain verdicts.
//!
//! Turns a round's per-role responses into one overall agreement bucket,
//! a conflict list, and an aggregate confidence. Aggregation treats the
//! role set as unordered and normalizes against the weights of the roles
//! actually present, though production rounds always supply all seven.

use crate::core::role::Role;
use crate::response::domain_response::DomainResponse;
use crate::response::level::AgreementLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed per-role consensus weight. Safety weighs heaviest; fuel lightest.
pub fn role_weight(role: Role) -> f64 {
    match role {
        Role::Safety => 1.0,
        Role::Mind => 0.9,
        Role::Body => 0.8,
        Role::Purpose => 0.7,
        Role::Belong => 0.6,
        Role::Rest => 0.6,
        Role::Fuel => 0.5,
    }
}

/// One hand-authored pairwise antagonism rule. Fires when the first role
/// sits at exactly `Agreement` while the second sits at exactly
/// `Disagreement`. One direction only; configuration data, not derived.
struct ConflictRule {
    agreeing: Role,
    disagreeing: Role,
    description: &'static str,
}

const CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        agreeing: Role::Mind,
        disagreeing: Role::Body,
        description: "Mind-Body conflict: Mental needs vs physical limitations",
    },
    ConflictRule {
        agreeing: Role::Rest,
        disagreeing: Role::Purpose,
        description: "Rest-Purpose conflict: Recovery needs vs achievement goals",
    },
    ConflictRule {
        agreeing: Role::Fuel,
        disagreeing: Role::Body,
        description: "Fuel-Body conflict: Nutritional needs vs physical state",
    },
];

/// Result of consensus evaluation for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Overall agreement bucket
    pub overall: AgreementLevel,
    /// Each role's own agreement level
    pub agreement: BTreeMap<Role, AgreementLevel>,
    /// Detected conflict descriptions
    pub conflicts: Vec<String>,
    /// Aggregate confidence in the consensus decision
    pub confidence: f64,
    /// Deterministic summary of how the bucket was reached
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
}

/// Cross-regulation engine: evaluates agreement between all domains.
#[derive(Debug, Default)]
pub struct ConsensusEngine;

impl ConsensusEngine {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate one round's responses into a consensus result.
    ///
    /// The orchestrator screens for the safety veto before calling this;
    /// the sentinel check here is defense in depth and returns the same
    /// terminal bucket if a block is somehow still present.
    pub fn aggregate(&self, responses: &BTreeMap<Role, DomainResponse>) -> ConsensusResult {
        if let Some(safety) = responses.get(&Role::Safety) {
            if safety.is_veto() {
                return Self::safety_consensus(safety);
            }
        }

        let conflicts = Self::identify_conflicts(responses);
        let overall = Self::overall_level(responses);
        let reasoning = Self::reasoning(responses, &conflicts);
        let confidence = Self::confidence(responses, &conflicts);

        ConsensusResult {
            overall,
            agreement: responses.iter().map(|(role, r)| (*role, r.agreement)).collect(),
            conflicts,
            confidence,
            reasoning,
            timestamp: Utc::now(),
        }
    }

    /// Safety block overrides everything else
    fn safety_consensus(safety: &DomainResponse) -> ConsensusResult {
        ConsensusResult {
            overall: AgreementLevel::SafetyBlock,
            agreement: BTreeMap::from([(Role::Safety, AgreementLevel::SafetyBlock)]),
            conflicts: vec!["Safety domain blocked recommendation".to_string()],
            confidence: safety.confidence,
            reasoning: format!("SAFETY BLOCK: {}", safety.reasoning),
            timestamp: Utc::now(),
        }
    }

    fn identify_conflicts(responses: &BTreeMap<Role, DomainResponse>) -> Vec<String> {
        let mut conflicts = Vec::new();

        let strong_disagreements: Vec<&str> = responses
            .iter()
            .filter(|(_, r)| r.agreement == AgreementLevel::StrongDisagreement)
            .map(|(role, _)| role.as_str())
            .collect();
        if !strong_disagreements.is_empty() {
            conflicts.push(format!(
                "Strong disagreement from: {}",
                strong_disagreements.join(", ")
            ));
        }

        let agreeing = responses
            .values()
            .filter(|r| r.agreement.is_positive())
            .count();
        if agreeing < 3 {
            conflicts.push("Insufficient domain agreement".to_string());
        }

        for rule in CONFLICT_RULES {
            let first = responses.get(&rule.agreeing).map(|r| r.agreement);
            let second = responses.get(&rule.disagreeing).map(|r| r.agreement);
            if first == Some(AgreementLevel::Agreement)
                && second == Some(AgreementLevel::Disagreement)
            {
                conflicts.push(rule.description.to_string());
            }
        }

        conflicts
    }

    /// Weighted average of level scores, mapped to the highest bucket the
    /// aggregate clears. Ties resolve to the higher bucket.
    fn overall_level(responses: &BTreeMap<Role, DomainResponse>) -> AgreementLevel {
        if responses.is_empty() {
            return AgreementLevel::Neutral;
        }

        let total_weight: f64 = responses.keys().map(|role| role_weight(*role)).sum();
        if total_weight == 0.0 {
            return AgreementLevel::Neutral;
        }

        let weighted_sum: f64 = responses
            .iter()
            .map(|(role, r)| r.agreement.score() * role_weight(*role))
            .sum();
        let average = weighted_sum / total_weight;

        if average >= 0.8 {
            AgreementLevel::StrongAgreement
        } else if average >= 0.6 {
            AgreementLevel::Agreement
        } else if average >= 0.4 {
            AgreementLevel::Neutral
        } else if average >= 0.2 {
            AgreementLevel::Disagreement
        } else {
            AgreementLevel::StrongDisagreement
        }
    }

    fn reasoning(responses: &BTreeMap<Role, DomainResponse>, conflicts: &[String]) -> String {
        let count = |level: AgreementLevel| {
            responses.values().filter(|r| r.agreement == level).count()
        };

        let mut parts = Vec::new();
        let strong = count(AgreementLevel::StrongAgreement);
        if strong > 0 {
            parts.push(format!("{} domains strongly agree", strong));
        }
        let agree = count(AgreementLevel::Agreement);
        if agree > 0 {
            parts.push(format!("{} domains agree", agree));
        }
        let disagree = count(AgreementLevel::Disagreement);
        if disagree > 0 {
            parts.push(format!("{} domains disagree", disagree));
        }
        let strong_disagree = count(AgreementLevel::StrongDisagreement);
        if strong_disagree > 0 {
            parts.push(format!("{} domains strongly disagree", strong_disagree));
        }

        if !conflicts.is_empty() {
            parts.push(format!("Conflicts detected: {}", conflicts.join("; ")));
        }

        if parts.is_empty() {
            "Council consensus: All domains neutral".to_string()
        } else {
            format!("Council consensus: {}", parts.join("; "))
        }
    }

    /// Confidence from the variance of the unweighted level scores plus a
    /// per-conflict penalty, floored at zero.
    fn confidence(responses: &BTreeMap<Role, DomainResponse>, conflicts: &[String]) -> f64 {
        if responses.is_empty() {
            return 0.0;
        }

        let scores: Vec<f64> = responses.values().map(|r| r.agreement.score()).collect();
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let variance =
            scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;

        let variance_penalty = (variance * 2.0).min(0.5);
        let conflict_penalty = conflicts.len() as f64 * 0.1;

        (0.7 - variance_penalty - conflict_penalty).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::domain_response::DomainMetrics;

    fn response(role: Role, level: AgreementLevel) -> DomainResponse {
        let metrics = DomainMetrics::new(role, 0.7, 0.5, 0.7, 0.9);
        DomainResponse::new(role, format!("{} rec", role), format!("{} why", role), level, metrics)
            .with_confidence(0.7)
    }

    fn round(levels: &[(Role, AgreementLevel)]) -> BTreeMap<Role, DomainResponse> {
        levels
            .iter()
            .map(|(role, level)| (*role, response(*role, *level)))
            .collect()
    }

    fn full_round(level: AgreementLevel) -> BTreeMap<Role, DomainResponse> {
        Role::all().iter().map(|role| (*role, response(*role, level))).collect()
    }

    fn bucket_rank(level: AgreementLevel) -> u8 {
        match level {
            AgreementLevel::StrongDisagreement => 0,
            AgreementLevel::Disagreement => 1,
            AgreementLevel::Neutral => 2,
            AgreementLevel::Agreement => 3,
            AgreementLevel::StrongAgreement => 4,
            AgreementLevel::SafetyBlock => u8::MAX,
        }
    }

    #[test]
    fn test_all_neutral_lands_neutral() {
        let result = ConsensusEngine::new().aggregate(&full_round(AgreementLevel::Neutral));
        assert_eq!(result.overall, AgreementLevel::Neutral);
        // fewer than 3 agreeing domains flags insufficient agreement
        assert_eq!(result.conflicts, vec!["Insufficient domain agreement".to_string()]);
    }

    #[test]
    fn test_five_agree_two_neutral_lands_agreement() {
        let mut responses = full_round(AgreementLevel::Agreement);
        responses.insert(Role::Rest, response(Role::Rest, AgreementLevel::Neutral));
        responses.insert(Role::Fuel, response(Role::Fuel, AgreementLevel::Neutral));

        let result = ConsensusEngine::new().aggregate(&responses);

        assert_eq!(result.overall, AgreementLevel::Agreement);
        assert!(result.conflicts.is_empty());
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_unanimous_strong_agreement() {
        let result = ConsensusEngine::new().aggregate(&full_round(AgreementLevel::StrongAgreement));
        assert_eq!(result.overall, AgreementLevel::StrongAgreement);
        assert_eq!(
            result.reasoning,
            "Council consensus: 7 domains strongly agree"
        );
    }

    #[test]
    fn test_safety_block_overrides_aggregation() {
        let mut responses = full_round(AgreementLevel::StrongAgreement);
        responses.insert(Role::Safety, response(Role::Safety, AgreementLevel::SafetyBlock));

        let result = ConsensusEngine::new().aggregate(&responses);

        assert_eq!(result.overall, AgreementLevel::SafetyBlock);
        assert!(result.reasoning.starts_with("SAFETY BLOCK"));
        assert_eq!(
            result.conflicts,
            vec!["Safety domain blocked recommendation".to_string()]
        );
    }

    #[test]
    fn test_strong_disagreement_is_reported() {
        let mut responses = full_round(AgreementLevel::Agreement);
        responses.insert(
            Role::Belong,
            response(Role::Belong, AgreementLevel::StrongDisagreement),
        );

        let result = ConsensusEngine::new().aggregate(&responses);
        assert!(result
            .conflicts
            .iter()
            .any(|c| c.contains("Strong disagreement from: belong")));
    }

    #[test]
    fn test_mind_body_conflict_rule_fires() {
        let mut responses = full_round(AgreementLevel::Agreement);
        responses.insert(Role::Body, response(Role::Body, AgreementLevel::Disagreement));

        let result = ConsensusEngine::new().aggregate(&responses);
        assert!(result.conflicts.iter().any(|c| c.contains("Mind-Body conflict")));
        // fuel also agrees, so the fuel-body rule fires too
        assert!(result.conflicts.iter().any(|c| c.contains("Fuel-Body conflict")));
    }

    #[test]
    fn test_conflict_rules_are_one_directional() {
        // body agrees while mind disagrees: the mind-body rule must not fire
        let mut responses = full_round(AgreementLevel::Neutral);
        responses.insert(Role::Body, response(Role::Body, AgreementLevel::Agreement));
        responses.insert(Role::Mind, response(Role::Mind, AgreementLevel::Disagreement));

        let result = ConsensusEngine::new().aggregate(&responses);
        assert!(!result.conflicts.iter().any(|c| c.contains("Mind-Body conflict")));
    }

    #[test]
    fn test_single_step_increase_never_lowers_bucket() {
        let ladder = [
            AgreementLevel::StrongDisagreement,
            AgreementLevel::Disagreement,
            AgreementLevel::Neutral,
            AgreementLevel::Agreement,
            AgreementLevel::StrongAgreement,
        ];
        let engine = ConsensusEngine::new();

        for base in ladder {
            for role in Role::all() {
                for (i, level) in ladder.iter().enumerate().take(ladder.len() - 1) {
                    let mut responses = full_round(base);
                    responses.insert(role, response(role, *level));
                    let before = engine.aggregate(&responses).overall;

                    responses.insert(role, response(role, ladder[i + 1]));
                    let after = engine.aggregate(&responses).overall;

                    assert!(
                        bucket_rank(after) >= bucket_rank(before),
                        "stepping {} from {} to {} lowered the bucket",
                        role,
                        level,
                        ladder[i + 1]
                    );
                }
            }
        }
    }

    #[test]
    fn test_reduced_role_set_normalizes_weights() {
        let responses = round(&[
            (Role::Mind, AgreementLevel::Agreement),
            (Role::Safety, AgreementLevel::Agreement),
            (Role::Body, AgreementLevel::Agreement),
        ]);

        let result = ConsensusEngine::new().aggregate(&responses);
        // average is 0.8 exactly, and ties resolve upward
        assert_eq!(result.overall, AgreementLevel::StrongAgreement);
    }

    #[test]
    fn test_empty_round_is_neutral_with_zero_confidence() {
        let result = ConsensusEngine::new().aggregate(&BTreeMap::new());
        assert_eq!(result.overall, AgreementLevel::Neutral);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_confidence_penalized_by_spread_and_conflicts() {
        let uniform = ConsensusEngine::new().aggregate(&full_round(AgreementLevel::Agreement));

        let mut mixed_responses = full_round(AgreementLevel::Agreement);
        mixed_responses.insert(
            Role::Fuel,
            response(Role::Fuel, AgreementLevel::StrongDisagreement),
        );
        let mixed = ConsensusEngine::new().aggregate(&mixed_responses);

        assert!(uniform.confidence > mixed.confidence);
    }
}
