//! Body domain - physical health and movement.
//!
//! Scores physical energy, pain, movement need, and medical concern from
//! the input text and context.

use crate::core::context::EvalContext;
use crate::core::error::DomainError;
use crate::core::role::Role;
use crate::evaluator::lexicon::{
    TermSet, blend, clamp01, contains_any, level_for_score, max_feature,
};
use crate::evaluator::{DomainEvaluator, UpdateStamp};
use crate::response::domain_response::{DomainMetrics, DomainResponse};
use crate::response::level::AgreementLevel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const PAIN: TermSet = TermSet::new(&["pain", "ache", "sore", "hurt", "discomfort", "tension"], 0.2);
const PHYSICAL_FATIGUE: TermSet =
    TermSet::new(&["tired", "exhausted", "drained", "weak", "heavy"], 0.15);
const ENERGY: TermSet = TermSet::new(&["energetic", "strong", "vital", "powerful", "active"], 0.1);
const MOVEMENT: TermSet =
    TermSet::new(&["exercise", "workout", "walk", "run", "stretch", "move"], 0.15);
const POSTURE: TermSet = TermSet::new(&["sit", "stand", "hunch", "slouch", "ergonomic"], 0.1);
const MEDICAL: TermSet =
    TermSet::new(&["sick", "ill", "injury", "symptom", "doctor", "medical"], 0.25);

/// Body-system term groups feeding the medical-concern feature
const BODY_SYSTEMS: &[(&str, TermSet)] = &[
    (
        "musculoskeletal",
        TermSet::new(&["muscle", "bone", "joint", "back", "neck", "shoulder"], 0.1),
    ),
    (
        "cardiovascular",
        TermSet::new(&["heart", "blood", "circulation", "breath", "chest"], 0.1),
    ),
    (
        "digestive",
        TermSet::new(&["stomach", "digest", "nausea", "appetite", "gut"], 0.1),
    ),
    (
        "nervous",
        TermSet::new(&["nervous", "tremor", "numbness", "tingling", "headache"], 0.1),
    ),
];

pub struct BodyEvaluator {
    stamp: UpdateStamp,
}

impl BodyEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_energy_level(&self, text: &str, context: &EvalContext) -> f64 {
        let score = 0.5 - PHYSICAL_FATIGUE.score(text) + ENERGY.score(text);
        clamp01(blend(score, context, "energy_level"))
    }

    fn assess_pain_level(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(PAIN.score(text), context, "pain_level"))
    }

    fn assess_movement_need(&self, text: &str, context: &EvalContext) -> f64 {
        let score = MOVEMENT.score(text) + POSTURE.score(text);
        clamp01(blend(score, context, "movement_level"))
    }

    fn assess_medical_concern(&self, text: &str, context: &EvalContext) -> f64 {
        let mut score = MEDICAL.score(text);
        for (_, set) in BODY_SYSTEMS {
            score += set.score(text);
        }
        clamp01(blend(score, context, "medical_concern"))
    }

    fn recommendation(&self, energy: f64, pain: f64, movement: f64, medical: f64) -> &'static str {
        if medical > 0.7 {
            "Consider consulting a healthcare professional about your symptoms"
        } else if pain > 0.6 {
            "Focus on pain management and physical comfort before continuing"
        } else if energy < 0.3 {
            "Prioritize physical rest and recovery to restore energy"
        } else if movement > 0.6 {
            "Consider gentle movement or stretching to improve physical comfort"
        } else {
            "Your physical state appears balanced for current activities"
        }
    }

    fn alternatives(&self, energy: f64, pain: f64, movement: f64, medical: f64) -> Vec<String> {
        let mut alternatives = Vec::new();

        if energy < 0.4 {
            alternatives.push("Take a 10-minute rest break".to_string());
            alternatives.push("Hydrate and have a light snack".to_string());
        }
        if pain > 0.5 {
            alternatives.push("Try gentle stretching exercises".to_string());
            alternatives.push("Apply heat or cold therapy".to_string());
        }
        if movement > 0.5 {
            alternatives.push("Take a short walk".to_string());
            alternatives.push("Do some light stretching".to_string());
        }
        if medical > 0.6 {
            alternatives.push("Monitor symptoms closely".to_string());
            alternatives.push("Consider telemedicine consultation".to_string());
        }

        alternatives
    }

    fn reasoning(&self, energy: f64, pain: f64, movement: f64, medical: f64) -> String {
        let mut reasons = Vec::new();

        if energy < 0.4 {
            reasons.push(format!("Low energy level ({:.1}%)", energy * 100.0));
        }
        if pain > 0.5 {
            reasons.push(format!("Pain detected ({:.1}%)", pain * 100.0));
        }
        if movement > 0.5 {
            reasons.push(format!("Movement need identified ({:.1}%)", movement * 100.0));
        }
        if medical > 0.6 {
            reasons.push(format!("Medical concern detected ({:.1}%)", medical * 100.0));
        }

        if reasons.is_empty() {
            "Body domain analysis: Physical state appears balanced".to_string()
        } else {
            format!("Body domain analysis: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, energy: f64, pain: f64, movement: f64, medical: f64) -> f64 {
        let indicators = [energy < 0.4, pain > 0.5, movement > 0.5, medical > 0.6]
            .iter()
            .filter(|flag| **flag)
            .count();
        (0.5 + indicators as f64 * 0.12).min(1.0)
    }

    fn affected_systems(&self, text: &str) -> Vec<String> {
        BODY_SYSTEMS
            .iter()
            .filter(|(_, set)| set.hits(text) > 0)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

impl Default for BodyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for BodyEvaluator {
    fn role(&self) -> Role {
        Role::Body
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let energy = self.assess_energy_level(&text, context);
        let pain = self.assess_pain_level(&text, context);
        let movement = self.assess_movement_need(&text, context);
        let medical = self.assess_medical_concern(&text, context);

        let recommendation = self.recommendation(energy, pain, movement, medical);
        let dominant = max_feature(&[1.0 - energy, pain, movement, medical]);
        let agreement = level_for_score(dominant);
        let confidence = self.confidence(energy, pain, movement, medical);

        let metrics = DomainMetrics::new(Role::Body, confidence, dominant, 0.7, 0.9)
            .with_meta("energy_level", energy)
            .with_meta("pain_level", pain)
            .with_meta("movement_need", movement)
            .with_meta("medical_concern", medical)
            .with_meta("body_systems_affected", self.affected_systems(&text));

        Ok(DomainResponse::new(
            Role::Body,
            recommendation,
            self.reasoning(energy, pain, movement, medical),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(energy, pain, movement, medical))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        let addresses_energy = contains_any(&text, &["rest", "sleep", "energy", "recovery"]);
        let addresses_pain = contains_any(&text, &["pain", "comfort", "relief", "stretch"]);
        let addresses_movement = contains_any(&text, &["move", "exercise", "walk", "stretch"]);
        let addresses_medical = contains_any(&text, &["doctor", "medical", "health", "symptom"]);

        let energy = context.metric_or("energy_level", 0.5);
        let pain = context.metric_or("pain_level", 0.0);
        let movement = context.metric_or("movement_level", 0.5);

        let level = if addresses_medical && pain > 0.7 {
            AgreementLevel::StrongAgreement
        } else if addresses_energy && energy < 0.3 {
            AgreementLevel::Agreement
        } else if addresses_pain && pain > 0.5 {
            AgreementLevel::Agreement
        } else if addresses_movement && movement < 0.3 {
            AgreementLevel::Agreement
        } else if text.contains("work") && energy < 0.2 {
            AgreementLevel::Disagreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let energy = context.metric_or("energy_level", 0.5);
        let pain = context.metric_or("pain_level", 0.0);
        let movement = context.metric_or("movement_level", 0.5);

        DomainMetrics::new(
            Role::Body,
            0.8,
            max_feature(&[1.0 - energy, pain, 1.0 - movement]),
            0.7,
            0.9,
        )
        .with_meta("energy_level", energy)
        .with_meta("pain_level", pain)
        .with_meta("movement_level", movement)
    }

    fn safety_concerns(&self, recommendation: &str, context: &EvalContext) -> Vec<String> {
        let text = recommendation.to_lowercase();
        let mut concerns = Vec::new();

        if context.metric_or("pain_level", 0.0) > 0.8 {
            concerns.push("Severe pain detected - may require medical attention".to_string());
        }

        let strenuous = ["heavy lifting", "intense exercise", "strenuous activity"];
        if contains_any(&text, &strenuous) {
            if context.metric_or("energy_level", 0.5) < 0.3 {
                concerns.push("Low energy level - strenuous activity may be dangerous".to_string());
            }
            if context.metric_or("pain_level", 0.0) > 0.5 {
                concerns.push("Pain present - strenuous activity may cause injury".to_string());
            }
        }

        let emergency = ["chest pain", "difficulty breathing", "severe injury", "bleeding"];
        if contains_any(&text, &emergency) {
            concerns.push("Potential medical emergency indicators detected".to_string());
        }

        concerns
    }

    fn on_context_update(&self, _context: &EvalContext) {
        self.stamp.touch();
    }

    fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.stamp.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pain_dominates_recommendation() {
        let evaluator = BodyEvaluator::new();
        let ctx = EvalContext::new().with("pain_level", 0.8);

        let response = evaluator
            .evaluate("My back is sore and the ache won't let up, constant pain", &ctx)
            .await
            .unwrap();

        assert_eq!(
            response.recommendation,
            "Focus on pain management and physical comfort before continuing"
        );
        assert!(response.agreement.is_positive());
    }

    #[tokio::test]
    async fn test_neutral_when_nothing_flags() {
        let evaluator = BodyEvaluator::new();
        let response = evaluator
            .evaluate("reading in the garden", &EvalContext::new())
            .await
            .unwrap();

        assert_eq!(response.agreement, AgreementLevel::Neutral);
        assert!(response.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_candidate_medical_strongly_agrees_on_high_pain() {
        let evaluator = BodyEvaluator::new();
        let ctx = EvalContext::new().with("pain_level", 0.8);

        let level = evaluator
            .evaluate_candidate("See a doctor about the symptom", &ctx)
            .await
            .unwrap();
        assert_eq!(level, AgreementLevel::StrongAgreement);
    }

    #[test]
    fn test_strenuous_recommendation_flags_low_energy() {
        let evaluator = BodyEvaluator::new();
        let ctx = EvalContext::new().with("energy_level", 0.2);

        let concerns = evaluator.safety_concerns("Try some intense exercise", &ctx);
        assert!(concerns.iter().any(|c| c.contains("strenuous")));
    }
}
