//! Mind domain - cognitive and emotional processing.
//!
//! Scores cognitive load, emotional strain, and mental fatigue from the
//! input text and context, and flags burnout-adjacent hazards.

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

const STRESS: TermSet = TermSet::new(&["stressed", "anxious", "worried", "overwhelmed"], 0.2);
const FATIGUE: TermSet = TermSet::new(&["tired", "exhausted", "drained", "burnout"], 0.15);
const HIGH_LOAD: TermSet = TermSet::new(&["complex", "difficult", "challenging", "complicated"], 0.1);
const LEARNING: TermSet = TermSet::new(&["learn", "study", "understand", "figure out"], 0.05);
const MENTAL_FATIGUE: TermSet = TermSet::new(
    &[
        "exhausted",
        "tired",
        "burnout",
        "overwhelmed",
        "stressed",
        "can't think",
        "brain fog",
        "mental fatigue",
        "drained",
    ],
    0.2,
);

pub struct MindEvaluator {
    stamp: UpdateStamp,
}

impl MindEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_cognitive_load(&self, text: &str, context: &EvalContext) -> f64 {
        let score = 0.5 + HIGH_LOAD.score(text) + LEARNING.score(text);
        clamp01(blend(score, context, "cognitive_load"))
    }

    fn assess_emotional_state(&self, text: &str, context: &EvalContext) -> f64 {
        let score = STRESS.score(text) + FATIGUE.score(text);
        clamp01(blend(score, context, "stress_level"))
    }

    fn assess_mental_fatigue(&self, text: &str, context: &EvalContext) -> f64 {
        let score = MENTAL_FATIGUE.score(text);
        clamp01(blend(score, context, "mental_fatigue"))
    }

    fn recommendation(&self, load: f64, emotional: f64, fatigue: f64) -> &'static str {
        if fatigue > 0.7 {
            "Consider taking a mental break to restore cognitive clarity"
        } else if emotional > 0.6 {
            "Focus on stress management techniques before continuing"
        } else if load > 0.8 {
            "Break down complex tasks into smaller, manageable steps"
        } else {
            "Your cognitive state appears balanced for current activities"
        }
    }

    fn alternatives(&self, load: f64, emotional: f64, fatigue: f64) -> Vec<String> {
        let mut alternatives = Vec::new();

        if fatigue > 0.6 {
            alternatives.push("Take a 15-minute meditation break".to_string());
            alternatives.push("Switch to a less demanding task temporarily".to_string());
        }
        if emotional > 0.5 {
            alternatives.push("Practice deep breathing exercises".to_string());
            alternatives.push("Step away for a brief walk".to_string());
        }
        if load > 0.7 {
            alternatives.push("Create a prioritized task list".to_string());
            alternatives.push("Ask for help or collaboration".to_string());
        }

        alternatives
    }

    fn reasoning(&self, load: f64, emotional: f64, fatigue: f64) -> String {
        let mut reasons = Vec::new();

        if fatigue > 0.6 {
            reasons.push(format!("Mental fatigue detected ({:.1}%)", fatigue * 100.0));
        }
        if emotional > 0.5 {
            reasons.push(format!("Elevated stress levels ({:.1}%)", emotional * 100.0));
        }
        if load > 0.7 {
            reasons.push(format!("High cognitive load ({:.1}%)", load * 100.0));
        }

        if reasons.is_empty() {
            "Mind domain analysis: Cognitive state appears balanced".to_string()
        } else {
            format!("Mind domain analysis: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, load: f64, emotional: f64, fatigue: f64) -> f64 {
        let indicators = [load > 0.6, emotional > 0.5, fatigue > 0.6]
            .iter()
            .filter(|flag| **flag)
            .count();
        (0.5 + indicators as f64 * 0.15).min(1.0)
    }

    fn detected_terms(&self, text: &str) -> Vec<&'static str> {
        let mut terms = Vec::new();
        for set in [STRESS, FATIGUE, HIGH_LOAD, LEARNING] {
            terms.extend(set.matches(text));
        }
        terms
    }
}

impl Default for MindEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for MindEvaluator {
    fn role(&self) -> Role {
        Role::Mind
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let load = self.assess_cognitive_load(&text, context);
        let emotional = self.assess_emotional_state(&text, context);
        let fatigue = self.assess_mental_fatigue(&text, context);

        let recommendation = self.recommendation(load, emotional, fatigue);
        let agreement = level_for_score(max_feature(&[load, emotional, fatigue]));
        let confidence = self.confidence(load, emotional, fatigue);

        let keywords: Vec<String> = self
            .detected_terms(&text)
            .into_iter()
            .map(String::from)
            .collect();

        let metrics = DomainMetrics::new(
            Role::Mind,
            confidence,
            max_feature(&[load, emotional, fatigue]),
            0.8,
            0.9,
        )
        .with_meta("cognitive_load", load)
        .with_meta("emotional_state", emotional)
        .with_meta("fatigue_level", fatigue)
        .with_meta("keywords_detected", keywords);

        Ok(DomainResponse::new(
            Role::Mind,
            recommendation,
            self.reasoning(load, emotional, fatigue),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(load, emotional, fatigue))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        let addresses_cognitive = contains_any(&text, &["think", "focus", "clarity", "mental"]);
        let addresses_emotional = contains_any(&text, &["stress", "calm", "relax", "emotional"]);
        let addresses_fatigue = contains_any(&text, &["rest", "break", "recovery", "sleep"]);

        let load = context.metric_or("cognitive_load", 0.5);
        let stress = context.metric_or("stress_level", 0.5);
        let fatigue = context.metric_or("mental_fatigue", 0.5);

        let level = if addresses_cognitive && load > 0.7 {
            AgreementLevel::Agreement
        } else if addresses_emotional && stress > 0.6 {
            AgreementLevel::Agreement
        } else if addresses_fatigue && fatigue > 0.6 {
            AgreementLevel::Agreement
        } else if text.contains("work") && fatigue > 0.8 {
            AgreementLevel::Disagreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let load = context.metric_or("cognitive_load", 0.5);
        let stress = context.metric_or("stress_level", 0.5);
        let fatigue = context.metric_or("mental_fatigue", 0.5);

        DomainMetrics::new(Role::Mind, 0.8, max_feature(&[load, stress, fatigue]), 0.8, 0.9)
            .with_meta("cognitive_load", load)
            .with_meta("stress_level", stress)
            .with_meta("mental_fatigue", fatigue)
    }

    fn safety_concerns(&self, recommendation: &str, context: &EvalContext) -> Vec<String> {
        let text = recommendation.to_lowercase();
        let mut concerns = Vec::new();

        if context.metric_or("cognitive_load", 0.0) > 0.9 {
            concerns.push("Extreme cognitive overload detected".to_string());
        }

        let crisis_indicators = ["harm myself", "suicide", "end it all", "can't go on"];
        if contains_any(&text, &crisis_indicators) {
            concerns.push("Potential mental health crisis indicators detected".to_string());
        }

        if context.metric_or("mental_fatigue", 0.0) > 0.8 && text.contains("work") {
            concerns.push("High burnout risk - work recommendation may be harmful".to_string());
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
    async fn test_fatigued_input_recommends_a_break() {
        let evaluator = MindEvaluator::new();
        let ctx = EvalContext::new().with("mental_fatigue", 0.8);

        let response = evaluator
            .evaluate("I'm exhausted, tired and drained, and the brain fog is terrible", &ctx)
            .await
            .unwrap();

        assert_eq!(
            response.recommendation,
            "Consider taking a mental break to restore cognitive clarity"
        );
        assert!(response.agreement.is_positive());
        assert!(!response.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_calm_input_stays_neutral() {
        let evaluator = MindEvaluator::new();
        let ctx = EvalContext::new();

        let response = evaluator.evaluate("planning the garden", &ctx).await.unwrap();

        assert_eq!(response.agreement, AgreementLevel::Neutral);
        assert_eq!(
            response.recommendation,
            "Your cognitive state appears balanced for current activities"
        );
    }

    #[tokio::test]
    async fn test_evaluation_is_deterministic() {
        let evaluator = MindEvaluator::new();
        let ctx = EvalContext::new().with("stress_level", 0.7);

        let first = evaluator
            .evaluate("Stressed about this difficult project", &ctx)
            .await
            .unwrap();
        let second = evaluator
            .evaluate("Stressed about this difficult project", &ctx)
            .await
            .unwrap();

        assert_eq!(first.recommendation, second.recommendation);
        assert_eq!(first.reasoning, second.reasoning);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.agreement, second.agreement);
    }

    #[tokio::test]
    async fn test_candidate_rest_agrees_under_fatigue() {
        let evaluator = MindEvaluator::new();
        let ctx = EvalContext::new().with("mental_fatigue", 0.7);

        let level = evaluator
            .evaluate_candidate("Take a rest break this afternoon", &ctx)
            .await
            .unwrap();
        assert_eq!(level, AgreementLevel::Agreement);
    }

    #[tokio::test]
    async fn test_candidate_work_disagrees_when_drained() {
        let evaluator = MindEvaluator::new();
        let ctx = EvalContext::new().with("mental_fatigue", 0.9);

        let level = evaluator
            .evaluate_candidate("Push through and finish the work tonight", &ctx)
            .await
            .unwrap();
        assert_eq!(level, AgreementLevel::Disagreement);
    }

    #[test]
    fn test_burnout_concern_on_work_recommendation() {
        let evaluator = MindEvaluator::new();
        let ctx = EvalContext::new().with("mental_fatigue", 0.9);

        let concerns = evaluator.safety_concerns("Keep working late", &ctx);
        assert!(concerns.iter().any(|c| c.contains("burnout")));
    }
}
