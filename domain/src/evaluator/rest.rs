//! Rest domain - sleep and recovery.
//!
//! Scores sleep pressure and recovery need from the input text and
//! context.

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

const SLEEP: TermSet = TermSet::new(
    &["sleepy", "insomnia", "sleepless", "can't sleep", "nap", "drowsy"],
    0.2,
);
const RECOVERY: TermSet = TermSet::new(
    &["rest", "break", "recover", "recharge", "worn out", "downtime"],
    0.15,
);
const OVERDRIVE: TermSet = TermSet::new(
    &["nonstop", "all-nighter", "overtime", "no breaks", "back-to-back"],
    0.2,
);

pub struct RestEvaluator {
    stamp: UpdateStamp,
}

impl RestEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_sleep_pressure(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(SLEEP.score(text), context, "sleep_pressure"))
    }

    fn assess_recovery_need(&self, text: &str, context: &EvalContext) -> f64 {
        let score = RECOVERY.score(text) + OVERDRIVE.score(text);
        clamp01(blend(score, context, "recovery_need"))
    }

    fn recommendation(&self, sleep: f64, recovery: f64) -> &'static str {
        if sleep > 0.7 {
            "Prioritize a full night of sleep before taking on more"
        } else if recovery > 0.6 {
            "Schedule genuine downtime to let your system recover"
        } else if recovery > 0.4 || sleep > 0.4 {
            "Consider taking a rest break"
        } else {
            "Your rest and recovery needs appear balanced"
        }
    }

    fn alternatives(&self, sleep: f64, recovery: f64) -> Vec<String> {
        let mut alternatives = Vec::new();

        if sleep > 0.5 {
            alternatives.push("Take a short nap".to_string());
            alternatives.push("Wind down with a consistent bedtime routine".to_string());
        }
        if recovery > 0.4 {
            alternatives.push("Practice relaxation".to_string());
            alternatives.push("Step away from screens for ten minutes".to_string());
        }

        alternatives
    }

    fn reasoning(&self, sleep: f64, recovery: f64) -> String {
        let mut reasons = Vec::new();

        if sleep > 0.5 {
            reasons.push(format!("Sleep pressure detected ({:.1}%)", sleep * 100.0));
        }
        if recovery > 0.5 {
            reasons.push(format!("Recovery need identified ({:.1}%)", recovery * 100.0));
        }

        if reasons.is_empty() {
            "Rest domain analysis: Rest and recovery appear balanced".to_string()
        } else {
            format!("Rest domain analysis: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, sleep: f64, recovery: f64) -> f64 {
        let indicators = [sleep > 0.6, recovery > 0.5]
            .iter()
            .filter(|flag| **flag)
            .count();
        (0.5 + indicators as f64 * 0.15).min(1.0)
    }
}

impl Default for RestEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for RestEvaluator {
    fn role(&self) -> Role {
        Role::Rest
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let sleep = self.assess_sleep_pressure(&text, context);
        let recovery = self.assess_recovery_need(&text, context);

        let recommendation = self.recommendation(sleep, recovery);
        let dominant = max_feature(&[sleep, recovery]);
        let agreement = level_for_score(dominant);
        let confidence = self.confidence(sleep, recovery);

        let metrics = DomainMetrics::new(Role::Rest, confidence, dominant, 0.6, 0.9)
            .with_meta("sleep_pressure", sleep)
            .with_meta("recovery_need", recovery);

        Ok(DomainResponse::new(
            Role::Rest,
            recommendation,
            self.reasoning(sleep, recovery),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(sleep, recovery))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        let addresses_sleep = contains_any(&text, &["sleep", "nap", "bedtime"]);
        let addresses_recovery = contains_any(&text, &["rest", "break", "recover", "pause"]);

        let sleep = context.metric_or("sleep_pressure", 0.5);
        let recovery = context.metric_or("recovery_need", 0.5);

        let level = if addresses_sleep && sleep > 0.7 {
            AgreementLevel::StrongAgreement
        } else if addresses_recovery && recovery > 0.6 {
            AgreementLevel::Agreement
        } else if addresses_sleep && sleep > 0.5 {
            AgreementLevel::Agreement
        } else if contains_any(&text, &["work", "push", "finish"]) && sleep > 0.8 {
            AgreementLevel::Disagreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let sleep = context.metric_or("sleep_pressure", 0.5);
        let recovery = context.metric_or("recovery_need", 0.5);

        DomainMetrics::new(Role::Rest, 0.7, max_feature(&[sleep, recovery]), 0.6, 0.9)
            .with_meta("sleep_pressure", sleep)
            .with_meta("recovery_need", recovery)
    }

    fn safety_concerns(&self, recommendation: &str, context: &EvalContext) -> Vec<String> {
        let text = recommendation.to_lowercase();
        let mut concerns = Vec::new();

        if context.metric_or("sleep_pressure", 0.0) > 0.9 {
            concerns.push(
                "Severe sleep deprivation detected - attention and judgment may be impaired"
                    .to_string(),
            );
        }
        if text.contains("driv") && context.metric_or("sleep_pressure", 0.0) > 0.7 {
            concerns.push("Drowsy driving risk - avoid operating a vehicle".to_string());
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
    async fn test_sleepless_input_prioritizes_sleep() {
        let evaluator = RestEvaluator::new();
        let ctx = EvalContext::new().with("sleep_pressure", 0.9);

        let response = evaluator
            .evaluate("Sleepless again, drowsy all day, I can't sleep at night", &ctx)
            .await
            .unwrap();

        assert_eq!(
            response.recommendation,
            "Prioritize a full night of sleep before taking on more"
        );
        assert!(response.agreement.is_positive());
    }

    #[tokio::test]
    async fn test_neutral_without_rest_signals() {
        let evaluator = RestEvaluator::new();
        let response = evaluator
            .evaluate("Planning the quarterly numbers", &EvalContext::new())
            .await
            .unwrap();

        assert_eq!(response.agreement, AgreementLevel::Neutral);
    }

    #[tokio::test]
    async fn test_candidate_nap_agrees_when_sleep_pressure_high() {
        let evaluator = RestEvaluator::new();
        let ctx = EvalContext::new().with("sleep_pressure", 0.8);

        let level = evaluator
            .evaluate_candidate("Take an early bedtime tonight", &ctx)
            .await
            .unwrap();
        assert_eq!(level, AgreementLevel::StrongAgreement);
    }

    #[test]
    fn test_drowsy_driving_concern() {
        let evaluator = RestEvaluator::new();
        let ctx = EvalContext::new().with("sleep_pressure", 0.8);

        let concerns = evaluator.safety_concerns("Drive over tonight", &ctx);
        assert!(concerns.iter().any(|c| c.contains("driving")));
    }
}
