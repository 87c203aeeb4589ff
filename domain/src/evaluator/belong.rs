//! Belong domain - connection and relationships.
//!
//! Scores isolation and connection need from the input text and context.

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

const ISOLATION: TermSet = TermSet::new(
    &["lonely", "alone", "isolated", "disconnected", "left out"],
    0.2,
);
const SOCIAL_FRICTION: TermSet = TermSet::new(
    &["argument", "fight", "ignored", "rejected", "excluded"],
    0.15,
);
const CONNECTION: TermSet = TermSet::new(
    &["friend", "family", "talk", "connect", "community", "together"],
    0.1,
);

pub struct BelongEvaluator {
    stamp: UpdateStamp,
}

impl BelongEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_isolation(&self, text: &str, context: &EvalContext) -> f64 {
        let score = ISOLATION.score(text) + SOCIAL_FRICTION.score(text);
        clamp01(blend(score, context, "isolation_level"))
    }

    fn assess_connection_need(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(CONNECTION.score(text), context, "connection_need"))
    }

    fn recommendation(&self, isolation: f64, connection: f64) -> &'static str {
        if isolation > 0.6 {
            "Reach out to someone you trust - even a short conversation helps"
        } else if connection > 0.5 {
            "Consider connecting with others"
        } else {
            "Your social connections appear steady"
        }
    }

    fn alternatives(&self, isolation: f64, connection: f64) -> Vec<String> {
        let mut alternatives = Vec::new();

        if isolation > 0.5 {
            alternatives.push("Reach out to a friend".to_string());
            alternatives.push("Join a community".to_string());
        }
        if connection > 0.4 {
            alternatives.push("Schedule time with someone you care about".to_string());
        }

        alternatives
    }

    fn reasoning(&self, isolation: f64, connection: f64) -> String {
        let mut reasons = Vec::new();

        if isolation > 0.5 {
            reasons.push(format!("Isolation detected ({:.1}%)", isolation * 100.0));
        }
        if connection > 0.5 {
            reasons.push(format!("Connection need identified ({:.1}%)", connection * 100.0));
        }

        if reasons.is_empty() {
            "Belong domain analysis: Social connections appear steady".to_string()
        } else {
            format!("Belong domain analysis: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, isolation: f64, connection: f64) -> f64 {
        let indicators = [isolation > 0.5, connection > 0.5]
            .iter()
            .filter(|flag| **flag)
            .count();
        (0.5 + indicators as f64 * 0.15).min(1.0)
    }
}

impl Default for BelongEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for BelongEvaluator {
    fn role(&self) -> Role {
        Role::Belong
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let isolation = self.assess_isolation(&text, context);
        let connection = self.assess_connection_need(&text, context);

        let recommendation = self.recommendation(isolation, connection);
        let dominant = max_feature(&[isolation, connection]);
        let agreement = level_for_score(dominant);
        let confidence = self.confidence(isolation, connection);

        let metrics = DomainMetrics::new(Role::Belong, confidence, dominant, 0.6, 0.85)
            .with_meta("isolation_level", isolation)
            .with_meta("connection_need", connection);

        Ok(DomainResponse::new(
            Role::Belong,
            recommendation,
            self.reasoning(isolation, connection),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(isolation, connection))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        let addresses_social =
            contains_any(&text, &["connect", "friend", "talk", "reach out", "community"]);
        let withdraws = contains_any(&text, &["stay alone", "isolate", "shut everyone out"]);

        let isolation = context.metric_or("isolation_level", 0.5);

        let level = if addresses_social && isolation > 0.6 {
            AgreementLevel::Agreement
        } else if withdraws && isolation > 0.7 {
            AgreementLevel::Disagreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let isolation = context.metric_or("isolation_level", 0.5);
        let connection = context.metric_or("connection_need", 0.5);

        DomainMetrics::new(Role::Belong, 0.7, max_feature(&[isolation, connection]), 0.6, 0.85)
            .with_meta("isolation_level", isolation)
            .with_meta("connection_need", connection)
    }

    fn safety_concerns(&self, _recommendation: &str, context: &EvalContext) -> Vec<String> {
        let mut concerns = Vec::new();

        if context.metric_or("isolation_level", 0.0) > 0.8 {
            concerns.push("Prolonged isolation detected - consider reaching out for support".to_string());
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
    async fn test_lonely_input_suggests_reaching_out() {
        let evaluator = BelongEvaluator::new();
        let ctx = EvalContext::new().with("isolation_level", 0.8);

        let response = evaluator
            .evaluate("Feeling lonely and disconnected, like I'm left out", &ctx)
            .await
            .unwrap();

        assert_eq!(
            response.recommendation,
            "Reach out to someone you trust - even a short conversation helps"
        );
        assert!(response.agreement.is_positive());
    }

    #[tokio::test]
    async fn test_neutral_without_social_signals() {
        let evaluator = BelongEvaluator::new();
        let response = evaluator
            .evaluate("Fixing the bike this afternoon", &EvalContext::new())
            .await
            .unwrap();

        assert_eq!(response.agreement, AgreementLevel::Neutral);
    }

    #[tokio::test]
    async fn test_candidate_withdrawal_disagrees_when_isolated() {
        let evaluator = BelongEvaluator::new();
        let ctx = EvalContext::new().with("isolation_level", 0.8);

        let level = evaluator
            .evaluate_candidate("Just stay alone this weekend", &ctx)
            .await
            .unwrap();
        assert_eq!(level, AgreementLevel::Disagreement);
    }

    #[test]
    fn test_extreme_isolation_concern() {
        let evaluator = BelongEvaluator::new();
        let ctx = EvalContext::new().with("isolation_level", 0.9);

        let concerns = evaluator.safety_concerns("anything", &ctx);
        assert!(!concerns.is_empty());
    }
}
