//! Purpose domain - meaning and goals.
//!
//! Scores meaning drift and goal pull from the input text and context.

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

const DRIFT: TermSet = TermSet::new(
    &["pointless", "meaningless", "aimless", "stuck", "why bother"],
    0.2,
);
const GOALS: TermSet = TermSet::new(
    &["goal", "project", "mission", "deadline", "achieve", "finish"],
    0.1,
);
const MEANING: TermSet = TermSet::new(
    &["meaning", "purpose", "values", "matters", "fulfilling"],
    0.15,
);

pub struct PurposeEvaluator {
    stamp: UpdateStamp,
}

impl PurposeEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_meaning_drift(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(DRIFT.score(text), context, "meaning_drift"))
    }

    fn assess_goal_pull(&self, text: &str, context: &EvalContext) -> f64 {
        let score = GOALS.score(text) + MEANING.score(text);
        clamp01(blend(score, context, "goal_focus"))
    }

    fn recommendation(&self, drift: f64, goal_pull: f64) -> &'static str {
        if drift > 0.6 {
            "Reconnect with what matters to you before pushing forward"
        } else if goal_pull > 0.6 {
            "Align your next step with the goal that matters most"
        } else if goal_pull > 0.4 || drift > 0.4 {
            "Consider your goals and values"
        } else {
            "Your sense of purpose appears steady"
        }
    }

    fn alternatives(&self, drift: f64, goal_pull: f64) -> Vec<String> {
        let mut alternatives = Vec::new();

        if drift > 0.4 {
            alternatives.push("Reflect on your values".to_string());
            alternatives.push("Write down why this matters to you".to_string());
        }
        if goal_pull > 0.4 {
            alternatives.push("Set clear goals".to_string());
            alternatives.push("Pick one small step toward a meaningful goal".to_string());
        }

        alternatives
    }

    fn reasoning(&self, drift: f64, goal_pull: f64) -> String {
        let mut reasons = Vec::new();

        if drift > 0.5 {
            reasons.push(format!("Loss of meaning detected ({:.1}%)", drift * 100.0));
        }
        if goal_pull > 0.5 {
            reasons.push(format!("Goal focus identified ({:.1}%)", goal_pull * 100.0));
        }

        if reasons.is_empty() {
            "Purpose domain analysis: Sense of purpose appears steady".to_string()
        } else {
            format!("Purpose domain analysis: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, drift: f64, goal_pull: f64) -> f64 {
        let indicators = [drift > 0.5, goal_pull > 0.5]
            .iter()
            .filter(|flag| **flag)
            .count();
        (0.5 + indicators as f64 * 0.15).min(1.0)
    }
}

impl Default for PurposeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for PurposeEvaluator {
    fn role(&self) -> Role {
        Role::Purpose
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let drift = self.assess_meaning_drift(&text, context);
        let goal_pull = self.assess_goal_pull(&text, context);

        let recommendation = self.recommendation(drift, goal_pull);
        let dominant = max_feature(&[drift, goal_pull]);
        let agreement = level_for_score(dominant);
        let confidence = self.confidence(drift, goal_pull);

        let metrics = DomainMetrics::new(Role::Purpose, confidence, dominant, 0.7, 0.85)
            .with_meta("meaning_drift", drift)
            .with_meta("goal_pull", goal_pull);

        Ok(DomainResponse::new(
            Role::Purpose,
            recommendation,
            self.reasoning(drift, goal_pull),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(drift, goal_pull))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        let addresses_goals =
            contains_any(&text, &["goal", "value", "meaning", "purpose", "priorit"]);
        let abandons = contains_any(&text, &["give up", "quit", "drop everything"]);

        let goal_focus = context.metric_or("goal_focus", 0.5);
        let drift = context.metric_or("meaning_drift", 0.5);

        let level = if addresses_goals && goal_focus > 0.6 {
            AgreementLevel::Agreement
        } else if addresses_goals && drift > 0.6 {
            AgreementLevel::Agreement
        } else if abandons && goal_focus > 0.6 {
            AgreementLevel::Disagreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let drift = context.metric_or("meaning_drift", 0.5);
        let goal_focus = context.metric_or("goal_focus", 0.5);

        DomainMetrics::new(Role::Purpose, 0.7, max_feature(&[drift, goal_focus]), 0.7, 0.85)
            .with_meta("meaning_drift", drift)
            .with_meta("goal_focus", goal_focus)
    }

    fn safety_concerns(&self, _recommendation: &str, context: &EvalContext) -> Vec<String> {
        let mut concerns = Vec::new();

        if context.metric_or("meaning_drift", 0.0) > 0.8 {
            concerns.push(
                "Deep loss of meaning detected - worth discussing with someone you trust"
                    .to_string(),
            );
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
