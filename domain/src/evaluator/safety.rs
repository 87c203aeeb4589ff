//! Safety domain - security, boundaries, and harm prevention.
//!
//! The only domain permitted to emit [`AgreementLevel::SafetyBlock`]. It
//! does so on its own authority when the crisis feature clears a fixed
//! high threshold, independent of the aggregator.

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

const PHYSICAL_THREAT: TermSet =
    TermSet::new(&["hurt", "harm", "danger", "attack", "violence", "abuse"], 0.2);
const EMOTIONAL_THREAT: TermSet =
    TermSet::new(&["manipulate", "control", "pressure", "coerce", "threaten"], 0.15);
const EXPLOITATION: TermSet =
    TermSet::new(&["exploit", "manipulate", "take advantage", "trick"], 0.25);
const INSTABILITY: TermSet =
    TermSet::new(&["unstable", "volatile", "dangerous", "risky", "unsafe"], 0.2);
const CRISIS: TermSet =
    TermSet::new(&["suicide", "self-harm", "emergency", "crisis", "desperate"], 0.3);
const BOUNDARY_VIOLATION: TermSet =
    TermSet::new(&["push", "force", "insist", "demand", "pressure"], 0.2);

/// Protection patterns: each detected pattern raises the crisis feature
const PROTECTION_PATTERNS: &[(&str, TermSet)] = &[
    (
        "self_harm",
        TermSet::new(
            &["kill myself", "end it all", "don't want to live", "better off dead"],
            0.25,
        ),
    ),
    (
        "harm_others",
        TermSet::new(&["hurt them", "attack", "revenge", "get back at"], 0.25),
    ),
    (
        "substance_abuse",
        TermSet::new(&["drink too much", "drugs", "overdose", "substance"], 0.25),
    ),
    (
        "financial_risk",
        TermSet::new(&["gamble", "loan", "debt", "financial risk"], 0.25),
    ),
    (
        "relationship_danger",
        TermSet::new(&["abusive", "controlling", "manipulative partner"], 0.25),
    ),
];

/// Crisis feature above this blocks the round outright
const CRISIS_BLOCK_THRESHOLD: f64 = 0.7;

pub struct SafetyEvaluator {
    stamp: UpdateStamp,
}

impl SafetyEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_risk_level(&self, text: &str, context: &EvalContext) -> f64 {
        let score = PHYSICAL_THREAT.score(text)
            + EMOTIONAL_THREAT.score(text)
            + EXPLOITATION.score(text)
            + INSTABILITY.score(text);
        clamp01(blend(score, context, "risk_level"))
    }

    fn assess_crisis_level(&self, text: &str, context: &EvalContext) -> f64 {
        let mut score = CRISIS.score(text);
        for (_, set) in PROTECTION_PATTERNS {
            score += set.score(text);
        }
        clamp01(blend(score, context, "crisis_level"))
    }

    fn assess_boundary_concern(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(BOUNDARY_VIOLATION.score(text), context, "boundary_concern"))
    }

    fn assess_stability_level(&self, text: &str, context: &EvalContext) -> f64 {
        let score = 1.0 - INSTABILITY.hits(text) as f64 * 0.15;
        clamp01(blend(score, context, "stability_level"))
    }

    fn recommendation(
        &self,
        risk: f64,
        crisis: f64,
        boundary: f64,
        stability: f64,
    ) -> &'static str {
        if crisis > 0.8 {
            "CRISIS: Please contact emergency services or a crisis hotline immediately"
        } else if crisis > 0.6 {
            "Consider reaching out to a mental health professional or crisis support"
        } else if risk > 0.7 {
            "Focus on safety first - avoid any activities that could cause harm"
        } else if boundary > 0.6 {
            "Respect your boundaries and don't feel pressured to do anything unsafe"
        } else if stability < 0.4 {
            "Prioritize creating a safe, stable environment before making decisions"
        } else {
            "Your safety appears secure for current activities"
        }
    }

    fn agreement(&self, risk: f64, crisis: f64, boundary: f64, stability: f64) -> AgreementLevel {
        if crisis > CRISIS_BLOCK_THRESHOLD {
            return AgreementLevel::SafetyBlock;
        }
        level_for_score(max_feature(&[risk, crisis, boundary, 1.0 - stability]))
    }

    fn alternatives(&self, risk: f64, crisis: f64, boundary: f64, stability: f64) -> Vec<String> {
        let mut alternatives = Vec::new();

        if crisis > 0.6 {
            alternatives.push("Contact National Suicide Prevention Lifeline: 988".to_string());
            alternatives.push("Reach out to a trusted friend or family member".to_string());
        }
        if risk > 0.6 {
            alternatives.push("Remove yourself from potentially dangerous situations".to_string());
            alternatives.push("Create a safety plan with trusted individuals".to_string());
        }
        if boundary > 0.5 {
            alternatives.push("Practice saying 'no' to requests that feel unsafe".to_string());
            alternatives.push("Set clear boundaries with others".to_string());
        }
        if stability < 0.5 {
            alternatives.push("Focus on creating a safe, predictable routine".to_string());
            alternatives.push("Avoid major life changes until stability improves".to_string());
        }

        alternatives
    }

    fn reasoning(&self, risk: f64, crisis: f64, boundary: f64, stability: f64) -> String {
        let mut reasons = Vec::new();

        if crisis > 0.6 {
            reasons.push(format!("CRISIS DETECTED ({:.1}%)", crisis * 100.0));
        }
        if risk > 0.6 {
            reasons.push(format!("Safety risk identified ({:.1}%)", risk * 100.0));
        }
        if boundary > 0.5 {
            reasons.push(format!("Boundary concern detected ({:.1}%)", boundary * 100.0));
        }
        if stability < 0.5 {
            reasons.push(format!("Instability detected ({:.1}%)", stability * 100.0));
        }

        if reasons.is_empty() {
            "Safety domain analysis: No immediate safety concerns detected".to_string()
        } else {
            format!("SAFETY ALERT: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, risk: f64, crisis: f64, boundary: f64, stability: f64) -> f64 {
        let indicators = [crisis > 0.6, risk > 0.6, boundary > 0.5, stability < 0.5]
            .iter()
            .filter(|flag| **flag)
            .count();
        (0.6 + indicators as f64 * 0.1).min(1.0)
    }

    fn detected_patterns(&self, text: &str) -> Vec<String> {
        PROTECTION_PATTERNS
            .iter()
            .filter(|(_, set)| set.hits(text) > 0)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn has_safety_violation(&self, text: &str, context: &EvalContext) -> bool {
        if context.metric_or("crisis_level", 0.0) > CRISIS_BLOCK_THRESHOLD {
            return true;
        }
        contains_any(text, &["ignore safety", "take risk", "dangerous", "harmful"])
    }

    fn increases_risk(&self, text: &str) -> bool {
        contains_any(text, &["ignore", "risk", "dangerous", "harmful", "unsafe"])
    }
}

impl Default for SafetyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for SafetyEvaluator {
    fn role(&self) -> Role {
        Role::Safety
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let risk = self.assess_risk_level(&text, context);
        let crisis = self.assess_crisis_level(&text, context);
        let boundary = self.assess_boundary_concern(&text, context);
        let stability = self.assess_stability_level(&text, context);

        let recommendation = self.recommendation(risk, crisis, boundary, stability);
        let agreement = self.agreement(risk, crisis, boundary, stability);
        let confidence = self.confidence(risk, crisis, boundary, stability);

        // Safety has maximum impact: it can block everything
        let metrics = DomainMetrics::new(
            Role::Safety,
            confidence,
            max_feature(&[risk, crisis, boundary, 1.0 - stability]),
            1.0,
            0.95,
        )
        .with_meta("risk_level", risk)
        .with_meta("crisis_level", crisis)
        .with_meta("boundary_concern", boundary)
        .with_meta("stability_level", stability)
        .with_meta("protection_patterns_detected", self.detected_patterns(&text));

        Ok(DomainResponse::new(
            Role::Safety,
            recommendation,
            self.reasoning(risk, crisis, boundary, stability),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(risk, crisis, boundary, stability))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        if self.has_safety_violation(&text, context) {
            return Ok(AgreementLevel::SafetyBlock);
        }

        let addresses_risk = contains_any(&text, &["safe", "secure", "protect", "risk"]);
        let addresses_crisis = contains_any(&text, &["crisis", "emergency", "help", "support"]);
        let addresses_boundary = contains_any(&text, &["boundary", "respect", "consent", "choice"]);

        let risk = context.metric_or("risk_level", 0.0);
        let crisis = context.metric_or("crisis_level", 0.0);
        let boundary = context.metric_or("boundary_concern", 0.0);

        let level = if addresses_crisis && crisis > 0.6 {
            AgreementLevel::StrongAgreement
        } else if addresses_risk && risk > 0.5 {
            AgreementLevel::Agreement
        } else if addresses_boundary && boundary > 0.4 {
            AgreementLevel::Agreement
        } else if self.increases_risk(&text) {
            AgreementLevel::StrongDisagreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let risk = context.metric_or("risk_level", 0.0);
        let crisis = context.metric_or("crisis_level", 0.0);
        let boundary = context.metric_or("boundary_concern", 0.0);
        let stability = context.metric_or("stability_level", 1.0);

        DomainMetrics::new(
            Role::Safety,
            0.9,
            max_feature(&[risk, crisis, boundary, 1.0 - stability]),
            1.0,
            0.95,
        )
        .with_meta("risk_level", risk)
        .with_meta("crisis_level", crisis)
        .with_meta("boundary_concern", boundary)
        .with_meta("stability_level", stability)
    }

    fn safety_concerns(&self, recommendation: &str, context: &EvalContext) -> Vec<String> {
        let text = recommendation.to_lowercase();
        let mut concerns = Vec::new();

        if context.metric_or("crisis_level", 0.0) > 0.7 {
            concerns.push("CRISIS: Immediate intervention may be required".to_string());
        }
        if context.metric_or("self_harm_risk", 0.0) > 0.6 {
            concerns.push("SELF-HARM RISK: Professional mental health support needed".to_string());
        }
        if context.metric_or("harm_others_risk", 0.0) > 0.6 {
            concerns.push("HARM TO OTHERS RISK: Safety intervention required".to_string());
        }
        if context.metric_or("exploitation_risk", 0.0) > 0.7 {
            concerns.push("EXPLOITATION RISK: Recommendation may enable harm".to_string());
        }
        if context.metric_or("boundary_violation", 0.0) > 0.5 {
            concerns.push("BOUNDARY VIOLATION: Recommendation may disrespect autonomy".to_string());
        }

        let dangerous = ["driving while impaired", "substance abuse", "reckless behavior"];
        if contains_any(&text, &dangerous) {
            concerns.push("DANGEROUS ACTIVITY: Recommendation may cause harm".to_string());
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
