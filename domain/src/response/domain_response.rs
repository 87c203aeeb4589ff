//! Per-role verdict and metric snapshot for one round

use crate::core::role::Role;
use crate::response::level::AgreementLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metric snapshot a role produces for one round.
///
/// All four scores live in `[0, 1]`. The metadata bag carries the role's
/// raw feature scores and any detected indicator terms; created fresh each
/// round and never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainMetrics {
    pub role: Role,
    pub confidence: f64,
    pub urgency: f64,
    pub impact: f64,
    pub data_quality: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl DomainMetrics {
    pub fn new(role: Role, confidence: f64, urgency: f64, impact: f64, data_quality: f64) -> Self {
        Self {
            role,
            confidence,
            urgency,
            impact,
            data_quality,
            timestamp: Utc::now(),
            metadata: Map::new(),
        }
    }

    /// Add one metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A role's complete verdict for one round.
///
/// Immutable value; consumed by the aggregator and synthesizer, then
/// discardable (or journaled externally).
///
/// # Example
///
/// ```
/// use council_domain::{AgreementLevel, DomainMetrics, DomainResponse, Role};
///
/// let metrics = DomainMetrics::new(Role::Mind, 0.8, 0.7, 0.8, 0.9);
/// let response = DomainResponse::new(
///     Role::Mind,
///     "Consider taking a mental break to restore cognitive clarity",
///     "Mind domain analysis: Mental fatigue detected (80.0%)",
///     AgreementLevel::Agreement,
///     metrics,
/// )
/// .with_confidence(0.8);
///
/// assert!(response.agreement.is_positive());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResponse {
    pub role: Role,
    pub recommendation: String,
    pub reasoning: String,
    pub agreement: AgreementLevel,
    pub metrics: DomainMetrics,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub safety_concerns: Vec<String>,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl DomainResponse {
    pub fn new(
        role: Role,
        recommendation: impl Into<String>,
        reasoning: impl Into<String>,
        agreement: AgreementLevel,
        metrics: DomainMetrics,
    ) -> Self {
        Self {
            role,
            recommendation: recommendation.into(),
            reasoning: reasoning.into(),
            agreement,
            metrics,
            alternatives: Vec::new(),
            safety_concerns: Vec::new(),
            confidence: 0.5,
            timestamp: Utc::now(),
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn with_safety_concerns(mut self, concerns: Vec<String>) -> Self {
        self.safety_concerns = concerns;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Deterministic substitute for a role whose evaluation call failed.
    ///
    /// Zero confidence, neutral agreement, metadata tagged `fallback`.
    /// One role's failure never blocks or voids the round.
    pub fn fallback(role: Role) -> Self {
        let metrics = DomainMetrics::new(role, 0.0, 0.0, 0.5, 0.0).with_meta("fallback", true);

        Self::new(
            role,
            "Domain temporarily unavailable",
            "Technical issue in domain evaluation",
            AgreementLevel::Neutral,
            metrics,
        )
        .with_confidence(0.0)
    }

    /// Check if this verdict carries the safety veto sentinel
    pub fn is_veto(&self) -> bool {
        self.agreement.is_veto()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let fallback = DomainResponse::fallback(Role::Fuel);
        assert_eq!(fallback.role, Role::Fuel);
        assert_eq!(fallback.agreement, AgreementLevel::Neutral);
        assert_eq!(fallback.confidence, 0.0);
        assert_eq!(fallback.metrics.confidence, 0.0);
        assert_eq!(
            fallback.metrics.metadata.get("fallback"),
            Some(&serde_json::Value::Bool(true))
        );
    }

    #[test]
    fn test_confidence_is_clamped() {
        let metrics = DomainMetrics::new(Role::Body, 0.5, 0.5, 0.7, 0.9);
        let response = DomainResponse::new(
            Role::Body,
            "rec",
            "because",
            AgreementLevel::Neutral,
            metrics,
        )
        .with_confidence(1.7);
        assert_eq!(response.confidence, 1.0);
    }

    #[test]
    fn test_metrics_metadata_builder() {
        let metrics = DomainMetrics::new(Role::Mind, 0.8, 0.6, 0.8, 0.9)
            .with_meta("cognitive_load", 0.7)
            .with_meta("keywords_detected", vec!["stressed".to_string()]);
        assert_eq!(metrics.metadata.len(), 2);
    }
}
