//! Evaluator capability contract and the seven concrete domains.
//!
//! Every council domain implements [`DomainEvaluator`]: deterministic
//! lexical scoring of free-text input blended with the shared context,
//! judgment of externally proposed recommendations, a context-only metric
//! snapshot, and an independent hazard scan. The safety domain is the only
//! implementation permitted to return [`AgreementLevel::SafetyBlock`].

pub mod belong;
pub mod body;
pub mod fuel;
pub mod lexicon;
pub mod mind;
pub mod purpose;
pub mod rest;
pub mod safety;

use crate::core::context::EvalContext;
use crate::core::error::DomainError;
use crate::core::role::Role;
use crate::response::domain_response::{DomainMetrics, DomainResponse};
use crate::response::level::AgreementLevel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// Capability contract implemented by each of the seven council domains.
///
/// Evaluations are pure functions of the input text, the context snapshot,
/// and the role's static lexicon/threshold tables; `on_context_update` is
/// the only side-effecting operation.
#[async_trait]
pub trait DomainEvaluator: Send + Sync {
    /// The role this evaluator speaks for
    fn role(&self) -> Role;

    /// Static description of this domain's focus
    fn description(&self) -> &'static str {
        self.role().description()
    }

    /// Evaluate free-text input from this domain's perspective
    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError>;

    /// Judge an externally proposed recommendation against this domain's
    /// priorities and the current context
    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError>;

    /// Context-only metric snapshot, no text analysis
    fn metrics(&self, context: &EvalContext) -> DomainMetrics;

    /// Independent hazard scan; every domain may emit concerns, not only
    /// the safety domain
    fn safety_concerns(&self, recommendation: &str, context: &EvalContext) -> Vec<String>;

    /// Record that fresh context was observed; side effect only
    fn on_context_update(&self, context: &EvalContext);

    /// When this evaluator last observed a context update
    fn last_updated(&self) -> Option<DateTime<Utc>>;
}

/// Tracks when an evaluator last saw a context update.
///
/// Interior mutability so evaluators can be shared as `Arc<dyn _>` across
/// concurrently spawned evaluation tasks.
#[derive(Debug, Default)]
pub struct UpdateStamp(Mutex<Option<DateTime<Utc>>>);

impl UpdateStamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&self) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = Some(Utc::now());
        }
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.0.lock().ok().and_then(|guard| *guard)
    }
}

/// Construct the full production bench: one evaluator per role.
pub fn default_bench() -> Vec<Arc<dyn DomainEvaluator>> {
    vec![
        Arc::new(mind::MindEvaluator::new()),
        Arc::new(body::BodyEvaluator::new()),
        Arc::new(fuel::FuelEvaluator::new()),
        Arc::new(rest::RestEvaluator::new()),
        Arc::new(belong::BelongEvaluator::new()),
        Arc::new(safety::SafetyEvaluator::new()),
        Arc::new(purpose::PurposeEvaluator::new()),
    ]
}
