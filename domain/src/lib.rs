//! Domain layer for wellbeing-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! Seven specialized domains (mind, body, fuel, rest, belong, safety,
//! purpose) each score a piece of free-text input against a shared numeric
//! context and return an independent verdict. The safety domain holds
//! unconditional veto power over the others.
//!
//! ## Consensus
//!
//! A weighted aggregation turns the seven verdicts into one overall
//! agreement bucket plus a list of detected conflicts; a synthesizer then
//! assembles the bucket and the per-domain verdicts into one final
//! recommendation.

pub mod consensus;
pub mod core;
pub mod evaluator;
pub mod response;
pub mod synthesis;

// Re-export commonly used types
pub use consensus::{ConsensusEngine, ConsensusResult, role_weight};
pub use self::core::{
    context::{ContextValue, EvalContext},
    error::DomainError,
    role::Role,
};
pub use evaluator::{
    DomainEvaluator, default_bench,
    belong::BelongEvaluator,
    body::BodyEvaluator,
    fuel::FuelEvaluator,
    mind::MindEvaluator,
    purpose::PurposeEvaluator,
    rest::RestEvaluator,
    safety::SafetyEvaluator,
};
pub use response::{
    domain_response::{DomainMetrics, DomainResponse},
    level::AgreementLevel,
};
pub use synthesis::{CouncilRecommendation, Synthesizer, role_priority};
