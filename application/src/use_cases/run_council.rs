//! Council orchestrator use case.
//!
//! Runs one evaluation round per call: broadcasts the context snapshot to
//! all seven domains, fans their evaluations out concurrently, joins on a
//! barrier, applies the safety veto short-circuit, and forwards surviving
//! rounds to consensus and synthesis. A failing domain is replaced with a
//! deterministic fallback at the call site; it never cancels its siblings
//! and nothing escalates past this boundary.

use crate::ports::progress::{CouncilProgress, NoProgress};
use chrono::{DateTime, Utc};
use council_domain::{
    AgreementLevel, ConsensusEngine, CouncilRecommendation, DomainEvaluator, DomainMetrics,
    DomainResponse, EvalContext, Role, Synthesizer, default_bench,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Read-only snapshot of the orchestrator's state
#[derive(Debug, Clone)]
pub struct CouncilStatus {
    pub rounds_completed: u64,
    pub last_round_at: Option<DateTime<Utc>>,
    /// Static description per role
    pub domains: BTreeMap<Role, &'static str>,
}

/// The council orchestrator.
///
/// Owns the seven evaluators exclusively, plus a round counter and the
/// timestamp of the last completed round. Constructed once at process
/// start; rounds are sequential per instance (`&mut self`), so the
/// counter has a single writer and is only updated after the barrier.
pub struct Council {
    evaluators: Vec<Arc<dyn DomainEvaluator>>,
    consensus: ConsensusEngine,
    synthesizer: Synthesizer,
    rounds_completed: u64,
    last_round_at: Option<DateTime<Utc>>,
}

impl Council {
    pub fn new(evaluators: Vec<Arc<dyn DomainEvaluator>>) -> Self {
        Self {
            evaluators,
            consensus: ConsensusEngine::new(),
            synthesizer: Synthesizer::new(),
            rounds_completed: 0,
            last_round_at: None,
        }
    }

    /// Council with the full production bench of seven domains
    pub fn with_default_bench() -> Self {
        Self::new(default_bench())
    }

    /// Run one round without progress reporting
    pub async fn recommend(&mut self, input: &str, context: &EvalContext) -> CouncilRecommendation {
        self.recommend_with_progress(input, context, &NoProgress).await
    }

    /// Run one round with progress callbacks.
    ///
    /// Always produces a recommendation: in the worst case of multiple
    /// domain failures the caller still receives a low-confidence,
    /// generically worded result rather than an error.
    pub async fn recommend_with_progress(
        &mut self,
        input: &str,
        context: &EvalContext,
        progress: &dyn CouncilProgress,
    ) -> CouncilRecommendation {
        info!("Starting council round with {} domains", self.evaluators.len());

        for evaluator in &self.evaluators {
            evaluator.on_context_update(context);
        }

        let responses = self.evaluate_all(input, context, progress).await;

        // Safety veto short-circuits aggregation and synthesis entirely:
        // no other domain's content may appear in a vetoed round's output.
        if let Some(safety) = responses.get(&Role::Safety) {
            if safety.is_veto() {
                info!("Safety domain vetoed the round");
                let recommendation = CouncilRecommendation::vetoed(safety);
                self.finish_round();
                return recommendation;
            }
        }

        let consensus = self.consensus.aggregate(&responses);
        debug!(
            "Consensus bucket {} with {} conflicts",
            consensus.overall,
            consensus.conflicts.len()
        );

        let recommendation = self.synthesizer.synthesize(&responses, &consensus);
        self.finish_round();
        recommendation
    }

    /// Fan out `evaluate` across all domains and join on a barrier.
    ///
    /// Every dispatched role comes back with a response: failures and lost
    /// tasks are substituted with fallbacks after the join.
    async fn evaluate_all(
        &self,
        input: &str,
        context: &EvalContext,
        progress: &dyn CouncilProgress,
    ) -> BTreeMap<Role, DomainResponse> {
        let dispatched: Vec<Role> = self.evaluators.iter().map(|e| e.role()).collect();
        progress.on_round_start(dispatched.len());

        let mut join_set = JoinSet::new();

        for evaluator in &self.evaluators {
            let evaluator = Arc::clone(evaluator);
            let input = input.to_string();
            let context = context.clone();

            join_set.spawn(async move {
                let role = evaluator.role();
                (role, evaluator.evaluate(&input, &context).await)
            });
        }

        let mut responses = BTreeMap::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((role, Ok(response))) => {
                    debug!("{} domain evaluated successfully", role);
                    progress.on_role_complete(role, true);
                    responses.insert(role, response);
                }
                Ok((role, Err(e))) => {
                    warn!("{} domain failed, substituting fallback: {}", role, e);
                    progress.on_role_complete(role, false);
                    responses.insert(role, DomainResponse::fallback(role));
                }
                Err(e) => {
                    warn!("Evaluation task join error: {}", e);
                }
            }
        }

        // A panicked task loses its role in the join error; backfill so
        // the round always carries one response per dispatched domain.
        for role in dispatched {
            if !responses.contains_key(&role) {
                warn!("{} domain never reported, substituting fallback", role);
                responses.insert(role, DomainResponse::fallback(role));
            }
        }

        progress.on_round_complete();
        responses
    }

    /// Judge an externally proposed recommendation through all domains.
    ///
    /// Same fan-out/fallback pattern; a failing domain degrades to
    /// `Neutral` rather than aborting.
    pub async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> BTreeMap<Role, AgreementLevel> {
        let dispatched: Vec<Role> = self.evaluators.iter().map(|e| e.role()).collect();
        let mut join_set = JoinSet::new();

        for evaluator in &self.evaluators {
            let evaluator = Arc::clone(evaluator);
            let recommendation = recommendation.to_string();
            let context = context.clone();

            join_set.spawn(async move {
                let role = evaluator.role();
                (role, evaluator.evaluate_candidate(&recommendation, &context).await)
            });
        }

        let mut levels = BTreeMap::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((role, Ok(level))) => {
                    levels.insert(role, level);
                }
                Ok((role, Err(e))) => {
                    warn!("{} domain candidate evaluation failed: {}", role, e);
                    levels.insert(role, AgreementLevel::Neutral);
                }
                Err(e) => {
                    warn!("Candidate evaluation task join error: {}", e);
                }
            }
        }

        for role in dispatched {
            levels.entry(role).or_insert(AgreementLevel::Neutral);
        }

        levels
    }

    /// Context-only metric snapshot from every domain, no text analysis
    pub fn domain_metrics(&self, context: &EvalContext) -> BTreeMap<Role, DomainMetrics> {
        self.evaluators
            .iter()
            .map(|e| (e.role(), e.metrics(context)))
            .collect()
    }

    /// Read-only status snapshot; no side effects
    pub fn status(&self) -> CouncilStatus {
        CouncilStatus {
            rounds_completed: self.rounds_completed,
            last_round_at: self.last_round_at,
            domains: self
                .evaluators
                .iter()
                .map(|e| (e.role(), e.description()))
                .collect(),
        }
    }

    /// Single-writer state update, performed once after the barrier
    fn finish_round(&mut self) {
        self.rounds_completed += 1;
        self.last_round_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{DomainError, DomainMetrics};

    /// Evaluator whose calls always fail, for fallback-isolation tests
    struct FailingEvaluator {
        role: Role,
    }

    #[async_trait]
    impl DomainEvaluator for FailingEvaluator {
        fn role(&self) -> Role {
            self.role
        }

        async fn evaluate(
            &self,
            _input: &str,
            _context: &EvalContext,
        ) -> Result<DomainResponse, DomainError> {
            Err(DomainError::evaluation(self.role, "synthetic failure"))
        }

        async fn evaluate_candidate(
            &self,
            _recommendation: &str,
            _context: &EvalContext,
        ) -> Result<AgreementLevel, DomainError> {
            Err(DomainError::evaluation(self.role, "synthetic failure"))
        }

        fn metrics(&self, _context: &EvalContext) -> DomainMetrics {
            DomainMetrics::new(self.role, 0.0, 0.0, 0.5, 0.0)
        }

        fn safety_concerns(&self, _recommendation: &str, _context: &EvalContext) -> Vec<String> {
            Vec::new()
        }

        fn on_context_update(&self, _context: &EvalContext) {}

        fn last_updated(&self) -> Option<DateTime<Utc>> {
            None
        }
    }

    /// Evaluator with fixed output, for veto-supremacy tests
    struct FixedEvaluator {
        role: Role,
        level: AgreementLevel,
    }

    #[async_trait]
    impl DomainEvaluator for FixedEvaluator {
        fn role(&self) -> Role {
            self.role
        }

        async fn evaluate(
            &self,
            _input: &str,
            _context: &EvalContext,
        ) -> Result<DomainResponse, DomainError> {
            let metrics = DomainMetrics::new(self.role, 0.9, 0.9, 1.0, 0.9);
            Ok(DomainResponse::new(
                self.role,
                format!("{} says act", self.role),
                format!("{} reasons", self.role),
                self.level,
                metrics,
            )
            .with_alternatives(vec![format!("{} alternative", self.role)])
            .with_safety_concerns(vec![format!("{} concern", self.role)])
            .with_confidence(0.9))
        }

        async fn evaluate_candidate(
            &self,
            _recommendation: &str,
            _context: &EvalContext,
        ) -> Result<AgreementLevel, DomainError> {
            Ok(self.level)
        }

        fn metrics(&self, _context: &EvalContext) -> DomainMetrics {
            DomainMetrics::new(self.role, 0.9, 0.9, 1.0, 0.9)
        }

        fn safety_concerns(&self, _recommendation: &str, _context: &EvalContext) -> Vec<String> {
            Vec::new()
        }

        fn on_context_update(&self, _context: &EvalContext) {}

        fn last_updated(&self) -> Option<DateTime<Utc>> {
            None
        }
    }

    fn neutral_context() -> EvalContext {
        let keys = [
            "cognitive_load",
            "stress_level",
            "mental_fatigue",
            "energy_level",
            "pain_level",
            "movement_level",
            "medical_concern",
            "nutrition_need",
            "hydration_need",
            "resource_availability",
            "energy_optimization",
            "sleep_pressure",
            "recovery_need",
            "isolation_level",
            "connection_need",
            "meaning_drift",
            "goal_focus",
            "risk_level",
            "crisis_level",
            "boundary_concern",
            "stability_level",
        ];
        let mut ctx = EvalContext::new();
        for key in keys {
            ctx.set(key, 0.5);
        }
        ctx
    }

    #[tokio::test]
    async fn test_neutral_round_emits_generic_message() {
        let mut council = Council::with_default_bench();

        let result = council
            .recommend("Wondering what to do this afternoon", &neutral_context())
            .await;

        assert_eq!(result.consensus, AgreementLevel::Neutral);
        assert_eq!(
            result.recommendation,
            "Consider your current needs and choose what feels right for you"
        );
        assert_eq!(result.domain_insights.len(), 7);
    }

    #[tokio::test]
    async fn test_crisis_round_is_vetoed_with_safety_content_only() {
        let mut council = Council::with_default_bench();
        let ctx = neutral_context().with("crisis_level", 0.9);

        let result = council
            .recommend("This is an emergency, I feel desperate and in crisis", &ctx)
            .await;

        assert_eq!(result.consensus, AgreementLevel::SafetyBlock);
        assert!(result.reasoning.starts_with("SAFETY BLOCK:"));
        assert!(result
            .safety_concerns
            .iter()
            .any(|c| c.starts_with("CRISIS")));
        // the recommendation is safety's own text, not any other domain's
        assert!(result.recommendation.contains("crisis"));
        assert_eq!(result.domain_insights.len(), 7);
        assert!(!result.domain_insights[&Role::Mind].contains("Mind domain analysis"));
    }

    #[tokio::test]
    async fn test_veto_supremacy_over_agreeing_domains() {
        let mut evaluators: Vec<Arc<dyn DomainEvaluator>> = Role::all()
            .iter()
            .filter(|role| !role.is_safety())
            .map(|role| {
                Arc::new(FixedEvaluator {
                    role: *role,
                    level: AgreementLevel::StrongAgreement,
                }) as Arc<dyn DomainEvaluator>
            })
            .collect();
        evaluators.push(Arc::new(FixedEvaluator {
            role: Role::Safety,
            level: AgreementLevel::SafetyBlock,
        }));

        let mut council = Council::new(evaluators);
        let result = council.recommend("anything", &EvalContext::new()).await;

        assert_eq!(result.consensus, AgreementLevel::SafetyBlock);
        assert_eq!(result.recommendation, "safety says act");
        assert_eq!(result.alternatives, vec!["safety alternative".to_string()]);
        assert_eq!(result.safety_concerns, vec!["safety concern".to_string()]);
        // none of the other six domains' content leaks into the output
        for role in Role::all().iter().filter(|r| !r.is_safety()) {
            assert!(!result.recommendation.contains(role.as_str()));
            assert!(!result.domain_insights[role].contains("reasons"));
        }
    }

    #[tokio::test]
    async fn test_single_failure_degrades_to_fallback() {
        let mut evaluators = default_bench();
        evaluators.retain(|e| e.role() != Role::Mind);
        evaluators.push(Arc::new(FailingEvaluator { role: Role::Mind }));

        let mut council = Council::new(evaluators);
        let result = council
            .recommend("Quiet afternoon", &neutral_context())
            .await;

        assert_eq!(result.domain_insights.len(), 7);
        assert_eq!(
            result.domain_insights[&Role::Mind],
            "Technical issue in domain evaluation"
        );
        assert_ne!(result.consensus, AgreementLevel::SafetyBlock);
    }

    #[tokio::test]
    async fn test_all_failures_still_produce_a_recommendation() {
        let evaluators: Vec<Arc<dyn DomainEvaluator>> = Role::all()
            .iter()
            .map(|role| Arc::new(FailingEvaluator { role: *role }) as Arc<dyn DomainEvaluator>)
            .collect();

        let mut council = Council::new(evaluators);
        let result = council.recommend("anything", &EvalContext::new()).await;

        // seven neutral fallbacks: neutral bucket, generic message
        assert_eq!(result.consensus, AgreementLevel::Neutral);
        assert_eq!(result.domain_insights.len(), 7);
        assert_eq!(
            result.recommendation,
            "Consider your current needs and choose what feels right for you"
        );
    }

    #[tokio::test]
    async fn test_round_counter_advances_after_each_round() {
        let mut council = Council::with_default_bench();
        assert_eq!(council.status().rounds_completed, 0);
        assert!(council.status().last_round_at.is_none());

        council.recommend("first", &EvalContext::new()).await;
        council.recommend("second", &EvalContext::new()).await;

        let status = council.status();
        assert_eq!(status.rounds_completed, 2);
        assert!(status.last_round_at.is_some());
        assert_eq!(status.domains.len(), 7);
    }

    #[tokio::test]
    async fn test_candidate_evaluation_covers_all_roles() {
        let council = Council::with_default_bench();
        let ctx = neutral_context().with("mental_fatigue", 0.7);

        let levels = council
            .evaluate_candidate("Take a rest break this afternoon", &ctx)
            .await;

        assert_eq!(levels.len(), 7);
        assert_eq!(levels[&Role::Mind], AgreementLevel::Agreement);
    }

    #[test]
    fn test_domain_metrics_cover_all_roles() {
        let council = Council::with_default_bench();
        let ctx = EvalContext::new().with("pain_level", 0.9).with("crisis_level", 0.2);

        let metrics = council.domain_metrics(&ctx);

        assert_eq!(metrics.len(), 7);
        // body urgency is driven by the elevated pain level
        assert!(metrics[&Role::Body].urgency >= 0.9);
        assert_eq!(metrics[&Role::Safety].impact, 1.0);
    }

    #[tokio::test]
    async fn test_candidate_failure_degrades_to_neutral() {
        let mut evaluators = default_bench();
        evaluators.retain(|e| e.role() != Role::Body);
        evaluators.push(Arc::new(FailingEvaluator { role: Role::Body }));

        let council = Council::new(evaluators);
        let levels = council
            .evaluate_candidate("anything at all", &EvalContext::new())
            .await;

        assert_eq!(levels[&Role::Body], AgreementLevel::Neutral);
        assert_eq!(levels.len(), 7);
    }
}
