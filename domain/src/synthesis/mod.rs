//! Synthesis of the final council recommendation.
//!
//! A fixed table maps each consensus bucket to an assembly strategy; the
//! mapping is an exhaustive `match` so a new bucket cannot silently fall
//! through at runtime. Cross-cutting helpers (alternative collection,
//! concern collection, per-role insights) apply regardless of bucket.

use crate::consensus::ConsensusResult;
use crate::core::role::Role;
use crate::response::domain_response::DomainResponse;
use crate::response::level::AgreementLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Insight text used for non-safety roles in a vetoed round: the veto
/// output must carry all seven insight keys without exposing any other
/// role's content.
const WITHHELD_INSIGHT: &str = "Withheld: safety override in effect";

const NEUTRAL_FALLBACK_RECOMMENDATION: &str =
    "Consider your current needs and choose what feels right for you";

/// Fixed synthesis priority. Lower comes first when picking a primary
/// recommendation.
pub fn role_priority(role: Role) -> u8 {
    match role {
        Role::Safety => 1,
        Role::Mind => 2,
        Role::Body => 3,
        Role::Purpose => 4,
        Role::Belong => 5,
        Role::Rest => 6,
        Role::Fuel => 7,
    }
}

/// Final response from the council for one round.
///
/// The only externally consumed contract: downstream presentation and
/// journaling are pure consumers of this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilRecommendation {
    pub recommendation: String,
    pub reasoning: String,
    /// Deduplicated, at most five entries; attribution is not preserved
    pub alternatives: Vec<String>,
    pub consensus: AgreementLevel,
    /// One insight per role, always all seven keys
    pub domain_insights: BTreeMap<Role, String>,
    /// Deduplicated union of every role's concerns
    pub safety_concerns: Vec<String>,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl CouncilRecommendation {
    /// Build the veto output directly and exclusively from the safety
    /// role's own fields. No other role's content appears; their insight
    /// slots carry a fixed withheld marker.
    pub fn vetoed(safety: &DomainResponse) -> Self {
        let domain_insights = Role::all()
            .iter()
            .map(|role| {
                let insight = if role.is_safety() {
                    safety.reasoning.clone()
                } else {
                    WITHHELD_INSIGHT.to_string()
                };
                (*role, insight)
            })
            .collect();

        Self {
            recommendation: safety.recommendation.clone(),
            reasoning: format!("SAFETY BLOCK: {}", safety.reasoning),
            alternatives: dedup_capped(safety.alternatives.iter().cloned(), Some(5)),
            consensus: AgreementLevel::SafetyBlock,
            domain_insights,
            safety_concerns: dedup_capped(safety.safety_concerns.iter().cloned(), None),
            confidence: safety.confidence,
            timestamp: Utc::now(),
        }
    }
}

/// Assembles the seven verdicts and the consensus result into one final
/// recommendation.
#[derive(Debug, Default)]
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
    ) -> CouncilRecommendation {
        match consensus.overall {
            AgreementLevel::StrongAgreement => self.strong_agreement(responses, consensus),
            AgreementLevel::Agreement => self.agreement(responses, consensus),
            AgreementLevel::Neutral => self.neutral(responses, consensus),
            AgreementLevel::Disagreement => self.disagreement(responses, consensus),
            AgreementLevel::StrongDisagreement => self.strong_disagreement(responses, consensus),
            AgreementLevel::SafetyBlock => self.safety_block(responses),
        }
    }

    /// Strong agreement: lead with the highest-priority agreeing domain,
    /// folding the next two domains' reasoning in as support. Fewer than
    /// three qualifying domains falls back to the agreement path.
    fn strong_agreement(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
    ) -> CouncilRecommendation {
        let qualifying = positive_by_priority(responses);
        if qualifying.len() < 3 {
            return self.agreement(responses, consensus);
        }

        let supporting = insight_sentences(&qualifying[1..qualifying.len().min(3)]);
        self.assemble(
            responses,
            consensus,
            qualifying[0].recommendation.clone(),
            format!("Strong council agreement. {}", supporting.join("; ")),
        )
    }

    fn agreement(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
    ) -> CouncilRecommendation {
        let qualifying = positive_by_priority(responses);
        let Some(primary) = qualifying.first() else {
            return self.neutral(responses, consensus);
        };

        let supporting = insight_sentences(&qualifying[1..qualifying.len().min(3)]);
        self.assemble(
            responses,
            consensus,
            primary.recommendation.clone(),
            format!("Council agreement. {}", supporting.join("; ")),
        )
    }

    /// Neutral: lean on whichever domains are individually confident; with
    /// none above the bar, emit the fixed generic message.
    fn neutral(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
    ) -> CouncilRecommendation {
        let mut confident: Vec<&DomainResponse> = responses
            .values()
            .filter(|r| r.confidence > 0.6)
            .collect();
        confident.sort_by(|a, b| {
            role_priority(a.role)
                .cmp(&role_priority(b.role))
                .then(b.confidence.total_cmp(&a.confidence))
        });

        match confident.first() {
            Some(primary) => {
                let insights = insight_sentences(&confident[..confident.len().min(2)]);
                self.assemble(
                    responses,
                    consensus,
                    primary.recommendation.clone(),
                    format!("Mixed council response. {}", insights.join("; ")),
                )
            }
            None => self.assemble(
                responses,
                consensus,
                NEUTRAL_FALLBACK_RECOMMENDATION.to_string(),
                "Council domains are neutral - trust your judgment".to_string(),
            ),
        }
    }

    /// Disagreement: present up to two positive perspectives side by side;
    /// with none, fall through to the strong-disagreement template.
    fn disagreement(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
    ) -> CouncilRecommendation {
        let qualifying = positive_by_priority(responses);
        if qualifying.is_empty() {
            return self.strong_disagreement(responses, consensus);
        }

        let perspectives: Vec<String> = qualifying
            .iter()
            .take(2)
            .map(|r| format!("{}: {}", r.role, r.recommendation))
            .collect();

        self.assemble(
            responses,
            consensus,
            format!("Multiple perspectives: {}", perspectives.join("; ")),
            "Council domains have different views - consider all perspectives".to_string(),
        )
    }

    fn strong_disagreement(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
    ) -> CouncilRecommendation {
        self.assemble(
            responses,
            consensus,
            "I'm seeing conflicting needs between your domains that I'm not equipped to balance. Here's what each domain is signaling..."
                .to_string(),
            "Strong disagreement detected - presenting all perspectives for your consideration"
                .to_string(),
        )
    }

    /// Defense in depth: the orchestrator short-circuits vetoed rounds
    /// before synthesis, but a block reaching this far still resolves to
    /// the safety role's own fields.
    fn safety_block(&self, responses: &BTreeMap<Role, DomainResponse>) -> CouncilRecommendation {
        match responses.get(&Role::Safety) {
            Some(safety) => CouncilRecommendation::vetoed(safety),
            None => CouncilRecommendation {
                recommendation: "Safety concern detected".to_string(),
                reasoning: "SAFETY BLOCK: Safety domain has blocked this recommendation"
                    .to_string(),
                alternatives: Vec::new(),
                consensus: AgreementLevel::SafetyBlock,
                domain_insights: Role::all()
                    .iter()
                    .map(|role| (*role, WITHHELD_INSIGHT.to_string()))
                    .collect(),
                safety_concerns: vec!["Safety protocol triggered".to_string()],
                confidence: 0.9,
                timestamp: Utc::now(),
            },
        }
    }

    fn assemble(
        &self,
        responses: &BTreeMap<Role, DomainResponse>,
        consensus: &ConsensusResult,
        recommendation: String,
        reasoning: String,
    ) -> CouncilRecommendation {
        CouncilRecommendation {
            recommendation,
            reasoning,
            alternatives: collect_alternatives(responses),
            consensus: consensus.overall,
            domain_insights: extract_insights(responses),
            safety_concerns: collect_concerns(responses),
            confidence: consensus.confidence,
            timestamp: Utc::now(),
        }
    }
}

/// Roles at agreement-or-better, highest synthesis priority first
fn positive_by_priority(responses: &BTreeMap<Role, DomainResponse>) -> Vec<&DomainResponse> {
    let mut qualifying: Vec<&DomainResponse> = responses
        .values()
        .filter(|r| r.agreement.is_positive())
        .collect();
    qualifying.sort_by_key(|r| role_priority(r.role));
    qualifying
}

fn insight_sentences(responses: &[&DomainResponse]) -> Vec<String> {
    responses
        .iter()
        .map(|r| format!("{}: {}", r.role, r.reasoning))
        .collect()
}

/// Union of all domains' alternatives, deduplicated, truncated to five.
/// Attribution to the originating role is not preserved.
fn collect_alternatives(responses: &BTreeMap<Role, DomainResponse>) -> Vec<String> {
    dedup_capped(
        responses.values().flat_map(|r| r.alternatives.iter().cloned()),
        Some(5),
    )
}

/// Union of all domains' concerns, deduplicated, untruncated
fn collect_concerns(responses: &BTreeMap<Role, DomainResponse>) -> Vec<String> {
    dedup_capped(
        responses.values().flat_map(|r| r.safety_concerns.iter().cloned()),
        None,
    )
}

/// Verbatim reasoning per role, one entry per response
fn extract_insights(responses: &BTreeMap<Role, DomainResponse>) -> BTreeMap<Role, String> {
    responses
        .iter()
        .map(|(role, r)| (*role, r.reasoning.clone()))
        .collect()
}

/// Deduplicate preserving first-seen order, optionally capped. Iteration
/// order over role-keyed maps is fixed, so output is deterministic.
fn dedup_capped(items: impl Iterator<Item = String>, cap: Option<usize>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<String> = items.filter(|item| seen.insert(item.clone())).collect();
    if let Some(cap) = cap {
        unique.truncate(cap);
    }
    unique
}
