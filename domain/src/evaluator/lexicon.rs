//! Weighted term-set scoring shared by the seven evaluators.
//!
//! Each domain derives its feature scores the same way: count matches from
//! a static term table in the lowercased input, weight the count by a fixed
//! per-category increment, blend with any same-named context value via
//! arithmetic mean, and clamp into `[0, 1]`.

use crate::core::context::EvalContext;
use crate::response::level::AgreementLevel;

/// A static lexicon category: a list of indicator terms and the score
/// increment contributed by each match.
#[derive(Debug, Clone, Copy)]
pub struct TermSet {
    pub terms: &'static [&'static str],
    pub weight: f64,
}

impl TermSet {
    pub const fn new(terms: &'static [&'static str], weight: f64) -> Self {
        Self { terms, weight }
    }

    /// Number of terms from this set present in `text`.
    ///
    /// `text` is expected to be lowercased already; terms may be multi-word
    /// phrases and are matched by substring.
    pub fn hits(&self, text: &str) -> usize {
        self.terms.iter().filter(|term| text.contains(*term)).count()
    }

    /// Weighted contribution of this set to a feature score
    pub fn score(&self, text: &str) -> f64 {
        self.hits(text) as f64 * self.weight
    }

    /// The terms from this set present in `text`
    pub fn matches(&self, text: &str) -> Vec<&'static str> {
        self.terms
            .iter()
            .filter(|term| text.contains(*term))
            .copied()
            .collect()
    }
}

/// Blend a lexical score with the same-named context value, when present,
/// via arithmetic mean.
pub fn blend(score: f64, context: &EvalContext, key: &str) -> f64 {
    match context.metric(key) {
        Some(value) => (score + value) / 2.0,
        None => score,
    }
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Map the dominant feature score to an agreement level.
///
/// The cascade only ever yields strong_agreement / agreement / neutral:
/// domains state intensity of need when scoring raw input, never
/// opposition. Disagreement values arise solely from candidate evaluation.
pub fn level_for_score(max_feature: f64) -> AgreementLevel {
    if max_feature > 0.8 {
        AgreementLevel::StrongAgreement
    } else if max_feature > 0.6 {
        AgreementLevel::Agreement
    } else {
        AgreementLevel::Neutral
    }
}

/// Check whether any of `words` appears in `text`
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// Largest of a slice of feature scores
pub fn max_feature(features: &[f64]) -> f64 {
    features.iter().copied().fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIN: TermSet = TermSet::new(&["pain", "ache", "sore"], 0.2);

    #[test]
    fn test_hits_counts_distinct_terms() {
        assert_eq!(PAIN.hits("my back is sore and the ache won't stop"), 2);
        assert_eq!(PAIN.hits("feeling great"), 0);
    }

    #[test]
    fn test_score_weights_hits() {
        assert_eq!(PAIN.score("pain and more pain, plus an ache"), 0.4);
    }

    #[test]
    fn test_blend_averages_when_present() {
        let ctx = EvalContext::new().with("pain_level", 0.6);
        assert_eq!(blend(0.2, &ctx, "pain_level"), 0.4);
        assert_eq!(blend(0.2, &ctx, "missing_key"), 0.2);
    }

    #[test]
    fn test_level_cascade_never_disagrees() {
        assert_eq!(level_for_score(0.9), AgreementLevel::StrongAgreement);
        assert_eq!(level_for_score(0.8), AgreementLevel::Agreement);
        assert_eq!(level_for_score(0.7), AgreementLevel::Agreement);
        assert_eq!(level_for_score(0.5), AgreementLevel::Neutral);
        assert_eq!(level_for_score(0.1), AgreementLevel::Neutral);
    }

    #[test]
    fn test_max_feature() {
        assert_eq!(max_feature(&[0.2, 0.8, 0.5]), 0.8);
        assert_eq!(max_feature(&[]), 0.0);
    }
}
