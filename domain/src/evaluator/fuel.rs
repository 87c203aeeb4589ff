//! Fuel domain - nutrition and resources.
//!
//! Scores nutrition need, resource availability, hydration, and energy
//! optimization from the input text and context.

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

const HUNGER: TermSet = TermSet::new(&["hungry", "starving", "appetite", "food", "eat"], 0.2);
const NUTRITION: TermSet =
    TermSet::new(&["protein", "vitamins", "nutrients", "healthy", "balanced"], 0.15);
const DEHYDRATION: TermSet =
    TermSet::new(&["thirsty", "dehydrated", "water", "drink", "hydrate"], 0.25);
const ENERGY_FOOD: TermSet = TermSet::new(&["energy", "fuel", "sustaining", "nourishing"], 0.15);

/// Resource-constraint term groups; each hit depresses availability
const RESOURCE_CONSTRAINTS: &[TermSet] = &[
    TermSet::new(&["money", "cost", "budget", "expensive", "afford"], 0.1),
    TermSet::new(&["time", "schedule", "busy", "rushed", "deadline"], 0.1),
    TermSet::new(&["energy", "tired", "drained", "exhausted", "fatigue"], 0.1),
    TermSet::new(&["supplies", "materials", "resources", "equipment", "tools"], 0.1),
];

pub struct FuelEvaluator {
    stamp: UpdateStamp,
}

impl FuelEvaluator {
    pub fn new() -> Self {
        Self {
            stamp: UpdateStamp::new(),
        }
    }

    fn assess_nutrition_need(&self, text: &str, context: &EvalContext) -> f64 {
        let score = HUNGER.score(text) + NUTRITION.score(text);
        clamp01(blend(score, context, "nutrition_need"))
    }

    fn assess_resource_availability(&self, text: &str, context: &EvalContext) -> f64 {
        let mut score = 0.5;
        for set in RESOURCE_CONSTRAINTS {
            score -= set.score(text);
        }
        clamp01(blend(score, context, "resource_availability"))
    }

    fn assess_hydration_need(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(DEHYDRATION.score(text), context, "hydration_need"))
    }

    fn assess_energy_optimization(&self, text: &str, context: &EvalContext) -> f64 {
        clamp01(blend(ENERGY_FOOD.score(text), context, "energy_optimization"))
    }

    fn recommendation(
        &self,
        nutrition: f64,
        resources: f64,
        hydration: f64,
        energy_opt: f64,
    ) -> &'static str {
        if hydration > 0.7 {
            "Prioritize hydration - drink water or electrolyte-rich fluids"
        } else if nutrition > 0.6 {
            "Consider having a balanced meal or nutritious snack"
        } else if resources < 0.3 {
            "Focus on resource conservation and efficient use of available resources"
        } else if energy_opt > 0.5 {
            "Consider energy-rich foods to support your current activities"
        } else {
            "Your fuel and resource needs appear balanced"
        }
    }

    fn alternatives(
        &self,
        nutrition: f64,
        resources: f64,
        hydration: f64,
        energy_opt: f64,
    ) -> Vec<String> {
        let mut alternatives = Vec::new();

        if hydration > 0.6 {
            alternatives.push("Have a glass of water".to_string());
            alternatives.push("Try herbal tea or electrolyte drink".to_string());
        }
        if nutrition > 0.5 {
            alternatives.push("Have a protein-rich snack".to_string());
            alternatives.push("Consider a balanced meal".to_string());
        }
        if resources < 0.4 {
            alternatives.push("Prioritize essential resource use".to_string());
            alternatives.push("Look for cost-effective alternatives".to_string());
        }
        if energy_opt > 0.5 {
            alternatives.push("Include complex carbohydrates in your meal".to_string());
            alternatives.push("Consider energy-boosting foods".to_string());
        }

        alternatives
    }

    fn reasoning(&self, nutrition: f64, resources: f64, hydration: f64, energy_opt: f64) -> String {
        let mut reasons = Vec::new();

        if hydration > 0.6 {
            reasons.push(format!("Hydration need detected ({:.1}%)", hydration * 100.0));
        }
        if nutrition > 0.5 {
            reasons.push(format!("Nutrition need identified ({:.1}%)", nutrition * 100.0));
        }
        if resources < 0.4 {
            reasons.push(format!(
                "Resource constraint detected ({:.1}%)",
                resources * 100.0
            ));
        }
        if energy_opt > 0.5 {
            reasons.push(format!(
                "Energy optimization needed ({:.1}%)",
                energy_opt * 100.0
            ));
        }

        if reasons.is_empty() {
            "Fuel domain analysis: Fuel and resource needs appear balanced".to_string()
        } else {
            format!("Fuel domain analysis: {}", reasons.join("; "))
        }
    }

    fn confidence(&self, nutrition: f64, resources: f64, hydration: f64, energy_opt: f64) -> f64 {
        let indicators = [
            nutrition > 0.5,
            hydration > 0.6,
            resources < 0.4,
            energy_opt > 0.5,
        ]
        .iter()
        .filter(|flag| **flag)
        .count();
        (0.5 + indicators as f64 * 0.12).min(1.0)
    }
}

impl Default for FuelEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainEvaluator for FuelEvaluator {
    fn role(&self) -> Role {
        Role::Fuel
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvalContext,
    ) -> Result<DomainResponse, DomainError> {
        let text = input.to_lowercase();

        let nutrition = self.assess_nutrition_need(&text, context);
        let resources = self.assess_resource_availability(&text, context);
        let hydration = self.assess_hydration_need(&text, context);
        let energy_opt = self.assess_energy_optimization(&text, context);

        let recommendation = self.recommendation(nutrition, resources, hydration, energy_opt);
        let dominant = max_feature(&[nutrition, hydration, energy_opt, 1.0 - resources]);
        let agreement = level_for_score(dominant);
        let confidence = self.confidence(nutrition, resources, hydration, energy_opt);

        let metrics = DomainMetrics::new(Role::Fuel, confidence, dominant, 0.6, 0.9)
            .with_meta("nutrition_need", nutrition)
            .with_meta("resource_availability", resources)
            .with_meta("hydration_need", hydration)
            .with_meta("energy_optimization", energy_opt);

        Ok(DomainResponse::new(
            Role::Fuel,
            recommendation,
            self.reasoning(nutrition, resources, hydration, energy_opt),
            agreement,
            metrics,
        )
        .with_alternatives(self.alternatives(nutrition, resources, hydration, energy_opt))
        .with_safety_concerns(self.safety_concerns(recommendation, context))
        .with_confidence(confidence))
    }

    async fn evaluate_candidate(
        &self,
        recommendation: &str,
        context: &EvalContext,
    ) -> Result<AgreementLevel, DomainError> {
        let text = recommendation.to_lowercase();

        let addresses_nutrition = contains_any(&text, &["eat", "food", "nutrition", "meal"]);
        let addresses_hydration = contains_any(&text, &["drink", "water", "hydrate", "fluid"]);
        let addresses_resources = contains_any(&text, &["resource", "budget", "time", "energy"]);

        let nutrition = context.metric_or("nutrition_need", 0.5);
        let hydration = context.metric_or("hydration_need", 0.5);
        let resources = context.metric_or("resource_availability", 0.5);

        let level = if addresses_nutrition && nutrition > 0.6 {
            AgreementLevel::Agreement
        } else if addresses_hydration && hydration > 0.7 {
            AgreementLevel::Agreement
        } else if addresses_resources && resources < 0.4 {
            AgreementLevel::Agreement
        } else {
            AgreementLevel::Neutral
        };

        Ok(level)
    }

    fn metrics(&self, context: &EvalContext) -> DomainMetrics {
        let nutrition = context.metric_or("nutrition_need", 0.5);
        let hydration = context.metric_or("hydration_need", 0.5);
        let resources = context.metric_or("resource_availability", 0.5);

        DomainMetrics::new(
            Role::Fuel,
            0.8,
            max_feature(&[nutrition, hydration, 1.0 - resources]),
            0.6,
            0.9,
        )
        .with_meta("nutrition_need", nutrition)
        .with_meta("hydration_need", hydration)
        .with_meta("resource_availability", resources)
    }

    fn safety_concerns(&self, recommendation: &str, context: &EvalContext) -> Vec<String> {
        let text = recommendation.to_lowercase();
        let mut concerns = Vec::new();

        let extreme_diet = ["fast", "starve", "extreme diet", "no food"];
        if contains_any(&text, &extreme_diet) {
            concerns.push("Extreme dietary restriction may be harmful".to_string());
        }

        if context.metric_or("resource_availability", 0.5) < 0.2 {
            concerns.push("Very low resource availability - may cause stress".to_string());
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
    async fn test_hydration_dominates_recommendation() {
        let evaluator = FuelEvaluator::new();
        let ctx = EvalContext::new().with("hydration_need", 0.9);

        let response = evaluator
            .evaluate("So thirsty, I need to drink some water", &ctx)
            .await
            .unwrap();

        assert_eq!(
            response.recommendation,
            "Prioritize hydration - drink water or electrolyte-rich fluids"
        );
        assert!(response.agreement.is_positive());
        assert!(response.alternatives.contains(&"Have a glass of water".to_string()));
    }

    #[tokio::test]
    async fn test_resource_constraints_depress_availability() {
        let evaluator = FuelEvaluator::new();
        let ctx = EvalContext::new();

        let response = evaluator
            .evaluate("No budget, no time, low supplies before the deadline", &ctx)
            .await
            .unwrap();

        assert_eq!(
            response.recommendation,
            "Focus on resource conservation and efficient use of available resources"
        );
    }

    #[tokio::test]
    async fn test_candidate_meal_agrees_when_hungry() {
        let evaluator = FuelEvaluator::new();
        let ctx = EvalContext::new().with("nutrition_need", 0.7);

        let level = evaluator
            .evaluate_candidate("Have a proper meal before the meeting", &ctx)
            .await
            .unwrap();
        assert_eq!(level, AgreementLevel::Agreement);
    }

    #[test]
    fn test_extreme_diet_recommendation_is_flagged() {
        let evaluator = FuelEvaluator::new();
        let concerns =
            evaluator.safety_concerns("Just starve it off until Friday", &EvalContext::new());
        assert!(!concerns.is_empty());
    }
}
