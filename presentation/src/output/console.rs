//! Console output formatter for council results

use colored::Colorize;
use council_application::CouncilStatus;
use council_domain::{AgreementLevel, CouncilRecommendation, Role};
use std::collections::BTreeMap;

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Enable or disable colored output globally
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Format the complete recommendation with all sections
    pub fn format(result: &CouncilRecommendation) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Recommendation"));
        output.push('\n');

        if result.consensus.is_veto() {
            output.push_str(&format!("{}\n\n", "SAFETY OVERRIDE IN EFFECT".red().bold()));
        }

        output.push_str(&format!(
            "{} {}\n\n",
            "Recommendation:".cyan().bold(),
            result.recommendation
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Reasoning:".cyan().bold(),
            result.reasoning
        ));
        output.push_str(&format!(
            "{} {}    {} {:.1}%\n",
            "Consensus:".cyan().bold(),
            result.consensus,
            "Confidence:".cyan().bold(),
            result.confidence * 100.0
        ));

        if !result.alternatives.is_empty() {
            output.push_str(&Self::section_header("Alternative Options"));
            for (i, alternative) in result.alternatives.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, alternative));
            }
        }

        if !result.safety_concerns.is_empty() {
            output.push_str(&Self::section_header("Safety Concerns"));
            for concern in &result.safety_concerns {
                output.push_str(&format!("  {} {}\n", "!".red().bold(), concern));
            }
        }

        output.push_str(&Self::section_header("Domain Insights"));
        for (role, insight) in &result.domain_insights {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:>8}:", role.as_str()).yellow().bold(),
                insight
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format only the recommendation and reasoning (concise output)
    pub fn format_summary(result: &CouncilRecommendation) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Council Recommendation ===".cyan().bold()
        ));
        output.push_str(&format!("{}\n\n", result.recommendation));
        output.push_str(&format!("{} {}\n", "Why:".dimmed(), result.reasoning));
        output.push_str(&format!(
            "{} {} ({:.1}% confidence)\n",
            "Consensus:".dimmed(),
            result.consensus,
            result.confidence * 100.0
        ));

        if !result.safety_concerns.is_empty() {
            output.push('\n');
            for concern in &result.safety_concerns {
                output.push_str(&format!("{} {}\n", "!".red().bold(), concern));
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(result: &CouncilRecommendation) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a candidate evaluation: one agreement level per role
    pub fn format_candidate(levels: &BTreeMap<Role, AgreementLevel>) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Candidate Evaluation ===".cyan().bold()
        ));
        for (role, level) in levels {
            let rendered = match level {
                AgreementLevel::StrongAgreement | AgreementLevel::Agreement => {
                    level.to_string().green()
                }
                AgreementLevel::Neutral => level.to_string().normal(),
                AgreementLevel::Disagreement | AgreementLevel::StrongDisagreement => {
                    level.to_string().yellow()
                }
                AgreementLevel::SafetyBlock => level.to_string().red().bold(),
            };
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:>8}:", role.as_str()).yellow().bold(),
                rendered
            ));
        }

        output
    }

    /// Format the council status snapshot
    pub fn format_status(status: &CouncilStatus) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Council Status ===".cyan().bold()));
        output.push_str(&format!(
            "{} {}\n",
            "Rounds completed:".cyan().bold(),
            status.rounds_completed
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Last round:".cyan().bold(),
            status
                .last_round_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string())
        ));

        output.push_str(&Self::section_header("Domains"));
        for (role, description) in &status.domains {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:>8}:", role.as_str()).yellow().bold(),
                description
            ));
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
