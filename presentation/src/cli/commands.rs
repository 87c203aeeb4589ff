//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::{ContextValue, EvalContext};
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with insights, alternatives, and concerns
    Full,
    /// Only the recommendation and reasoning
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for wellbeing-council
#[derive(Parser, Debug)]
#[command(name = "wellbeing-council")]
#[command(version, about = "Seven-domain council - independent evaluators reach a weighted consensus")]
#[command(long_about = r#"
wellbeing-council runs your input through seven specialized domains (mind,
body, fuel, rest, belong, safety, purpose). Each domain scores the input
against the shared context; a weighted consensus and a synthesis stage turn
the seven verdicts into one recommendation. The safety domain can veto the
round outright.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/wellbeing-council/config.toml   Global config

Example:
  wellbeing-council "I'm exhausted but need to finish this project" \
      -c energy_level=0.3 -c stress_level=0.8
  wellbeing-council --candidate "Take a rest break" -c mental_fatigue=0.8
  wellbeing-council --status
"#)]
pub struct Cli {
    /// Free-text input for the council (a proposed recommendation with --candidate)
    pub input: Option<String>,

    /// Context values as key=value pairs (can be specified multiple times)
    #[arg(short = 'c', long = "context", value_name = "KEY=VALUE")]
    pub context: Vec<String>,

    /// Judge the input as a proposed recommendation instead of running a round
    #[arg(long)]
    pub candidate: bool,

    /// Show council status and exit
    #[arg(long)]
    pub status: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}

impl Cli {
    /// Apply the `--context` overrides on top of a baseline context
    pub fn apply_context(&self, mut baseline: EvalContext) -> Result<EvalContext, String> {
        for pair in &self.context {
            let (key, value) = parse_context_pair(pair)?;
            baseline.set(key, value);
        }
        Ok(baseline)
    }
}

/// Parse one `key=value` context argument. Values parse as numbers when
/// possible and fall back to text.
pub fn parse_context_pair(pair: &str) -> Result<(String, ContextValue), String> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| format!("invalid context pair '{}', expected KEY=VALUE", pair))?;

    if key.is_empty() {
        return Err(format!("invalid context pair '{}', empty key", pair));
    }

    let value = match raw.parse::<f64>() {
        Ok(number) => ContextValue::Number(number),
        Err(_) => ContextValue::Text(raw.to_string()),
    };

    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_pair() {
        let (key, value) = parse_context_pair("energy_level=0.3").unwrap();
        assert_eq!(key, "energy_level");
        assert_eq!(value, ContextValue::Number(0.3));
    }

    #[test]
    fn test_parse_text_pair() {
        let (key, value) = parse_context_pair("work_deadline=friday").unwrap();
        assert_eq!(key, "work_deadline");
        assert_eq!(value, ContextValue::Text("friday".to_string()));
    }

    #[test]
    fn test_missing_equals_is_rejected() {
        assert!(parse_context_pair("energy_level").is_err());
        assert!(parse_context_pair("=0.5").is_err());
    }

    #[test]
    fn test_overrides_replace_baseline() {
        let cli = Cli::parse_from([
            "wellbeing-council",
            "hello",
            "-c",
            "energy_level=0.9",
        ]);
        let baseline = EvalContext::new().with("energy_level", 0.2).with("pain_level", 0.1);

        let merged = cli.apply_context(baseline).unwrap();
        assert_eq!(merged.metric("energy_level"), Some(0.9));
        assert_eq!(merged.metric("pain_level"), Some(0.1));
    }
}
