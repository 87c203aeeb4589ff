//! CLI entrypoint for wellbeing-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use council_application::{Council, JournalEvent, RoundJournal};
use council_infrastructure::{ConfigLoader, FileConfig, JsonlRoundJournal};
use council_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting wellbeing-council");

    // Load configuration
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("{}", e))?
    };

    ConsoleFormatter::set_color(config.output.color);

    // Assemble the round context: config baseline, CLI overrides on top
    let context = cli
        .apply_context(config.baseline_context())
        .map_err(|e| anyhow!(e))?;

    // === Dependency Injection ===
    let mut council = Council::with_default_bench();

    if cli.status {
        println!("{}", ConsoleFormatter::format_status(&council.status()));
        return Ok(());
    }

    let Some(input) = cli.input.clone() else {
        bail!("Input text is required. Use --status for a status snapshot.");
    };

    let journal: Option<JsonlRoundJournal> = if config.journal.enabled {
        JsonlRoundJournal::new(&config.journal.path)
    } else {
        None
    };

    // Candidate mode: judge the input as a proposed recommendation
    if cli.candidate {
        let levels = council.evaluate_candidate(&input, &context).await;

        if let Some(journal) = &journal {
            journal.record(JournalEvent::new(
                "candidate_evaluated",
                serde_json::json!({
                    "recommendation": input,
                    "levels": levels,
                }),
            ));
        }

        println!("{}", ConsoleFormatter::format_candidate(&levels));
        return Ok(());
    }

    // Default mode: run one full council round
    let result = if cli.quiet {
        council.recommend(&input, &context).await
    } else {
        let progress = ProgressReporter::new();
        council.recommend_with_progress(&input, &context, &progress).await
    };

    if let Some(journal) = &journal {
        journal.record(JournalEvent::new(
            "round_completed",
            serde_json::json!({
                "input": input,
                "recommendation": result.recommendation,
                "reasoning": result.reasoning,
                "consensus": result.consensus,
                "confidence": result.confidence,
                "safety_concerns": result.safety_concerns,
            }),
        ));
    }

    let format = cli.output.unwrap_or_else(|| match config.output.format.as_str() {
        "full" => OutputFormat::Full,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Summary,
    });

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}
