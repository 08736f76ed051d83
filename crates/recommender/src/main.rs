use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use recommender::logging::{init_cli_logger, LOG_FILE};
use recommender::{analyze_games, save_results, RecommenderConfig, RECOMMENDATIONS_FILE};
use tracing::info;

#[derive(Parser)]
#[command(name = "chess-recommender")]
#[command(about = "Analyze chess games and recommend openings to study")]
struct Cli {
    /// PGN file with the games to analyze
    #[arg(long)]
    pgn_file: PathBuf,
    /// Configuration file
    #[arg(long, default_value = RecommenderConfig::DEFAULT_PATH)]
    config: PathBuf,
    /// Directory for analysis_results.json and recommendations.txt
    #[arg(long, default_value = "data/processed")]
    output_dir: PathBuf,
    /// Log level filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_logger(&cli.log_level, LOG_FILE).context("Failed to initialize logging")?;

    let config = RecommenderConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    info!("Starting chess analysis...");
    let results = analyze_games(&cli.pgn_file, &config)
        .with_context(|| format!("Analysis of {} failed", cli.pgn_file.display()))?;
    save_results(&results, &cli.output_dir)?;

    println!();
    println!("{}", "=".repeat(50));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(50));
    println!("Games analyzed: {}", results.games_parsed);
    println!("Moves evaluated: {}", results.moves_evaluated);
    println!("Recommendations generated: {}", results.recommendations.len());
    println!(
        "Estimated study time: {} hours",
        results.study_plan.estimated_time
    );
    let focus: Vec<&str> = results
        .study_plan
        .focus_areas
        .iter()
        .map(|f| f.as_str())
        .collect();
    println!("Focus areas: {}", focus.join(", "));
    println!();
    println!("Results saved to: {}", cli.output_dir.display());
    println!("Check {RECOMMENDATIONS_FILE} for detailed recommendations");

    Ok(())
}
