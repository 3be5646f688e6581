use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::Path;
use tracing::info;

use trialscout::batch::{self, BatchSummary};
use trialscout::cli::{Cli, Commands};
use trialscout::config::{self, AppConfig};
use trialscout::fetch::HttpFetcher;
use trialscout::priority;
use trialscout::record::{QualifiedTrial, ResearchStatus, Tier};
use trialscout::research;
use trialscout::sink::CsvSink;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --init first (before any other processing)
    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                println!("✅ Created default configuration file at: {}", path.display());
                println!("   Edit this file to customize settings, then run trialscout again.");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("❌ Failed to create configuration file: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = cli.validate() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    init_tracing(cli.verbose);

    // Load configuration
    let app_config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(config::ConfigError::FileNotFound(path)) => {
            // Config not found - prompt to create if interactive
            match AppConfig::prompt_create_config() {
                Ok(Some(created_path)) => {
                    println!("✅ Created default configuration file at: {}", created_path.display());
                    println!("   Edit this file to customize settings, then run trialscout again.");
                    std::process::exit(0);
                }
                Ok(None) => {
                    eprintln!("❌ Configuration file not found at: {}", path.display());
                    eprintln!("   Run with --init to create a default configuration file.");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("❌ Failed to create configuration file: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Qualify {
            input,
            output,
            start,
            limit,
        }) => run_qualify(&app_config, &input, &output, start, limit),
        Some(Commands::Research {
            input,
            output,
            start,
            limit,
            tiers,
            all_tiers,
            cooldown_ms,
            summary,
        }) => {
            run_research(
                &app_config,
                &input,
                &output,
                start,
                limit,
                tiers,
                all_tiers,
                cooldown_ms,
                summary,
            )
            .await
        }
        Some(Commands::Prioritize {
            input,
            output,
            min_score,
            limit,
        }) => run_prioritize(&app_config, &input, &output, min_score, limit),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("trialscout={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Declared-data-only pass: tier every record, no network.
fn run_qualify(
    config: &AppConfig,
    input: &str,
    output: &str,
    start: usize,
    limit: Option<usize>,
) -> Result<()> {
    println!("Reading trials from: {}", input);
    let trials = batch::read_trials(Path::new(input))?;
    let total_read = trials.records.len();
    let records = batch::apply_window(trials.records, start, limit);

    println!("Processing {} trial companies...", records.len());

    let headers = batch::merged_headers(&trials.headers, batch::QUALIFY_OUTPUT_COLUMNS);
    let mut sink = CsvSink::create(Path::new(output), &headers, config.output.flush_interval)?;

    let mut summary = BatchSummary::new();
    summary.total_records = total_read;
    summary.skipped = trials.skipped_rows;

    let count = records.len();
    for (i, record) in records.iter().enumerate() {
        let qualified = research::qualify(record);

        if qualified.is_restaurant {
            summary.restaurants_identified += 1;
            println!(
                "  [{}/{}] {} -> {}",
                i + 1,
                count,
                record.company_name,
                qualified.tier.tier
            );
        }

        summary.record_tier(qualified.tier.tier.as_str());
        summary.processed += 1;

        let values = batch::qualify_values(&qualified);
        let row = batch::merged_row(&trials.headers, record, batch::QUALIFY_OUTPUT_COLUMNS, &values);
        sink.append(&row)?;
    }

    let written = sink.finish()?;
    summary.finalize();
    info!("Wrote {} rows to {}", written, output);
    println!("\nWriting results to: {}", output);

    batch::print_qualify_summary(&summary);
    Ok(())
}

/// Full research pass: qualify, filter by tier, then profile each website
/// and score confidence. Records are processed one at a time in input order;
/// the fetcher's cooldown gate is the only rate limiting.
#[allow(clippy::too_many_arguments)]
async fn run_research(
    config: &AppConfig,
    input: &str,
    output: &str,
    start: usize,
    limit: Option<usize>,
    tiers: Option<Vec<String>>,
    all_tiers: bool,
    cooldown_ms: Option<u64>,
    summary_json: bool,
) -> Result<()> {
    let trials = batch::read_trials(Path::new(input))?;
    let records = batch::apply_window(trials.records, start, limit);

    // Qualify everything up front so the tier filter sees current tiers,
    // not whatever a stale input column says
    let qualified: Vec<QualifiedTrial> = records.iter().map(research::qualify).collect();

    let tier_filter: Option<Vec<Tier>> = if all_tiers {
        None
    } else {
        Some(match tiers {
            Some(named) => named.iter().filter_map(|t| Tier::parse(t)).collect(),
            None => config.research.tier_filter(),
        })
    };

    let to_research: Vec<&QualifiedTrial> = qualified
        .iter()
        .filter(|q| match &tier_filter {
            Some(filter) => filter.contains(&q.tier.tier),
            None => true,
        })
        .collect();

    println!("📊 Input: {} total trials", qualified.len());
    if let Some(filter) = &tier_filter {
        let names: Vec<&str> = filter.iter().map(|t| t.as_str()).collect();
        println!("🎯 Targeting: {}", names.join(", "));
    }
    println!("🔬 Researching: {} trials", to_research.len());

    let mut research_config = config.research.clone();
    if let Some(ms) = cooldown_ms {
        research_config.request_cooldown_ms = ms;
    }
    let fetcher = HttpFetcher::new(&config.http, &research_config)?;

    let headers = batch::merged_headers(&trials.headers, batch::RESEARCH_OUTPUT_COLUMNS);
    let mut sink = CsvSink::create(Path::new(output), &headers, config.output.flush_interval)?;

    let mut summary = BatchSummary::new();
    summary.total_records = qualified.len();

    let count = to_research.len();
    for (i, q) in to_research.into_iter().enumerate() {
        println!("[{}/{}] Researching: {}", i + 1, count, q.record.company_name);

        let result = research::research_trial(&fetcher, q).await;

        match &result.status {
            ResearchStatus::Complete => summary.processed += 1,
            ResearchStatus::Skipped { reason } => {
                info!("Skipped {}: {}", q.record.company_name, reason);
                summary.skipped += 1;
            }
        }
        summary.record_confidence(result.confidence_tier.as_str());

        let values = batch::research_values(q, &result);
        let row = batch::merged_row(&trials.headers, &q.record, batch::RESEARCH_OUTPUT_COLUMNS, &values);
        sink.append(&row)?;
    }

    let written = sink.finish()?;
    summary.finalize();

    batch::print_research_summary(&summary);
    println!("\n📄 Results saved to: {}", output);
    info!("Wrote {} rows to {}", written, output);

    if summary_json {
        let summary_path = Path::new(output).with_extension("summary.json");
        summary
            .export_json(&summary_path)
            .context("Failed to write run summary")?;
        println!("📄 Run summary saved to: {}", summary_path.display());
    }

    Ok(())
}

/// Rank qualified trials by research priority and keep the ones above the
/// score floor, highest first.
fn run_prioritize(
    config: &AppConfig,
    input: &str,
    output: &str,
    min_score: u32,
    limit: Option<usize>,
) -> Result<()> {
    let trials = batch::read_trials(Path::new(input))?;

    println!("📊 Total trials: {}", trials.records.len());

    let mut scored: Vec<(QualifiedTrial, u32)> = Vec::new();
    for record in &trials.records {
        let qualified = research::qualify(record);

        // Non-restaurants and signup placeholders are never worth researching
        if !qualified.is_restaurant || record.company_name.to_lowercase() == "your restaurant" {
            continue;
        }

        let email = record.column(&trials.headers, "email");
        let score = priority::research_priority(&qualified, email);
        if score >= min_score {
            scored.push((qualified, score));
        }
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(limit) = limit {
        scored.truncate(limit);
    }

    println!(
        "✅ Filtered to {} high-priority trials (score >= {})",
        scored.len(),
        min_score
    );

    // Priority output carries the qualification columns (minus the manual
    // research placeholder) plus the score
    let mut computed: Vec<&str> =
        batch::QUALIFY_OUTPUT_COLUMNS[..batch::QUALIFY_OUTPUT_COLUMNS.len() - 1].to_vec();
    computed.extend_from_slice(batch::PRIORITY_OUTPUT_COLUMNS);

    let headers = batch::merged_headers(&trials.headers, &computed);
    let mut sink = CsvSink::create(Path::new(output), &headers, config.output.flush_interval)?;

    let mut tier_counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for (qualified, score) in &scored {
        *tier_counts.entry(qualified.tier.tier.as_str()).or_insert(0) += 1;

        let mut values = batch::qualify_values(qualified);
        values.pop();
        values.push(score.to_string());

        let row = batch::merged_row(&trials.headers, &qualified.record, &computed, &values);
        sink.append(&row)?;
    }

    let written = sink.finish()?;

    println!("\nTier breakdown:");
    for tier in ["Tier 1", "Tier 2", "Tier 3", "Tier 4", "Not a fit"] {
        if let Some(count) = tier_counts.get(tier) {
            println!("  {}: {}", tier, count);
        }
    }
    println!("\n📄 Priority queue saved to: {} ({} rows)", output, written);

    Ok(())
}
