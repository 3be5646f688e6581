use clap::{Parser, Subcommand};

use crate::record::Tier;

#[derive(Parser, Debug)]
#[command(name = "trialscout")]
#[command(about = "Qualifies restaurant trial signups against an ICP rubric and validates declared data against web evidence")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Create default configuration file at ./config/trialscout.toml
    #[arg(long, global = true)]
    pub init: bool,

    /// Verbose logging (use -v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score trial signups into qualification tiers from declared data only
    Qualify {
        /// Input CSV file with trial companies
        #[arg(long, default_value = "data/input/trials.csv")]
        input: String,

        /// Output CSV file for scored results
        #[arg(long, default_value = "data/output/scored_trials.csv")]
        output: String,

        /// Start row offset (for batching)
        #[arg(long, default_value = "0")]
        start: usize,

        /// Limit number of rows to process
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Research qualified trials against their websites and score confidence
    Research {
        /// Input CSV with scored trials
        #[arg(long)]
        input: String,

        /// Output CSV with research data
        #[arg(long)]
        output: String,

        /// Start row offset (for batching)
        #[arg(long, default_value = "0")]
        start: usize,

        /// Limit number of rows to research
        #[arg(long)]
        limit: Option<usize>,

        /// Which tiers to research (overrides config, e.g. --tiers "Tier 1" "Tier 2")
        #[arg(long, value_name = "TIER", num_args = 1..)]
        tiers: Option<Vec<String>>,

        /// Research every record regardless of tier
        #[arg(long, conflicts_with = "tiers")]
        all_tiers: bool,

        /// Minimum interval between page fetches in milliseconds (overrides config)
        #[arg(long, value_name = "MS")]
        cooldown_ms: Option<u64>,

        /// Write a JSON run summary next to the output CSV
        #[arg(long)]
        summary: bool,
    },

    /// Rank qualified trials by how much they are worth researching
    Prioritize {
        /// Input CSV with scored trials
        #[arg(long, default_value = "data/output/scored_trials.csv")]
        input: String,

        /// Output CSV for the priority research queue
        #[arg(long, default_value = "data/output/priority_research_queue.csv")]
        output: String,

        /// Minimum priority score to keep
        #[arg(long, default_value = "30")]
        min_score: u32,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Research { tiers: Some(tiers), .. }) = &self.command {
            for tier in tiers {
                if Tier::parse(tier).is_none() {
                    return Err(format!(
                        "Unknown tier '{}' (expected 'Tier 1'..'Tier 4' or 'Not a fit')",
                        tier
                    ));
                }
            }
        }
        Ok(())
    }
}
