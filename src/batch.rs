//! Batch input/output: reading trial CSVs, assembling output rows whose
//! columns are the union of the input columns and everything the pipeline
//! computed, and summarizing a run.
//!
//! Error resilience contract: a malformed row is skipped with a warning and
//! the batch continues; a missing input file is fatal before any processing.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::record::{QualifiedTrial, ResearchResult, TrialRecord};

/// Columns the qualification pass appends to the input.
pub const QUALIFY_OUTPUT_COLUMNS: &[&str] = &[
    "is_restaurant",
    "restaurant_type",
    "num_locations",
    "employees_per_location",
    "tier",
    "tier_reason",
    "research_notes",
];

/// Columns the research pass appends (on top of the qualification columns).
pub const RESEARCH_OUTPUT_COLUMNS: &[&str] = &[
    "is_restaurant",
    "restaurant_type",
    "num_locations",
    "employees_per_location",
    "tier",
    "tier_reason",
    "research_date",
    "website_accessible",
    "has_locations_page",
    "has_careers_page",
    "actual_locations_found",
    "job_postings_count",
    "parent_company",
    "review_count",
    "locations_match",
    "confidence_score",
    "confidence_tier",
    "research_status",
    "research_notes",
];

/// Column appended by the prioritize pass.
pub const PRIORITY_OUTPUT_COLUMNS: &[&str] = &["research_priority_score"];

/// Parsed input file: headers plus the rows that survived validation.
#[derive(Debug)]
pub struct TrialFile {
    pub headers: Vec<String>,
    pub records: Vec<TrialRecord>,
    pub skipped_rows: usize,
}

/// Read a trial CSV. Rows missing a company name are skipped with a warning;
/// the file itself being unreadable is fatal.
pub fn read_trials(path: &Path) -> Result<TrialFile> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (i, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            Err(e) => {
                warn!("Skipping unparseable row {}: {}", i + 2, e);
                skipped_rows += 1;
                continue;
            }
        };

        match TrialRecord::from_row(&headers, &row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping row {}: {}", i + 2, e);
                skipped_rows += 1;
            }
        }
    }

    Ok(TrialFile {
        headers,
        records,
        skipped_rows,
    })
}

/// Apply a start offset and row limit, for batching large files.
pub fn apply_window(records: Vec<TrialRecord>, start: usize, limit: Option<usize>) -> Vec<TrialRecord> {
    let windowed = records.into_iter().skip(start);
    match limit {
        Some(limit) => windowed.take(limit).collect(),
        None => windowed.collect(),
    }
}

/// Output headers: every input column, then each computed column that the
/// input does not already carry.
pub fn merged_headers(input: &[String], computed: &[&str]) -> Vec<String> {
    let mut headers = input.to_vec();
    for name in computed {
        if !input.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            headers.push((*name).to_string());
        }
    }
    headers
}

/// Assemble one output row. Computed values overwrite same-named input
/// columns (re-scoring replaces, never appends); the rest append in
/// computed-column order.
pub fn merged_row(
    input_headers: &[String],
    record: &TrialRecord,
    computed: &[&str],
    values: &[String],
) -> Vec<String> {
    debug_assert_eq!(computed.len(), values.len());

    let mut row: Vec<String> = (0..input_headers.len())
        .map(|i| record.raw.get(i).cloned().unwrap_or_default())
        .collect();

    let mut appended = Vec::new();
    for (name, value) in computed.iter().zip(values) {
        match input_headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
            Some(idx) => row[idx] = value.clone(),
            None => appended.push(value.clone()),
        }
    }

    row.extend(appended);
    row
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Values for `QUALIFY_OUTPUT_COLUMNS`, in order.
pub fn qualify_values(qualified: &QualifiedTrial) -> Vec<String> {
    let mut values = vec![yes_no(qualified.is_restaurant)];

    match qualified.signals {
        Some(signals) => {
            values.push(signals.restaurant_type.to_string());
            values.push(signals.location_bucket.to_string());
            values.push(signals.employees_per_location.to_string());
        }
        None => values.extend([String::new(), String::new(), String::new()]),
    }

    values.push(qualified.tier.tier.to_string());
    values.push(qualified.tier.reason.clone());
    values.push(if qualified.is_restaurant {
        "Automated analysis - manual research recommended".to_string()
    } else {
        String::new()
    });

    values
}

/// Values for `RESEARCH_OUTPUT_COLUMNS`, in order.
pub fn research_values(qualified: &QualifiedTrial, result: &ResearchResult) -> Vec<String> {
    // Qualification columns first, minus the manual-research placeholder
    let mut values = qualify_values(qualified);
    values.pop();

    values.push(result.research_date.to_rfc3339());
    values.push(yes_no(result.website_accessible));
    values.push(yes_no(result.has_locations_page));
    values.push(yes_no(result.has_careers_page));
    values.push(result.actual_locations_found.to_string());
    values.push(result.job_postings_count.to_string());
    values.push(
        result
            .parent_company
            .clone()
            .unwrap_or_else(|| "None detected".to_string()),
    );
    values.push(
        result
            .review_count
            .map(|n| n.to_string())
            .unwrap_or_default(),
    );
    values.push(result.locations_match.to_string());
    values.push(result.confidence_score.to_string());
    values.push(result.confidence_tier.to_string());
    values.push(result.status.to_string());
    values.push(result.notes.join("; "));

    values
}

/// Counts for one completed run, exportable as JSON alongside the CSV.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub processed: usize,
    pub skipped: usize,
    pub restaurants_identified: usize,
    pub tier_counts: BTreeMap<String, usize>,
    pub confidence_counts: BTreeMap<String, usize>,
    pub started_at: String,
    pub completed_at: String,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self {
            total_records: 0,
            processed: 0,
            skipped: 0,
            restaurants_identified: 0,
            tier_counts: BTreeMap::new(),
            confidence_counts: BTreeMap::new(),
            started_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            completed_at: String::new(),
        }
    }

    pub fn record_tier(&mut self, tier: &str) {
        *self.tier_counts.entry(tier.to_string()).or_insert(0) += 1;
    }

    pub fn record_confidence(&mut self, tier: &str) {
        *self.confidence_counts.entry(tier.to_string()).or_insert(0) += 1;
    }

    pub fn finalize(&mut self) {
        self.completed_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize batch summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write batch summary to: {}", path.display()))?;
        Ok(())
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Print the end-of-run summary for a qualification pass.
pub fn print_qualify_summary(summary: &BatchSummary) {
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total trials processed: {}", summary.processed);
    println!("Restaurants identified: {}", summary.restaurants_identified);
    println!("\nTier Distribution:");
    for tier in ["Tier 1", "Tier 2", "Tier 3", "Tier 4", "Not a fit"] {
        if let Some(count) = summary.tier_counts.get(tier) {
            println!("  {}: {}", tier, count);
        }
    }
    println!("{}", "=".repeat(60));
}

/// Print the end-of-run summary for a research pass.
pub fn print_research_summary(summary: &BatchSummary) {
    println!("\n{}", "=".repeat(60));
    println!("RESEARCH COMPLETE");
    println!("{}", "=".repeat(60));
    println!("Processed: {}", summary.processed);
    println!("Skipped: {}", summary.skipped);
    println!("\nConfidence Distribution:");
    for tier in ["High", "Medium", "Low", "Very Low"] {
        if let Some(count) = summary.confidence_counts.get(tier) {
            println!("  {}: {}", tier, count);
        }
    }
    println!("{}", "=".repeat(60));
}
