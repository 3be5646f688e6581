//! Core data model for trial qualification and research.
//!
//! Every pipeline stage consumes one of these types and produces a new,
//! enriched value. Nothing here is mutated in place once constructed, which
//! keeps each stage independently testable and makes the confidence score a
//! pure function of the final record state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Location-count bucket. Boundaries are inclusive and mutually exclusive;
/// total ordering follows the lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationBucket {
    One,
    TwoToFive,
    SixToFifteen,
    SixteenPlus,
}

impl LocationBucket {
    /// Map a raw count into a bucket. A count of 0 lands in SixteenPlus,
    /// matching the original piecewise mapping (counts only ever arrive from
    /// regexes that matched "<n> locations" text, where 0 is pathological).
    pub fn from_count(count: u32) -> Self {
        match count {
            1 => LocationBucket::One,
            2..=5 => LocationBucket::TwoToFive,
            6..=15 => LocationBucket::SixToFifteen,
            _ => LocationBucket::SixteenPlus,
        }
    }

    /// Parse a declared-locations string ("1", "2-5", "6-15", "16+").
    pub fn parse(declared: &str) -> Option<Self> {
        match declared.trim() {
            "1" => Some(LocationBucket::One),
            "2-5" => Some(LocationBucket::TwoToFive),
            "6-15" => Some(LocationBucket::SixToFifteen),
            "16+" => Some(LocationBucket::SixteenPlus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationBucket::One => "1",
            LocationBucket::TwoToFive => "2-5",
            LocationBucket::SixToFifteen => "6-15",
            LocationBucket::SixteenPlus => "16+",
        }
    }

    pub fn lower_bound(&self) -> u32 {
        match self {
            LocationBucket::One => 1,
            LocationBucket::TwoToFive => 2,
            LocationBucket::SixToFifteen => 6,
            LocationBucket::SixteenPlus => 16,
        }
    }
}

impl std::fmt::Display for LocationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Restaurant service model. Classification precedence is
/// FSR > QSR > FastCasual > CafeCoffee > Unknown; first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestaurantType {
    Fsr,
    Qsr,
    FastCasual,
    CafeCoffee,
    Unknown,
}

impl RestaurantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestaurantType::Fsr => "FSR",
            RestaurantType::Qsr => "QSR",
            RestaurantType::FastCasual => "Fast Casual",
            RestaurantType::CafeCoffee => "Cafe/Coffee",
            RestaurantType::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "FSR" => RestaurantType::Fsr,
            "QSR" => RestaurantType::Qsr,
            "Fast Casual" => RestaurantType::FastCasual,
            "Cafe/Coffee" => RestaurantType::CafeCoffee,
            _ => RestaurantType::Unknown,
        }
    }
}

impl std::fmt::Display for RestaurantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualification tier against the ICP rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    NotAFit,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Tier1 => "Tier 1",
            Tier::Tier2 => "Tier 2",
            Tier::Tier3 => "Tier 3",
            Tier::Tier4 => "Tier 4",
            Tier::NotAFit => "Not a fit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Tier 1" => Some(Tier::Tier1),
            "Tier 2" => Some(Tier::Tier2),
            "Tier 3" => Some(Tier::Tier3),
            "Tier 4" => Some(Tier::Tier4),
            "Not a fit" => Some(Tier::NotAFit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tier plus the human-readable justification for why the record landed
/// there. A record holds exactly one of these per scoring pass; re-scoring
/// replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAssignment {
    pub tier: Tier,
    pub reason: String,
}

impl TierAssignment {
    pub fn new(tier: Tier, reason: impl Into<String>) -> Self {
        Self {
            tier,
            reason: reason.into(),
        }
    }
}

/// How well an observed location count corroborates the declared one.
/// Unknown means no observed count was available, which is weaker evidence
/// than an outright Mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
    Exact,
    RangeMatch,
    Close,
    Mismatch,
    Unknown,
}

impl MatchQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchQuality::Exact => "Exact",
            MatchQuality::RangeMatch => "Range match",
            MatchQuality::Close => "Close",
            MatchQuality::Mismatch => "Mismatch",
            MatchQuality::Unknown => "Unknown",
        }
    }

    /// Evidentiary strength: Exact > RangeMatch > Close > Mismatch > Unknown.
    pub fn strength(&self) -> u8 {
        match self {
            MatchQuality::Exact => 4,
            MatchQuality::RangeMatch => 3,
            MatchQuality::Close => 2,
            MatchQuality::Mismatch => 1,
            MatchQuality::Unknown => 0,
        }
    }
}

impl std::fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trust tier derived from the confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::Low => "Low",
            ConfidenceTier::VeryLow => "Very Low",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One inbound trial signup, as read from the input CSV.
///
/// The raw row is kept alongside the parsed fields so output files can carry
/// the union of input columns and everything the pipeline computes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    pub company_name: String,
    pub website: Option<String>,
    pub declared_locations: String,
    pub declared_employees: String,
    pub notes: String,
    /// Untouched input row, in input column order.
    pub raw: Vec<String>,
}

impl TrialRecord {
    /// Build a record from a CSV row. `company_name` is the only required
    /// field; everything else degrades to empty.
    pub fn from_row(headers: &[String], row: &[String]) -> Result<Self, RecordError> {
        let get = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .and_then(|i| row.get(i))
                .map(|s| s.trim().to_string())
        };

        let company_name = get("company_name")
            .filter(|s| !s.is_empty())
            .ok_or(RecordError::MissingField("company_name"))?;

        Ok(Self {
            company_name,
            website: get("website").filter(|s| !s.is_empty()),
            declared_locations: get("declared_locations")
                .or_else(|| get("num_locations"))
                .unwrap_or_default(),
            declared_employees: get("declared_employees")
                .or_else(|| get("employees_per_location"))
                .unwrap_or_default(),
            notes: get("notes").unwrap_or_default(),
            raw: row.to_vec(),
        })
    }

    /// Value of an arbitrary input column, for passthrough consumers.
    pub fn column<'a>(&'a self, headers: &[String], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .and_then(|i| self.raw.get(i))
            .map(|s| s.as_str())
    }
}

/// Signals extracted from declared data during qualification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeclaredSignals {
    pub restaurant_type: RestaurantType,
    pub location_bucket: LocationBucket,
    pub employees_per_location: u32,
}

/// A trial record enriched with the declared-data-only qualification pass.
/// Non-restaurants carry no signals; they tier straight to NotAFit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedTrial {
    pub record: TrialRecord,
    pub is_restaurant: bool,
    pub signals: Option<DeclaredSignals>,
    pub tier: TierAssignment,
}

/// Terminal outcome for a researched record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResearchStatus {
    Complete,
    Skipped { reason: String },
}

impl std::fmt::Display for ResearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResearchStatus::Complete => write!(f, "Complete"),
            ResearchStatus::Skipped { reason } => write!(f, "Skipped - {}", reason),
        }
    }
}

/// Everything learned about one trial from external evidence, plus the
/// reconciliation verdict and confidence score derived from it.
///
/// `confidence_score` must always be recomputable from the other fields;
/// see `confidence::score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub company_name: String,
    pub research_date: DateTime<Utc>,

    // Declared data carried over from the trial record
    pub declared_locations: String,
    pub declared_employees: String,
    pub tier: Option<Tier>,

    // Observed evidence
    pub website: Option<String>,
    pub website_accessible: bool,
    pub has_locations_page: bool,
    pub has_careers_page: bool,
    pub actual_locations_found: u32,
    pub job_postings_count: u32,
    pub parent_company: Option<String>,
    /// Review volume from business-directory data, when a source provides it.
    /// No live integration populates this today; scoring handles its absence.
    pub review_count: Option<u32>,

    // Reconciliation and trust
    pub locations_match: MatchQuality,
    pub confidence_score: u32,
    pub confidence_tier: ConfidenceTier,

    pub status: ResearchStatus,
    /// Append-only evidence log, in the order stages ran.
    pub notes: Vec<String>,
}

impl ResearchResult {
    /// A blank result for a record, before any evidence is gathered.
    pub fn new(record: &TrialRecord, tier: Option<Tier>) -> Self {
        Self {
            company_name: record.company_name.clone(),
            research_date: Utc::now(),
            declared_locations: record.declared_locations.clone(),
            declared_employees: record.declared_employees.clone(),
            tier,
            website: record.website.clone(),
            website_accessible: false,
            has_locations_page: false,
            has_careers_page: false,
            actual_locations_found: 0,
            job_postings_count: 0,
            parent_company: None,
            review_count: None,
            locations_match: MatchQuality::Unknown,
            confidence_score: 0,
            confidence_tier: ConfidenceTier::VeryLow,
            status: ResearchStatus::Complete,
            notes: Vec::new(),
        }
    }
}
