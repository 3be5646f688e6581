//! Confidence scoring: an additive point model over research evidence.
//!
//! The score is a pure function of the result's evidence fields; nothing
//! accumulates across calls, so re-scoring an unmodified result is a no-op.
//! The 120 cap deliberately sits above a notional 100 ceiling: scores past
//! 100 mean "exceptionally well evidenced", not a probability.

use crate::record::{ConfidenceTier, MatchQuality, ResearchResult};

const BASE_SCORE: u32 = 50;
const MAX_SCORE: u32 = 120;

/// Compute the confidence score for a research result.
pub fn score(result: &ResearchResult) -> u32 {
    let mut score = BASE_SCORE;

    if result.website_accessible {
        score += 15;
    }

    score += match result.locations_match {
        MatchQuality::Exact => 25,
        MatchQuality::RangeMatch => 20,
        MatchQuality::Close => 10,
        MatchQuality::Mismatch | MatchQuality::Unknown => 0,
    };

    score += match result.job_postings_count {
        n if n >= 10 => 15,
        n if n >= 3 => 10,
        n if n >= 1 => 5,
        _ => 0,
    };

    if result.parent_company.is_some() {
        score += 20;
    }

    if let Some(reviews) = result.review_count {
        score += match reviews {
            n if n >= 100 => 10,
            n if n >= 50 => 7,
            n if n >= 20 => 5,
            _ => 0,
        };
    }

    score.min(MAX_SCORE)
}

/// Map a confidence score to its trust tier.
pub fn tier_for(score: u32) -> ConfidenceTier {
    match score {
        s if s >= 90 => ConfidenceTier::High,
        s if s >= 70 => ConfidenceTier::Medium,
        s if s >= 50 => ConfidenceTier::Low,
        _ => ConfidenceTier::VeryLow,
    }
}

/// Return the result with its score and tier recomputed from the evidence
/// fields. Safe to apply any number of times.
pub fn finalize(result: ResearchResult) -> ResearchResult {
    let confidence_score = score(&result);
    ResearchResult {
        confidence_tier: tier_for(confidence_score),
        confidence_score,
        ..result
    }
}
