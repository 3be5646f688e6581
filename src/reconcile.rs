//! Reconciliation of declared location counts against web-observed counts.

use crate::record::MatchQuality;

/// Lower bound of a declared-locations string. Empty or unparseable input
/// defaults to 0 so the Close distance check still works for observed
/// counts of 0 or 1.
pub fn lower_bound(declared: &str) -> u32 {
    let declared = declared.trim();
    if declared.is_empty() {
        return 0;
    }

    if let Some((low, _)) = declared.split_once('-') {
        return low.trim().parse().unwrap_or(0);
    }

    declared.trim_end_matches('+').trim().parse().unwrap_or(0)
}

/// Classify how well an observed count corroborates the declared one.
///
/// An observed count of 0 always means Unknown: the counters cannot tell
/// "no locations" apart from "unrecognized page", so 0 is no evidence at all
/// rather than evidence of a single-location business.
pub fn match_quality(declared: &str, observed: u32) -> MatchQuality {
    if observed == 0 {
        return MatchQuality::Unknown;
    }

    let declared = declared.trim();

    if declared == observed.to_string() {
        return MatchQuality::Exact;
    }

    if declared == "2-5" && (2..=5).contains(&observed) {
        return MatchQuality::RangeMatch;
    }

    if (observed as i64 - lower_bound(declared) as i64).abs() <= 1 {
        return MatchQuality::Close;
    }

    MatchQuality::Mismatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_bound() {
        assert_eq!(lower_bound("1"), 1);
        assert_eq!(lower_bound("2-5"), 2);
        assert_eq!(lower_bound("6-15"), 6);
        assert_eq!(lower_bound("16+"), 16);
        assert_eq!(lower_bound(""), 0);
        assert_eq!(lower_bound("many"), 0);
    }

    #[test]
    fn test_observed_zero_is_unknown() {
        assert_eq!(match_quality("2-5", 0), MatchQuality::Unknown);
        assert_eq!(match_quality("", 0), MatchQuality::Unknown);
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(match_quality("1", 1), MatchQuality::Exact);
        assert_eq!(match_quality("3", 3), MatchQuality::Exact);
    }

    #[test]
    fn test_range_match() {
        assert_eq!(match_quality("2-5", 2), MatchQuality::RangeMatch);
        assert_eq!(match_quality("2-5", 3), MatchQuality::RangeMatch);
        assert_eq!(match_quality("2-5", 5), MatchQuality::RangeMatch);
    }

    #[test]
    fn test_close_by_lower_bound_distance() {
        // |7 - 6| = 1 against the 6-15 bucket
        assert_eq!(match_quality("6-15", 7), MatchQuality::Close);
        // |2 - 1| = 1 against a declared single location
        assert_eq!(match_quality("1", 2), MatchQuality::Close);
    }

    #[test]
    fn test_mismatch_outside_range_and_distance() {
        // 7 is outside the 2-5 range and |7 - 2| = 5 fails the distance check
        assert_eq!(match_quality("2-5", 7), MatchQuality::Mismatch);
        assert_eq!(match_quality("1", 9), MatchQuality::Mismatch);
    }

    #[test]
    fn test_empty_declared_defaults_to_zero_bound() {
        // With no declared value the lower bound is 0, so 1 is still Close
        assert_eq!(match_quality("", 1), MatchQuality::Close);
        assert_eq!(match_quality("", 2), MatchQuality::Mismatch);
    }
}
