//! Property-based tests for date ranges.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::workflow::types::DateRange;

fn arb_range() -> impl Strategy<Value = DateRange> {
    (0u64..730, 0u64..40).prop_map(|(offset, len)| {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let start = base + Days::new(offset);
        DateRange::new(start, start + Days::new(len)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Overlap holds exactly when some day lies in both ranges.
    #[test]
    fn prop_overlap_matches_shared_day(a in arb_range(), b in arb_range()) {
        let shared = a.start().iter_days()
            .take_while(|d| *d <= a.end())
            .any(|d| b.contains(d));
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    #[test]
    fn prop_range_overlaps_itself(a in arb_range()) {
        prop_assert!(a.overlaps(&a));
        prop_assert!(a.contains(a.start()));
        prop_assert!(a.contains(a.end()));
    }

    #[test]
    fn prop_days_counts_both_ends(a in arb_range()) {
        let counted = a.start().iter_days().take_while(|d| *d <= a.end()).count();
        prop_assert_eq!(a.days() as usize, counted);
    }
}
