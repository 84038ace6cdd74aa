//! Property-based tests for aggregation invariants

use imsight_stats::{frequency_table, quantile_sorted, BinSpec, Histogram, top_n};
use proptest::prelude::*;

proptest! {
    #[test]
    fn frequency_fractions_sum_to_one_hundred(keys in prop::collection::vec(0u8..12, 1..200)) {
        let table = frequency_table(keys.iter(), |k| Some(**k)).unwrap();

        let exact: f64 = table.entries.iter().map(|e| e.fraction * 100.0).sum();
        prop_assert!((exact - 100.0).abs() < 1e-9);

        // Each rounded percentage is off by at most 0.05
        let rounded: f64 = table.entries.iter().map(|e| e.percentage).sum();
        let tolerance = 0.05 * table.entries.len() as f64 + 1e-9;
        prop_assert!((rounded - 100.0).abs() <= tolerance);

        let counted: usize = table.entries.iter().map(|e| e.count).sum();
        prop_assert_eq!(counted, keys.len());
    }

    #[test]
    fn every_in_domain_value_lands_in_exactly_one_bin(
        values in prop::collection::vec(-50.0f64..150.0, 0..300),
        lo in -20.0f64..20.0,
        span in 0.0f64..100.0,
        bins in 1usize..40,
    ) {
        let hi = lo + span;
        let spec = BinSpec::new(lo, hi, bins).unwrap();
        let hist = Histogram::counts(spec, &values);

        let in_domain = values.iter().filter(|v| **v >= lo && **v <= hi).count();
        prop_assert_eq!(hist.total(), in_domain);
        prop_assert_eq!(hist.dropped(), values.len() - in_domain);

        for bin in hist.bins() {
            for v in &bin.members {
                prop_assert!(*v >= bin.x0);
                prop_assert!(*v < bin.x1 || bin.x1 == hi);
            }
        }

        // Contiguous, non-overlapping
        for pair in hist.bins().windows(2) {
            prop_assert_eq!(pair[0].x1, pair[1].x0);
        }
        prop_assert_eq!(hist.bins()[0].x0, lo);
        prop_assert_eq!(hist.bins()[bins - 1].x1, hi);
    }

    #[test]
    fn quantile_of_single_value_is_that_value(x in -1e6f64..1e6, p in 0.0f64..=1.0) {
        prop_assert_eq!(quantile_sorted(&[x], p), Some(x));
    }

    #[test]
    fn top_n_is_sorted_descending(values in prop::collection::vec(-100.0f64..100.0, 0..60), n in 0usize..20) {
        let ranked = top_n(&values, n, |v| Some(*v));

        prop_assert_eq!(ranked.len(), n.min(values.len()));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].metric >= pair[1].metric);
        }
    }
}
