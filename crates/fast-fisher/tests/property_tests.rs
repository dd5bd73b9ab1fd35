//! Property-based tests using proptest.
//!
//! These tests verify invariants that must hold for every valid table,
//! using randomly generated tables to find edge cases.

#![allow(clippy::float_cmp)]

mod common;

use proptest::prelude::*;

use fast_fisher::prelude::*;

// ==================== Test Data Generators ====================

/// Generate a table with every cell in `0..=max`.
fn arb_table(max: u64) -> impl Strategy<Value = [u64; 4]> {
    prop::array::uniform4(0..=max)
}

/// Generate a batch of `len` tables as four columns.
fn arb_batch(
    max: u64,
    len: std::ops::RangeInclusive<usize>,
) -> impl Strategy<Value = (Vec<u64>, Vec<u64>, Vec<u64>, Vec<u64>)> {
    prop::collection::vec(arb_table(max), len).prop_map(|tables| {
        let a = tables.iter().map(|t| t[0]).collect();
        let b = tables.iter().map(|t| t[1]).collect();
        let c = tables.iter().map(|t| t[2]).collect();
        let d = tables.iter().map(|t| t[3]).collect();
        (a, b, c, d)
    })
}

// ==================== Bounds ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Every p-value lies in [0, 1]
    #[test]
    fn prop_p_values_in_unit_interval(table in arb_table(300)) {
        let p = fishers_exact_all(&table).unwrap();
        for value in [p.less, p.greater, p.two_sided] {
            prop_assert!((0.0..=1.0).contains(&value), "{:?} -> {:?}", table, p);
        }
    }

    /// The observed table is counted in both one-sided tails
    #[test]
    fn prop_one_sided_tails_overlap(table in arb_table(300)) {
        let p = fishers_exact_all(&table).unwrap();
        prop_assert!(p.less + p.greater >= 1.0 - 1e-9, "{:?} -> {:?}", table, p);
    }

    /// The two-sided p-value covers the smaller tail and never exceeds one
    #[test]
    fn prop_two_sided_bounds(table in arb_table(300)) {
        let p = fishers_exact_all(&table).unwrap();
        prop_assert!(p.two_sided + 1e-9 >= p.less.min(p.greater), "{:?} -> {:?}", table, p);
        prop_assert!(p.two_sided <= 1.0);
    }

    /// With a symmetric null distribution the two-sided p-value is the doubled smaller tail
    #[test]
    fn prop_two_sided_doubles_under_symmetry(row in 1_u64..200, col1 in 0_u64..400, a in 0_u64..400) {
        // row1 == row2 makes the distribution symmetric about col1 / 2.
        let n = 2 * row;
        let col1 = col1 % (n + 1);
        let lo = row.saturating_sub(n - col1);
        let hi = row.min(col1);
        let a = lo + a % (hi - lo + 1);
        let table = [a, row - a, col1 - a, row - (col1 - a)];

        let p = fishers_exact_all(&table).unwrap();
        let doubled = (2.0 * p.less.min(p.greater)).min(1.0);
        prop_assert!((p.two_sided - doubled).abs() < 1e-9, "{:?} -> {:?}", table, p);
    }
}

// ==================== Monotonicity ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For fixed b, c, d, raising `a` never lowers `less` and never raises `greater`
    #[test]
    fn prop_monotone_in_a(a in 0_u64..150, b in 0_u64..150, c in 0_u64..150, d in 0_u64..150) {
        let lower = fishers_exact_all(&[a, b, c, d]).unwrap();
        let upper = fishers_exact_all(&[a + 1, b, c, d]).unwrap();
        prop_assert!(upper.less + 1e-12 >= lower.less, "less: {} -> {}", lower.less, upper.less);
        prop_assert!(upper.greater <= lower.greater + 1e-12, "greater: {} -> {}", lower.greater, upper.greater);
    }

    /// Swapping rows and columns swaps nothing: the table's transpose has the same p-values
    #[test]
    fn prop_transpose_invariant(table in arb_table(200)) {
        let [a, b, c, d] = table;
        let p = fishers_exact_all(&[a, b, c, d]).unwrap();
        let t = fishers_exact_all(&[a, c, b, d]).unwrap();
        prop_assert!((p.less - t.less).abs() < 1e-12);
        prop_assert!((p.greater - t.greater).abs() < 1e-12);
        prop_assert!((p.two_sided - t.two_sided).abs() < 1e-12);
    }

    /// Swapping the columns mirrors the one-sided tails
    #[test]
    fn prop_column_swap_mirrors_tails(table in arb_table(200)) {
        let [a, b, c, d] = table;
        let p = fishers_exact_all(&[a, b, c, d]).unwrap();
        let m = fishers_exact_all(&[b, a, d, c]).unwrap();
        prop_assert!((p.less - m.greater).abs() < 1e-9);
        prop_assert!((p.greater - m.less).abs() < 1e-9);
        prop_assert!((p.two_sided - m.two_sided).abs() < 1e-9);
    }
}

// ==================== Reference Agreement ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Matches plain full-support summation
    #[test]
    fn prop_matches_reference_summation(table in arb_table(500)) {
        let p = fishers_exact_all(&table).unwrap();
        for alternative in Alternative::ALL {
            let expected = common::reference_p_value(table, alternative, 1e-7);
            prop_assert!(
                (p.get(alternative) - expected).abs() < 1e-9,
                "{:?} {}: {} vs {}", table, alternative, p.get(alternative), expected
            );
        }
    }
}

// ==================== Batch Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Output is index-aligned with the input, whatever the scheduling
    #[test]
    fn prop_batch_order_preserved((a, b, c, d) in arb_batch(60, 0..=300), chunk in 1_usize..64) {
        let dispatcher = BatchDispatcher::with_config(
            ExactConfig::new().min_parallel_threshold(0).chunk_size(chunk),
        ).unwrap();
        let p = dispatcher.exact(&a, &b, &c, &d, Alternative::TwoSided).unwrap();
        prop_assert_eq!(p.len(), a.len());
        for i in 0..a.len() {
            let single = fishers_exact(&[a[i], b[i], c[i], d[i]], Alternative::TwoSided).unwrap();
            prop_assert_eq!(p[i], single);
        }
    }

    /// Odds ratios equal the floating-point quotient
    #[test]
    fn prop_odds_ratio_is_quotient((a, b, c, d) in arb_batch(1000, 1..=50)) {
        let (odds, _) = exact_with_odds_ratios(&a, &b, &c, &d, "less").unwrap();
        for i in 0..a.len() {
            #[allow(clippy::cast_precision_loss)]
            let expected = (a[i] as f64 * d[i] as f64) / (b[i] as f64 * c[i] as f64);
            prop_assert!(odds[i] == expected || (odds[i].is_nan() && expected.is_nan()));
        }
    }
}
