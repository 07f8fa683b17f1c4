use proptest::prelude::*;
use threadshape_analysis::ranking::{group_totals, rank_groups};

fn labelled_flags() -> impl Strategy<Value = (Vec<String>, Vec<usize>)> {
    prop::collection::vec("[a-e]", 1..60).prop_flat_map(|labels| {
        let n = labels.len();
        (Just(labels), prop::collection::vec(0..n, 0..n * 2))
    })
}

proptest! {
    #[test]
    fn ratios_are_fractions_of_real_groups((labels, flagged) in labelled_flags()) {
        let totals = group_totals(&labels);
        let ranked = rank_groups(&flagged, &labels, &totals).unwrap();
        for entry in &ranked {
            prop_assert!(entry.total > 0);
            prop_assert!(entry.flagged <= entry.total);
            prop_assert!((0.0..=1.0).contains(&entry.ratio));
            prop_assert_eq!(Some(&entry.total), totals.get(entry.group.as_str()));
        }
    }

    #[test]
    fn ranking_is_sorted_by_ratio_then_label((labels, flagged) in labelled_flags()) {
        let totals = group_totals(&labels);
        let ranked = rank_groups(&flagged, &labels, &totals).unwrap();
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.ratio > b.ratio || (a.ratio == b.ratio && a.group < b.group));
        }
    }

    #[test]
    fn flagged_counts_sum_to_unique_indices((labels, flagged) in labelled_flags()) {
        let totals = group_totals(&labels);
        let ranked = rank_groups(&flagged, &labels, &totals).unwrap();
        let mut unique = flagged.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(ranked.iter().map(|e| e.flagged).sum::<usize>(), unique.len());
    }
}
