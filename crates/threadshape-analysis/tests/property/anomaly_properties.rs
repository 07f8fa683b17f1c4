use proptest::prelude::*;
use threadshape_analysis::AnomalyDetector;
use threadshape_analysis::anomaly::zscore;
use threadshape_core::config::DegeneratePolicy;
use threadshape_core::types::FactorMatrix;

fn matrix_strategy() -> impl Strategy<Value = FactorMatrix> {
    (1usize..40, 1usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-1.0e3f64..1.0e3, rows * cols)
            .prop_map(move |data| FactorMatrix::from_column_slice(rows, cols, &data))
    })
}

proptest! {
    #[test]
    fn polarities_are_disjoint_sorted_and_beyond_threshold(
        matrix in matrix_strategy(),
        threshold in 0.1f64..3.0,
    ) {
        let detector = AnomalyDetector::new(threshold, DegeneratePolicy::Empty).unwrap();
        for component in 0..matrix.ncols() {
            let result = detector.detect(&matrix, component).unwrap();
            prop_assert!(result.positive.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(result.negative.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(result.positive.iter().all(|i| !result.negative.contains(i)));

            let column: Vec<f64> = matrix.column(component).iter().copied().collect();
            match zscore::standardize(&column) {
                None => {
                    prop_assert!(result.degenerate);
                    prop_assert!(result.is_empty());
                }
                Some((_, z)) => {
                    prop_assert!(!result.degenerate);
                    for &i in &result.positive {
                        prop_assert!(z[i] > threshold);
                    }
                    for &i in &result.negative {
                        prop_assert!(z[i] < -threshold);
                    }
                    let flagged = result.positive.len() + result.negative.len();
                    let beyond = z.iter().filter(|v| v.abs() > threshold).count();
                    prop_assert_eq!(flagged, beyond);
                }
            }
        }
    }

    #[test]
    fn constant_columns_never_fault(value in -1.0e6f64..1.0e6, rows in 1usize..50) {
        let matrix = FactorMatrix::from_element(rows, 1, value);
        let empty = AnomalyDetector::new(1.5, DegeneratePolicy::Empty).unwrap();
        let result = empty.detect(&matrix, 0).unwrap();
        prop_assert!(result.degenerate && result.is_empty());

        let fail = AnomalyDetector::new(1.5, DegeneratePolicy::Fail).unwrap();
        prop_assert!(fail.detect(&matrix, 0).is_err());
    }

    #[test]
    fn detection_is_invariant_to_shift_and_positive_scale(
        matrix in matrix_strategy(),
        shift in -100.0f64..100.0,
        scale in 0.5f64..20.0,
    ) {
        let detector = AnomalyDetector::new(1.5, DegeneratePolicy::Empty).unwrap();
        let moved = matrix.map(|v| v * scale + shift);
        for component in 0..matrix.ncols() {
            let a = detector.detect(&matrix, component).unwrap();
            let b = detector.detect(&moved, component).unwrap();
            if !a.degenerate && !b.degenerate {
                // allow entries sitting exactly on the threshold to flip
                let diff = a.positive.len().abs_diff(b.positive.len())
                    + a.negative.len().abs_diff(b.negative.len());
                prop_assert!(diff <= 1, "{:?} vs {:?}", a, b);
            }
        }
    }
}
