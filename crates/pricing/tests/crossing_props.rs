use pricing::find_crossings;
use proptest::prelude::*;

fn interpolate(curve: &[f64], position: f64) -> f64 {
    let i = position.floor() as usize;
    let f = position - position.floor();
    if i + 1 >= curve.len() {
        return curve[i];
    }
    curve[i] + f * (curve[i + 1] - curve[i])
}

proptest! {
    #[test]
    fn crossings_lie_on_threshold(
        curve in proptest::collection::vec(-500.0f64..500.0, 2..120),
        threshold in -500.0f64..500.0,
    ) {
        let crossings = find_crossings(&curve, threshold);

        for c in &crossings {
            let i = c.position.floor() as usize;
            let f = c.position - c.position.floor();
            prop_assert!(i < curve.len());
            prop_assert!((0.0..=1.0).contains(&f));

            let value = interpolate(&curve, c.position);
            let scale = 1.0 + curve[i].abs().max(threshold.abs());
            prop_assert!((value - threshold).abs() <= 1e-9 * scale);
        }
    }

    #[test]
    fn crossings_are_sorted(
        curve in proptest::collection::vec(-50.0f64..50.0, 0..60),
        threshold in -50.0f64..50.0,
    ) {
        let positions: Vec<f64> = find_crossings(&curve, threshold)
            .iter()
            .map(|c| c.position)
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(positions.len() < curve.len().max(1));
    }

    #[test]
    fn short_curves_never_cross(
        curve in proptest::collection::vec(-50.0f64..50.0, 0..2),
        threshold in -50.0f64..50.0,
    ) {
        prop_assert!(find_crossings(&curve, threshold).is_empty());
    }
}
