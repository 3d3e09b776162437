mod fixtures;

use confluence_ta::{FisherConfig, FisherTransform};
use fixtures::{assert_near, load_reference, load_reference_ohlcvs, walk_reference};
use serde::Deserialize;

const REF_PATH: &str = "tests/fixtures/data/fisher-10-close.csv";

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Deserialize)]
struct RefFisher {
    index: u64,
    fisher: f64,
    trigger: f64,
}

#[test]
fn fisher_10_close_matches_reference() {
    let bars = load_reference_ohlcvs();
    let reference: Vec<RefFisher> = load_reference(REF_PATH);

    let mut fisher = FisherTransform::new(FisherConfig::default());

    walk_reference(
        &bars,
        &reference,
        |row| row.index,
        |bar| fisher.compute(bar),
        |row, v, ctx| {
            assert_near(v.fisher(), row.fisher, TOLERANCE, &format!("{ctx} fisher"));
            assert_near(v.trigger(), row.trigger, TOLERANCE, &format!("{ctx} trigger"));
        },
    );
}

#[test]
fn normalized_price_stays_within_clamp() {
    let bars = load_reference_ohlcvs();
    let mut fisher = FisherTransform::new(FisherConfig::default());

    for bar in &bars {
        let v = fisher.compute(bar).unwrap();
        assert!(v.normalized().abs() <= 0.999, "bar {}: {v}", bar.index);
        assert!(v.fisher().is_finite(), "bar {}: {v}", bar.index);
    }
}
