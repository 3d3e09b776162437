#![allow(dead_code)]

use confluence_ta::{BarIndex, Ohlcv, Price};
use serde::{Deserialize, de::DeserializeOwned};
use std::num::NonZero;

/// OHLC bar parsed from the 5-minute futures fixture (0.25 tick grid).
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub index: BarIndex,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn index(&self) -> BarIndex {
        self.index
    }
}

const OHLCV_PATH: &str = "tests/fixtures/data/es-5m.csv";

/// Load the reference bar series.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLC record")
}

/// Load reference rows of any shape.
pub fn load_reference<D>(path: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    load_records(path, "invalid reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

/// Feeds every bar and hands each reference row its matching output.
///
/// Reference rows are matched by bar index; bars without a row are fed
/// but not checked. Panics unless every row was visited.
pub fn walk_reference<I, R>(
    bars: &[RefBar],
    reference: &[R],
    row_index: impl Fn(&R) -> BarIndex,
    mut compute: impl FnMut(&RefBar) -> Option<I>,
    mut check: impl FnMut(&R, I, &str),
) {
    let mut ref_idx = 0;
    for bar in bars {
        let value = compute(bar);

        if ref_idx < reference.len() && bar.index == row_index(&reference[ref_idx]) {
            let row = &reference[ref_idx];
            let ctx = format!("bar {}", bar.index);
            let value = value.unwrap_or_else(|| panic!("no value at {ctx}"));
            check(row, value, &ctx);
            ref_idx += 1;
        }
    }

    assert_eq!(
        ref_idx,
        reference.len(),
        "not all reference values checked: {ref_idx}/{}",
        reference.len()
    );
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
