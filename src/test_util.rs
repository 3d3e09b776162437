use crate::{BarIndex, Ohlcv, Price};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts that two `f64` values are within an absolute tolerance.
macro_rules! assert_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (a, e, t) = ($actual, $expected, $tolerance);
        assert!(
            (a - e).abs() <= t,
            "assert_near failed: actual={a}, expected={e}, diff={}, tolerance={t}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;
pub(crate) use assert_near;

pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub index: u64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            index: 0,
        }
    }

    pub fn at(mut self, index: u64) -> Self {
        self.index = index;
        self
    }
}

/// Convenience: bar with just a close price and index (OHLC all equal to close).
pub fn bar(close: f64, index: u64) -> Bar {
    Bar::new(close, close, close, close).at(index)
}

/// Bar spanning `low..=high` that opens at `low` and closes at `high`.
pub fn range_bar(low: f64, high: f64, index: u64) -> Bar {
    Bar::new(low, high, low, high).at(index)
}

impl Ohlcv for Bar {
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
