/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Position of a bar within its series.
///
/// Starts at `0` and must strictly increase by one call to
/// [`Indicator::compute`](crate::Indicator::compute) per bar.
pub type BarIndex = u64;

/// OHLC bar data used as input to all indicators.
///
/// Implement this on your own kline/candle type to avoid per-bar
/// conversion. Indicators accept `&impl Ohlcv` and extract the
/// configured [`PriceSource`](crate::PriceSource) internally.
///
/// # Example
///
/// ```
/// use confluence_ta::{BarIndex, Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     i: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn index(&self) -> BarIndex { self.i }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Index of the bar within the series.
    ///
    /// Every bar is fed exactly once. Behaviour is unspecified if the
    /// index does not strictly increase between calls.
    fn index(&self) -> BarIndex;
}

/// Tracks the last bar index an indicator consumed.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BarCursor {
    last: Option<BarIndex>,
    seen: u64,
}

impl BarCursor {
    /// Records `index` as consumed and returns how many bars have been
    /// seen before it.
    #[inline]
    pub(crate) fn advance(&mut self, index: BarIndex) -> BarIndex {
        debug_assert!(
            self.last.is_none_or(|last| last < index),
            "bar index must be strictly increasing: last={}, got={index}",
            self.last.unwrap_or(0),
        );

        let seen = self.seen;
        self.seen += 1;
        self.last = Some(index);
        seen
    }
}
