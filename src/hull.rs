use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Wma,
    ohlcv::BarCursor,
};

const DEFAULT_LENGTH: NonZero<usize> = NonZero::new(14).unwrap();

/// Configuration for the [`HullMovingAverage`] indicator.
///
/// Defaults: length 14, close price.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct HullConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for HullConfig {
    type Builder = HullConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        HullConfigBuilder::new()
    }
}

impl HullConfig {
    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Period of the fast WMA: `length / 2`, rounded.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn half_length(&self) -> usize {
        Wma::round_period(self.length.get() as f64 / 2.0).get()
    }

    /// Period of the smoothing WMA: `√length`, rounded.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn sqrt_length(&self) -> usize {
        Wma::round_period((self.length.get() as f64).sqrt()).get()
    }

    /// HMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for HullConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for HullConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HullConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`HullConfig`], preloaded with the defaults.
pub struct HullConfigBuilder {
    length: NonZero<usize>,
    source: PriceSource,
}

impl HullConfigBuilder {
    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length;
        self
    }
}

impl IndicatorConfigBuilder<HullConfig> for HullConfigBuilder {
    #[inline]
    fn build(self) -> HullConfig {
        HullConfig {
            length: self.length,
            source: self.source,
        }
    }
}

/// Hull Moving Average output for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullValue {
    hma: Price,
    price: Price,
}

impl HullValue {
    #[inline]
    #[must_use]
    pub fn hma(&self) -> Price {
        self.hma
    }

    /// Price the HMA was compared against.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Price above the HMA.
    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.price > self.hma
    }
}

impl Display for HullValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HMA({})", self.hma)
    }
}

/// Hull Moving Average (HMA).
///
/// Cancels most of a WMA's lag by extrapolating from a half-length WMA,
/// then smooths the result over `√length` bars:
///
/// ```text
/// long  = WMA(n)(p)
/// short = 2 × WMA(n / 2)(p)
/// hma   = WMA(√n)(short − long)
/// ```
///
/// Derived periods follow [`Wma::fractional`] rounding. The three WMAs
/// are independent filters, each owning its window. Bullish while the
/// price is above the HMA.
#[derive(Clone, Debug)]
pub struct HullMovingAverage {
    config: HullConfig,
    long: Wma,
    short: Wma,
    smooth: Wma,
    cursor: BarCursor,
    current: Option<HullValue>,
}

impl Indicator for HullMovingAverage {
    type Config = HullConfig;
    type Output = HullValue;

    #[allow(clippy::cast_precision_loss)]
    fn new(config: Self::Config) -> Self {
        let length = config.length.get() as f64;

        Self {
            config,
            long: Wma::new(config.length),
            short: Wma::fractional(length / 2.0),
            smooth: Wma::fractional(length.sqrt()),
            cursor: BarCursor::default(),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        self.cursor.advance(ohlcv.index());
        let price = self.config.source.extract(ohlcv);

        let long = self.long.update(price);
        let short = 2.0 * self.short.update(price);
        let hma = self.smooth.update(short - long);

        self.current = Some(HullValue { hma, price });
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for HullMovingAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HMA({}, {})", self.config.length, self.config.source)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, bar};

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn hma(length: usize) -> HullMovingAverage {
        HullMovingAverage::new(HullConfig::close(nz(length)))
    }

    mod periods {
        use super::*;

        #[test]
        fn derived_from_length() {
            let config = HullConfig::close(nz(14));
            assert_eq!(config.half_length(), 7);
            assert_eq!(config.sqrt_length(), 4);
        }

        #[test]
        fn odd_length_rounds_half_up() {
            let config = HullConfig::close(nz(9));
            assert_eq!(config.half_length(), 5);
            assert_eq!(config.sqrt_length(), 3);
        }

        #[test]
        fn length_one_keeps_one_bar_windows() {
            let config = HullConfig::close(nz(1));
            assert_eq!(config.half_length(), 1);
            assert_eq!(config.sqrt_length(), 1);
        }
    }

    mod computation {
        use super::*;

        #[test]
        fn first_bar_equals_price() {
            // every WMA seeds on p: 2p − p = p
            let mut hma = hma(14);
            let v = hma.compute(&bar(250.0, 0)).unwrap();
            assert_eq!(v.hma(), 250.0);
            assert!(!v.is_bullish());
        }

        #[test]
        fn constant_input_equals_price() {
            let mut hma = hma(14);
            for i in 0..40 {
                let v = hma.compute(&bar(99.5, i)).unwrap();
                assert_near!(v.hma(), 99.5, 1e-9);
            }
        }

        #[test]
        fn tracks_linear_trend_without_lag() {
            // On a straight line every WMA lags by a constant, and the
            // 2 × short − long extrapolation cancels it once warm.
            let mut hma = hma(4);
            let mut last = None;
            for i in 0..30_u32 {
                last = hma.compute(&bar(f64::from(i), u64::from(i)));
            }
            // WMA(n) lags a line by (n − 1) / 3:
            // 2 × (p − 1/3) − (p − 1) = p + 1/3, smoothed WMA(2) → p
            assert_near!(last.unwrap().hma(), 29.0, 1e-9);
        }

        #[test]
        fn bullish_above_hma() {
            let mut hma = hma(4);
            for i in 0..10 {
                hma.compute(&bar(100.0, i));
            }
            // long = 101.6, short = 2 × 102.67, smoothed ≈ 102.49
            let v = hma.compute(&bar(104.0, 10)).unwrap();
            assert!(v.is_bullish());
            // long = 97.2, short = 2 × 94.67, smoothed = 96
            let v = hma.compute(&bar(90.0, 11)).unwrap();
            assert!(!v.is_bullish());
        }
    }

    #[test]
    fn display() {
        assert_eq!(hma(14).to_string(), "HMA(14, Close)");
    }
}
