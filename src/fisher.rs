use std::{fmt::Display, num::NonZero};

use crate::{
    Factor, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, PriceSource, RollingHigh,
    RollingLow, ohlcv::BarCursor,
};

const DEFAULT_LENGTH: NonZero<usize> = NonZero::new(10).unwrap();
const DEFAULT_TICK_SIZE: Factor = Factor::new(0.25);

/// Bound on the normalized price fed to the logarithm.
const RAW_LIMIT: f64 = 0.999;

/// Configuration for the [`FisherTransform`] indicator.
///
/// Defaults: length 10, tick size 0.25, close price. The tick size only
/// sets the floor of the high-low range (`tick_size / 10`), which keeps
/// flat windows from dividing by zero.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct FisherConfig {
    length: NonZero<usize>,
    tick_size: Factor,
    source: PriceSource,
}

impl IndicatorConfig for FisherConfig {
    type Builder = FisherConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        FisherConfigBuilder::new()
    }
}

impl FisherConfig {
    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Window length of the high/low normalization.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Minimum price increment of the instrument.
    #[inline]
    #[must_use]
    pub fn tick_size(&self) -> Factor {
        self.tick_size
    }

    /// Same config for an instrument with a different tick size.
    #[inline]
    #[must_use]
    pub fn with_tick_size(mut self, tick_size: Factor) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Smallest range the price is normalized against.
    #[inline]
    #[must_use]
    pub fn min_range(&self) -> f64 {
        self.tick_size.value() / 10.0
    }
}

impl Default for FisherConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for FisherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FisherConfig({}, {}, {})",
            self.length, self.tick_size, self.source
        )
    }
}

/// Builder for [`FisherConfig`], preloaded with the defaults.
pub struct FisherConfigBuilder {
    length: NonZero<usize>,
    tick_size: Factor,
    source: PriceSource,
}

impl FisherConfigBuilder {
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
            tick_size: DEFAULT_TICK_SIZE,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn tick_size(mut self, tick_size: Factor) -> Self {
        self.tick_size = tick_size;
        self
    }
}

impl IndicatorConfigBuilder<FisherConfig> for FisherConfigBuilder {
    #[inline]
    fn build(self) -> FisherConfig {
        FisherConfig {
            length: self.length,
            tick_size: self.tick_size,
            source: self.source,
        }
    }
}

/// Fisher Transform output for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherValue {
    fisher: f64,
    trigger: f64,
    normalized: f64,
}

impl FisherValue {
    #[inline]
    #[must_use]
    pub fn fisher(&self) -> f64 {
        self.fisher
    }

    /// Previous bar's Fisher value.
    #[inline]
    #[must_use]
    pub fn trigger(&self) -> f64 {
        self.trigger
    }

    /// Smoothed price position fed to the logarithm, within `±0.999`.
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> f64 {
        self.normalized
    }

    /// Fisher value above its previous value.
    #[inline]
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.fisher > self.trigger
    }
}

impl Display for FisherValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fisher(f: {}, t: {})", self.fisher, self.trigger)
    }
}

/// Ehlers' Fisher Transform.
///
/// Normalizes the price into its trailing high-low range, smooths it, and
/// applies the inverse hyperbolic tangent:
///
/// ```text
/// range  = max(highest − lowest, tick_size / 10)
/// raw    = 0.66 × ((p − lowest) / range − 0.5) + 0.67 × prev_raw
/// raw    = clamp(raw, −0.999, 0.999)
/// fisher = 0.5 × ln((1 + raw) / (1 − raw)) + 0.5 × prev_fisher
/// ```
///
/// The clamp keeps the logarithm finite: at `raw = ±1` it diverges. The
/// range floor keeps flat windows finite. Together they make the output
/// finite for every finite input. Both recurrences start from `0`.
///
/// # Example
///
/// ```
/// use confluence_ta::{FisherConfig, FisherTransform};
/// # use confluence_ta::{BarIndex, Ohlcv, Price};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn index(&self) -> BarIndex { self.1 }
/// # }
///
/// let mut fisher = FisherTransform::new(FisherConfig::default());
///
/// for i in 0..20 {
///     let v = fisher.compute(&Bar(100.0, i)).unwrap();
///     assert!(v.fisher().is_finite());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct FisherTransform {
    config: FisherConfig,
    highest: RollingHigh,
    lowest: RollingLow,
    prior_raw: f64,
    prior_fisher: f64,
    cursor: BarCursor,
    current: Option<FisherValue>,
}

impl Indicator for FisherTransform {
    type Config = FisherConfig;
    type Output = FisherValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            highest: RollingHigh::bounded(config.length),
            lowest: RollingLow::bounded(config.length),
            prior_raw: 0.0,
            prior_fisher: 0.0,
            cursor: BarCursor::default(),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        self.cursor.advance(ohlcv.index());
        let price = self.config.source.extract(ohlcv);

        self.highest.push(price);
        self.lowest.push(price);
        let highest = self.highest.current().unwrap_or(price);
        let lowest = self.lowest.current().unwrap_or(price);

        let range = (highest - lowest).max(self.config.min_range());
        let raw = 0.66f64
            .mul_add((price - lowest) / range - 0.5, 0.67 * self.prior_raw)
            .clamp(-RAW_LIMIT, RAW_LIMIT);
        let fisher = 0.5f64.mul_add(((1.0 + raw) / (1.0 - raw)).ln(), 0.5 * self.prior_fisher);

        let value = FisherValue {
            fisher,
            trigger: self.prior_fisher,
            normalized: raw,
        };

        self.prior_raw = raw;
        self.prior_fisher = fisher;
        self.current = Some(value);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for FisherTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fisher({}, {}, {})",
            self.config.length, self.config.tick_size, self.config.source
        )
    }
}
