use std::{fmt::Display, num::NonZero};

use crate::{
    Ema, Factor, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    RollingStdDev, ohlcv::BarCursor,
};

const DEFAULT_FAST_LENGTH: NonZero<usize> = NonZero::new(20).unwrap();
const DEFAULT_SLOW_LENGTH: NonZero<usize> = NonZero::new(40).unwrap();
const DEFAULT_BB_LENGTH: NonZero<usize> = NonZero::new(20).unwrap();
const DEFAULT_DEVIATION: Factor = Factor::new(2.0);
const DEFAULT_SENSITIVITY: Factor = Factor::new(150.0);

/// Configuration for the Waddah-Attar explosion ([`WaddahExplosion`])
/// indicator.
///
/// Defaults: fast EMA 20, slow EMA 40, Bollinger length 20, deviation 2,
/// sensitivity 150, close price.
///
/// # Example
///
/// ```
/// use confluence_ta::{Factor, IndicatorConfig, IndicatorConfigBuilder, WaddahConfig};
/// use std::num::NonZero;
///
/// let config = WaddahConfig::builder()
///     .fast_length(NonZero::new(12).unwrap())
///     .sensitivity(Factor::new(100.0))
///     .build();
///
/// assert_eq!(config.fast_length(), 12);
/// assert_eq!(config.slow_length(), 40);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct WaddahConfig {
    fast_length: NonZero<usize>,
    slow_length: NonZero<usize>,
    bb_length: NonZero<usize>,
    deviation: Factor,
    sensitivity: Factor,
    source: PriceSource,
}

impl IndicatorConfig for WaddahConfig {
    type Builder = WaddahConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        WaddahConfigBuilder::new()
    }
}

impl WaddahConfig {
    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Fast EMA period of the momentum MACD.
    #[inline]
    #[must_use]
    pub fn fast_length(&self) -> usize {
        self.fast_length.get()
    }

    /// Slow EMA period of the momentum MACD.
    #[inline]
    #[must_use]
    pub fn slow_length(&self) -> usize {
        self.slow_length.get()
    }

    /// Bollinger window length of the explosion line.
    #[inline]
    #[must_use]
    pub fn bb_length(&self) -> usize {
        self.bb_length.get()
    }

    /// Standard deviations from the mean to each Bollinger band.
    #[inline]
    #[must_use]
    pub fn deviation(&self) -> Factor {
        self.deviation
    }

    /// Multiplier applied to the MACD rate of change.
    #[inline]
    #[must_use]
    pub fn sensitivity(&self) -> Factor {
        self.sensitivity
    }
}

impl Default for WaddahConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for WaddahConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WaddahConfig({}, {}, {}, {}, {}, {})",
            self.fast_length,
            self.slow_length,
            self.bb_length,
            self.deviation,
            self.sensitivity,
            self.source
        )
    }
}

/// Builder for [`WaddahConfig`], preloaded with the defaults.
pub struct WaddahConfigBuilder {
    fast_length: NonZero<usize>,
    slow_length: NonZero<usize>,
    bb_length: NonZero<usize>,
    deviation: Factor,
    sensitivity: Factor,
    source: PriceSource,
}

impl WaddahConfigBuilder {
    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    fn new() -> Self {
        Self {
            fast_length: DEFAULT_FAST_LENGTH,
            slow_length: DEFAULT_SLOW_LENGTH,
            bb_length: DEFAULT_BB_LENGTH,
            deviation: DEFAULT_DEVIATION,
            sensitivity: DEFAULT_SENSITIVITY,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast_length(mut self, length: NonZero<usize>) -> Self {
        self.fast_length = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn slow_length(mut self, length: NonZero<usize>) -> Self {
        self.slow_length = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn bb_length(mut self, length: NonZero<usize>) -> Self {
        self.bb_length = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn deviation(mut self, deviation: Factor) -> Self {
        self.deviation = deviation;
        self
    }

    #[inline]
    #[must_use]
    pub fn sensitivity(mut self, sensitivity: Factor) -> Self {
        self.sensitivity = sensitivity;
        self
    }
}

impl IndicatorConfigBuilder<WaddahConfig> for WaddahConfigBuilder {
    #[inline]
    fn build(self) -> WaddahConfig {
        WaddahConfig {
            fast_length: self.fast_length,
            slow_length: self.slow_length,
            bb_length: self.bb_length,
            deviation: self.deviation,
            sensitivity: self.sensitivity,
            source: self.source,
        }
    }
}

/// How strongly a bar explodes, for candle colouring style consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaddahPhase {
    /// No explosion, or momentum inside the dead zone.
    Neutral,
    /// Rising momentum that is still accelerating.
    StrongBull,
    /// Rising momentum that is fading.
    WeakBull,
    /// Falling momentum that is still accelerating downwards.
    StrongBear,
    /// Falling momentum that is fading.
    WeakBear,
}

/// Waddah-Attar explosion output for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaddahValue {
    value: f64,
    explosion_line: f64,
    roc: f64,
    prior_roc: f64,
}

impl WaddahValue {
    /// Momentum magnitude: `|roc|`.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Bollinger band width, `upper − lower`.
    #[inline]
    #[must_use]
    pub fn explosion_line(&self) -> f64 {
        self.explosion_line
    }

    /// Signed MACD rate of change scaled by sensitivity.
    #[inline]
    #[must_use]
    pub fn roc(&self) -> f64 {
        self.roc
    }

    /// Momentum points up (`roc ≥ 0`).
    #[inline]
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.roc >= 0.0
    }

    /// Momentum magnitude breaks out of the Bollinger width.
    #[inline]
    #[must_use]
    pub fn is_explosion(&self) -> bool {
        self.value > self.explosion_line
    }

    /// Rate of change grew since the previous bar.
    #[inline]
    #[must_use]
    pub fn is_accelerating(&self) -> bool {
        self.roc > self.prior_roc
    }

    /// Classifies the bar against `dead_zone`.
    #[must_use]
    pub fn phase(&self, dead_zone: f64) -> WaddahPhase {
        if !self.is_explosion() || self.value < dead_zone {
            WaddahPhase::Neutral
        } else if self.is_up() {
            if self.is_accelerating() {
                WaddahPhase::StrongBull
            } else {
                WaddahPhase::WeakBull
            }
        } else if self.is_accelerating() {
            WaddahPhase::WeakBear
        } else {
            WaddahPhase::StrongBear
        }
    }
}

impl Display for WaddahValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WAE(v: {}, e: {}, roc: {})",
            self.value, self.explosion_line, self.roc
        )
    }
}

/// Waddah-Attar explosion.
///
/// Compares the rate of change of a fast/slow EMA spread against the width
/// of Bollinger bands on the same price:
///
/// ```text
/// macd  = EMA_fast(p) − EMA_slow(p)
/// roc   = (macd − prev_macd) × sensitivity
/// value = |roc|
/// line  = (mean + k × σ) − (mean − k × σ)
/// ```
///
/// A bar is an explosion when `value > line`. `prev_macd` starts at `0`
/// and advances every bar. Both EMAs seed on the first bar, so the first
/// output has `roc = 0`.
///
/// # Example
///
/// ```
/// use confluence_ta::{WaddahConfig, WaddahExplosion};
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
/// let mut wae = WaddahExplosion::new(WaddahConfig::default());
///
/// let first = wae.compute(&Bar(100.0, 0)).unwrap();
/// assert_eq!(first.value(), 0.0);
///
/// let jump = wae.compute(&Bar(110.0, 1)).unwrap();
/// assert!(jump.is_up());
/// ```
#[derive(Clone, Debug)]
pub struct WaddahExplosion {
    config: WaddahConfig,
    fast: Ema,
    slow: Ema,
    std_dev: RollingStdDev,
    prior_macd: f64,
    prior_roc: f64,
    cursor: BarCursor,
    current: Option<WaddahValue>,
}

impl Indicator for WaddahExplosion {
    type Config = WaddahConfig;
    type Output = WaddahValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Ema::new(config.fast_length),
            slow: Ema::new(config.slow_length),
            std_dev: RollingStdDev::new(config.bb_length),
            prior_macd: 0.0,
            prior_roc: 0.0,
            cursor: BarCursor::default(),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        self.cursor.advance(ohlcv.index());
        let price: Price = self.config.source.extract(ohlcv);

        let std_dev = self.std_dev.update(price);
        let mean = self.std_dev.mean();
        let half_width = std_dev * self.config.deviation.value();
        let explosion_line = (mean + half_width) - (mean - half_width);

        let macd = self.fast.update(price) - self.slow.update(price);
        let roc = (macd - self.prior_macd) * self.config.sensitivity.value();

        let value = WaddahValue {
            value: roc.abs(),
            explosion_line,
            roc,
            prior_roc: self.prior_roc,
        };

        self.prior_macd = macd;
        self.prior_roc = roc;
        self.current = Some(value);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for WaddahExplosion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WAE({}, {}, {}, {}, {}, {})",
            self.config.fast_length,
            self.config.slow_length,
            self.config.bb_length,
            self.config.deviation,
            self.config.sensitivity,
            self.config.source
        )
    }
}
