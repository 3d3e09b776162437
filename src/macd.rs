use std::{fmt::Display, num::NonZero};

use crate::{
    Ema, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    ohlcv::BarCursor,
};

const DEFAULT_FAST_LENGTH: NonZero<usize> = NonZero::new(3).unwrap();
const DEFAULT_SLOW_LENGTH: NonZero<usize> = NonZero::new(10).unwrap();
const DEFAULT_SIGNAL_LENGTH: NonZero<usize> = NonZero::new(16).unwrap();

/// Configuration for the [`MacdCross`] indicator.
///
/// Defaults: fast 3, slow 10, signal 16, close price.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast_length: NonZero<usize>,
    slow_length: NonZero<usize>,
    signal_length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }
}

impl MacdConfig {
    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    #[inline]
    #[must_use]
    pub fn fast_length(&self) -> usize {
        self.fast_length.get()
    }

    #[inline]
    #[must_use]
    pub fn slow_length(&self) -> usize {
        self.slow_length.get()
    }

    #[inline]
    #[must_use]
    pub fn signal_length(&self) -> usize {
        self.signal_length.get()
    }

    /// MACD on closing price with the given periods.
    #[must_use]
    pub fn close(fast: NonZero<usize>, slow: NonZero<usize>, signal: NonZero<usize>) -> Self {
        Self::builder()
            .fast_length(fast)
            .slow_length(slow)
            .signal_length(signal)
            .build()
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast_length, self.slow_length, self.signal_length, self.source
        )
    }
}

/// Builder for [`MacdConfig`], preloaded with the defaults.
pub struct MacdConfigBuilder {
    fast_length: NonZero<usize>,
    slow_length: NonZero<usize>,
    signal_length: NonZero<usize>,
    source: PriceSource,
}

impl MacdConfigBuilder {
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
            signal_length: DEFAULT_SIGNAL_LENGTH,
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
    pub fn signal_length(mut self, length: NonZero<usize>) -> Self {
        self.signal_length = length;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn build(self) -> MacdConfig {
        MacdConfig {
            fast_length: self.fast_length,
            slow_length: self.slow_length,
            signal_length: self.signal_length,
            source: self.source,
        }
    }
}

/// MACD line and its signal line for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    macd: Price,
    signal: Price,
}

impl MacdValue {
    /// `EMA_fast − EMA_slow`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// `macd − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Price {
        self.macd - self.signal
    }

    /// MACD line above its signal line.
    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.macd > self.signal
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MACD(m: {}, s: {})", self.macd, self.signal)
    }
}

/// MACD with a bullish/bearish side flag.
///
/// ```text
/// macd   = EMA_fast(p) − EMA_slow(p)
/// signal = EMA_signal(macd)
/// ```
///
/// Bullish while `macd > signal`. Only the side of the current bar is
/// reported; crossover edges are left to the caller. All three EMAs seed
/// on the first bar, which therefore reports `macd = signal = 0`.
#[derive(Clone, Debug)]
pub struct MacdCross {
    config: MacdConfig,
    fast: Ema,
    slow: Ema,
    signal: Ema,
    cursor: BarCursor,
    current: Option<MacdValue>,
}

impl Indicator for MacdCross {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Ema::new(config.fast_length),
            slow: Ema::new(config.slow_length),
            signal: Ema::new(config.signal_length),
            cursor: BarCursor::default(),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        self.cursor.advance(ohlcv.index());
        let price = self.config.source.extract(ohlcv);

        let macd = self.fast.update(price) - self.slow.update(price);
        let signal = self.signal.update(macd);

        self.current = Some(MacdValue { macd, signal });
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for MacdCross {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast_length,
            self.config.slow_length,
            self.config.signal_length,
            self.config.source
        )
    }
}
