use crate::Ohlcv;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (periods, factors, price source). Configs are value types: cheap to clone,
/// compare, and hash. Builders start from the default parameters, so a
/// config can always be built without setting anything.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder preloaded with default parameters.
    fn builder() -> Self::Builder;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Builds the config.
    #[must_use]
    fn build(self) -> Config;
}

/// A streaming technical indicator.
///
/// Indicators maintain internal state and update incrementally on each call to
/// [`compute`](Indicator::compute), which must be fed every bar of the series
/// exactly once, in order. Output is `None` while the indicator has nothing
/// meaningful to report yet.
///
/// # Example
///
/// ```
/// use confluence_ta::{Indicator, IndicatorConfig, MacdCross, MacdConfig};
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
/// let mut macd = MacdCross::new(MacdConfig::default());
///
/// let first = macd.compute(&Bar(10.0, 0)).unwrap();
/// assert_eq!(first.macd(), 0.0);
/// assert!(!first.is_bullish());
///
/// let rising = macd.compute(&Bar(12.0, 1)).unwrap();
/// assert!(rising.is_bullish());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type.
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds the next bar and returns the updated indicator value.
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<Self::Output>;

    /// Returns the last computed indicator value without advancing state.
    ///
    /// Cached field read, O(1) with no computation.
    fn value(&self) -> Option<Self::Output>;
}
