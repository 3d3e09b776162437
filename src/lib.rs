//! Streaming confluence signals from five technical indicators.
//!
//! Every indicator accepts any type implementing [`Ohlcv`], is fed one bar
//! at a time, and keeps only the state it needs for the next bar. The
//! [`ConfluenceEngine`] runs the Waddah-Attar explosion, MACD, Fisher
//! Transform, Hull moving average and Parabolic SAR side by side and
//! places a buy or sell marker when every enabled indicator agrees.
//!
//! Each indicator type ([`WaddahExplosion`], [`MacdCross`],
//! [`FisherTransform`], [`HullMovingAverage`], [`ParabolicSar`],
//! [`ConfluenceEngine`]) exposes [`new`](MacdCross::new),
//! [`compute`](MacdCross::compute), and [`value`](MacdCross::value) as
//! inherent methods, so no trait import is needed. Import [`Indicator`]
//! only for generic code.
//!
//! The building blocks ([`Ema`], [`Wma`], [`RollingStdDev`],
//! [`RollingHigh`], [`RollingLow`], [`RollingWindow`]) are plain scalar
//! filters fed with prices rather than bars.
//!
//! Host parameter records deserialize into [`ConfluenceParams`] and are
//! validated by converting into a [`ConfluenceConfig`].
//!
//! The crate logs through [`tracing`] at `debug` level (SAR reversals and
//! emitted markers) and never installs a subscriber.

mod confluence;
mod ema;
mod error;
mod extremum;
mod factor;
mod fisher;
mod hull;
mod indicator;
mod macd;
mod ohlcv;
mod params;
mod price_source;
mod psar;
mod rolling_window;
mod std_dev;
mod waddah;
mod wma;

pub use crate::error::ConfigError;
pub use crate::factor::{Factor, Threshold};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{BarIndex, Ohlcv, Price};
pub use crate::params::ConfluenceParams;
pub use crate::price_source::PriceSource;

pub use crate::ema::Ema;
pub use crate::extremum::{RollingExtremum, RollingHigh, RollingLow};
pub use crate::rolling_window::RollingWindow;
pub use crate::std_dev::RollingStdDev;
pub use crate::wma::Wma;

pub use crate::confluence::{
    ConfluenceConfig, ConfluenceConfigBuilder, ConfluenceEngine, ConfluenceValue, Enabled, Marker,
};
pub use crate::fisher::{FisherConfig, FisherConfigBuilder, FisherTransform, FisherValue};
pub use crate::hull::{HullConfig, HullConfigBuilder, HullMovingAverage, HullValue};
pub use crate::macd::{MacdConfig, MacdConfigBuilder, MacdCross, MacdValue};
pub use crate::psar::{ParabolicSar, PsarConfig, PsarConfigBuilder, SarValue, Trend};
pub use crate::waddah::{
    WaddahConfig, WaddahConfigBuilder, WaddahExplosion, WaddahPhase, WaddahValue,
};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, kline: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, kline)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(WaddahExplosion, WaddahConfig, WaddahValue);
impl_indicator_methods!(MacdCross, MacdConfig, MacdValue);
impl_indicator_methods!(FisherTransform, FisherConfig, FisherValue);
impl_indicator_methods!(HullMovingAverage, HullConfig, HullValue);
impl_indicator_methods!(ParabolicSar, PsarConfig, SarValue);
impl_indicator_methods!(ConfluenceEngine, ConfluenceConfig, ConfluenceValue);

#[cfg(test)]
mod test_util;
