use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Which price of a bar a price-driven indicator consumes.
///
/// The confluence indicators default to [`Close`](Self::Close). The Parabolic
/// SAR is not configurable: it always reads the bar's high and low.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// `(high + low) / 2`.
    HL2,
    /// `(high + low + close) / 3`.
    HLC3,
    /// `(open + high + low + close) / 4`.
    OHLC4,
    /// `(high + low + 2 * close) / 4`.
    HLCC4,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, bar: &impl Ohlcv) -> Price {
        let (open, high, low, close) = (bar.open(), bar.high(), bar.low(), bar.close());
        match self {
            Self::Open => open,
            Self::High => high,
            Self::Low => low,
            Self::Close => close,
            Self::HL2 => f64::midpoint(high, low),
            Self::HLC3 => (high + low + close) / 3.0,
            Self::OHLC4 => (open + high + low + close) / 4.0,
            Self::HLCC4 => close.mul_add(2.0, high + low) / 4.0,
        }
    }
}
