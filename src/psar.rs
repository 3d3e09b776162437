use std::{fmt::Display, num::NonZero};

use crate::{
    Factor, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, RollingHigh,
    RollingLow, RollingWindow, ohlcv::BarCursor,
};

const DEFAULT_STEP: Factor = Factor::new(0.02);
const DEFAULT_MAX_STEP: Factor = Factor::new(0.2);

/// The SAR trails price from below in a rising trend and from above in a
/// falling one; it never stands inside the prior two bars.
const CLAMP_BARS: NonZero<usize> = NonZero::new(2).unwrap();

/// Configuration for the [`ParabolicSar`] indicator.
///
/// Defaults: step 0.02, max step 0.2.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct PsarConfig {
    step: Factor,
    max_step: Factor,
}

impl IndicatorConfig for PsarConfig {
    type Builder = PsarConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        PsarConfigBuilder::new()
    }
}

impl PsarConfig {
    /// Acceleration factor at the start of a trend, and its increment.
    #[inline]
    #[must_use]
    pub fn step(&self) -> Factor {
        self.step
    }

    /// Cap on the acceleration factor.
    #[inline]
    #[must_use]
    pub fn max_step(&self) -> Factor {
        self.max_step
    }
}

impl Default for PsarConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for PsarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PsarConfig({}, {})", self.step, self.max_step)
    }
}

/// Builder for [`PsarConfig`], preloaded with the defaults.
pub struct PsarConfigBuilder {
    step: Factor,
    max_step: Factor,
}

impl PsarConfigBuilder {
    fn new() -> Self {
        Self {
            step: DEFAULT_STEP,
            max_step: DEFAULT_MAX_STEP,
        }
    }

    #[inline]
    #[must_use]
    pub fn step(mut self, step: Factor) -> Self {
        self.step = step;
        self
    }

    #[inline]
    #[must_use]
    pub fn max_step(mut self, max_step: Factor) -> Self {
        self.max_step = max_step;
        self
    }
}

impl IndicatorConfigBuilder<PsarConfig> for PsarConfigBuilder {
    /// # Panics
    ///
    /// Panics if `max_step` is below `step`.
    fn build(self) -> PsarConfig {
        assert!(
            self.max_step.value() >= self.step.value(),
            "max_step must not be below step"
        );
        PsarConfig {
            step: self.step,
            max_step: self.max_step,
        }
    }
}

/// Direction the SAR is trailing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    /// SAR below price.
    Rising,
    /// SAR above price.
    Falling,
}

impl Trend {
    #[inline]
    #[must_use]
    pub fn is_rising(self) -> bool {
        self == Trend::Rising
    }
}

/// Parabolic SAR output for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarValue {
    sar: Price,
    trend: Trend,
    reversed: bool,
}

impl SarValue {
    /// Stop-and-reverse level.
    #[inline]
    #[must_use]
    pub fn sar(&self) -> Price {
        self.sar
    }

    #[inline]
    #[must_use]
    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// The trend flipped on this bar.
    #[inline]
    #[must_use]
    pub fn is_reversal(&self) -> bool {
        self.reversed
    }

    /// Rising trend.
    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.trend.is_rising()
    }
}

impl Display for SarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PSAR(s: {}, {:?})", self.sar, self.trend)
    }
}

/// Where the SAR state machine stands. Exactly one trend carries a SAR.
#[derive(Clone, Copy, Debug)]
enum Phase {
    Seeding,
    Rising { sar: Price, af: f64 },
    Falling { sar: Price, af: f64 },
}

impl Phase {
    fn live(trend: Trend, sar: Price, af: f64) -> Self {
        match trend {
            Trend::Rising => Phase::Rising { sar, af },
            Trend::Falling => Phase::Falling { sar, af },
        }
    }
}

/// Wilder's Parabolic Stop-and-Reverse.
///
/// Starts in a rising trend once two bars are known, with the SAR at the
/// lowest low seen. Each following bar moves the SAR toward the extreme
/// point of the trend:
///
/// ```text
/// sar' = sar + af × (extreme − sar)
/// ```
///
/// A rising SAR is capped at the lowest of the prior two lows, a falling
/// one floored at the highest of the prior two highs. When the clamped
/// value crosses back over the previous SAR the trend reverses: the new
/// SAR trails from the old extreme, the acceleration factor restarts at
/// `step`, and the extreme tracking restarts from the reversal bar.
/// Otherwise the factor grows by `step`, up to `max_step`, each time the
/// bar makes a new extreme.
///
/// The first bar yields `None`.
///
/// # Example
///
/// ```
/// use confluence_ta::{ParabolicSar, PsarConfig, Trend};
/// # use confluence_ta::{BarIndex, Ohlcv, Price};
/// #
/// # struct Bar(f64, f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.1 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.1 }
/// #     fn index(&self) -> BarIndex { self.2 }
/// # }
///
/// let mut psar = ParabolicSar::new(PsarConfig::default());
///
/// assert!(psar.compute(&Bar(100.0, 101.0, 0)).is_none());
/// for i in 1..10 {
///     let low = 100.0 + i as f64;
///     let v = psar.compute(&Bar(low, low + 1.0, i)).unwrap();
///     assert_eq!(v.trend(), Trend::Rising);
///     assert!(v.sar() <= low);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ParabolicSar {
    config: PsarConfig,
    phase: Phase,
    highest: RollingHigh,
    lowest: RollingLow,
    recent: RollingWindow<(Price, Price)>,
    cursor: BarCursor,
    current: Option<SarValue>,
}

impl ParabolicSar {
    /// Bars since the current trend started, including the bar that started it.
    #[inline]
    #[must_use]
    pub fn trend_len(&self) -> usize {
        self.highest.len()
    }

    /// Extreme point of the current trend.
    #[must_use]
    pub fn extreme(&self) -> Option<Price> {
        match self.phase {
            Phase::Seeding => None,
            Phase::Rising { .. } => self.highest.current(),
            Phase::Falling { .. } => self.lowest.current(),
        }
    }

    /// Current acceleration factor.
    #[must_use]
    pub fn acceleration(&self) -> Option<f64> {
        match self.phase {
            Phase::Seeding => None,
            Phase::Rising { af, .. } | Phase::Falling { af, .. } => Some(af),
        }
    }

    /// Lowest of the prior two lows.
    fn floor(&self) -> Price {
        self.recent
            .iter()
            .map(|(_, low)| low)
            .fold(f64::INFINITY, f64::min)
    }

    /// Highest of the prior two highs.
    fn ceiling(&self) -> Price {
        self.recent
            .iter()
            .map(|(high, _)| high)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn trail(&self, trend: Trend, sar: Price, af: f64) -> Price {
        match trend {
            Trend::Rising => {
                let extreme = self.highest.current().unwrap_or(sar);
                af.mul_add(extreme - sar, sar).min(self.floor())
            }
            Trend::Falling => {
                let extreme = self.lowest.current().unwrap_or(sar);
                af.mul_add(extreme - sar, sar).max(self.ceiling())
            }
        }
    }

    fn accelerate(&self, af: f64) -> f64 {
        (af + self.config.step.value()).min(self.config.max_step.value())
    }

    fn extend(&mut self, high: Price, low: Price) {
        self.highest.push(high);
        self.lowest.push(low);
    }

    /// Advances a live trend by one bar.
    fn step(&mut self, trend: Trend, sar: Price, af: f64, high: Price, low: Price) -> SarValue {
        let candidate = self.trail(trend, sar, af);
        let reversed = match trend {
            Trend::Rising => candidate < sar,
            Trend::Falling => candidate > sar,
        };

        if reversed {
            let (extreme, trend) = match trend {
                Trend::Rising => (self.highest.current(), Trend::Falling),
                Trend::Falling => (self.lowest.current(), Trend::Rising),
            };

            self.highest.reseed(high);
            self.lowest.reseed(low);

            let af = self.config.step.value();
            let sar = self.trail(trend, extreme.unwrap_or(sar), af);
            self.phase = Phase::live(trend, sar, af);
            tracing::debug!(sar, to = ?trend, "parabolic sar reversal");

            return SarValue {
                sar,
                trend,
                reversed: true,
            };
        }

        let extends = match trend {
            Trend::Rising => self.highest.current().is_none_or(|h| high > h),
            Trend::Falling => self.lowest.current().is_none_or(|l| low < l),
        };
        let af = if extends { self.accelerate(af) } else { af };
        self.phase = Phase::live(trend, candidate, af);
        self.extend(high, low);

        SarValue {
            sar: candidate,
            trend,
            reversed: false,
        }
    }
}

impl Indicator for ParabolicSar {
    type Config = PsarConfig;
    type Output = SarValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            phase: Phase::Seeding,
            highest: RollingHigh::unbounded(),
            lowest: RollingLow::unbounded(),
            recent: RollingWindow::new(CLAMP_BARS),
            cursor: BarCursor::default(),
            current: None,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        let seen = self.cursor.advance(ohlcv.index());
        let (high, low) = (ohlcv.high(), ohlcv.low());

        self.current = match self.phase {
            Phase::Seeding if seen == 0 => {
                self.extend(high, low);
                None
            }
            Phase::Seeding => {
                self.extend(high, low);
                let sar = self.lowest.current().unwrap_or(low);
                self.phase = Phase::Rising {
                    sar,
                    af: self.config.step.value(),
                };
                Some(SarValue {
                    sar,
                    trend: Trend::Rising,
                    reversed: false,
                })
            }
            Phase::Rising { sar, af } => Some(self.step(Trend::Rising, sar, af, high, low)),
            Phase::Falling { sar, af } => Some(self.step(Trend::Falling, sar, af, high, low)),
        };

        self.recent.push((high, low));
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for ParabolicSar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PSAR({}, {})", self.config.step, self.config.max_step)
    }
}
