use std::fmt::Display;

use crate::{
    Factor, FisherConfig, FisherTransform, FisherValue, HullConfig, HullMovingAverage, HullValue,
    Indicator, IndicatorConfig, IndicatorConfigBuilder, MacdConfig, MacdCross, MacdValue, Ohlcv,
    ParabolicSar, Price, PsarConfig, SarValue, Threshold, Trend, WaddahConfig, WaddahExplosion,
    WaddahValue, ohlcv::BarCursor,
};

const DEFAULT_DEAD_ZONE: Threshold = Threshold::new(20.0);
const DEFAULT_DOT_OFFSET: Threshold = Threshold::new(10.0);

/// Which indicators take part in the vote.
///
/// A disabled indicator is still computed and reported, but its vote
/// passes in both directions. Disabling Waddah also drops the explosion
/// requirement from the gate; the dead zone still applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct Enabled {
    pub macd: bool,
    pub psar: bool,
    pub fisher: bool,
    pub waddah: bool,
    pub hma: bool,
}

impl Enabled {
    /// Every indicator votes.
    pub const ALL: Self = Self {
        macd: true,
        psar: true,
        fisher: true,
        waddah: true,
        hma: true,
    };

    /// No indicator votes: every gated bar emits a marker.
    pub const NONE: Self = Self {
        macd: false,
        psar: false,
        fisher: false,
        waddah: false,
        hma: false,
    };
}

impl Default for Enabled {
    fn default() -> Self {
        Self::ALL
    }
}

/// Configuration for the [`ConfluenceEngine`].
///
/// Bundles one config per indicator with the gate and marker settings.
/// Defaults: every indicator at its own defaults, dead zone 20, marker
/// offset 10 ticks, tick size 0.25, all indicators enabled.
///
/// The tick size is shared: it floors the Fisher range and scales the
/// marker offset, so it lives on the Fisher config.
///
/// # Example
///
/// ```
/// use confluence_ta::{ConfluenceConfig, Enabled, Factor, IndicatorConfig, IndicatorConfigBuilder, Threshold};
///
/// let config = ConfluenceConfig::builder()
///     .tick_size(Factor::new(0.1))
///     .dead_zone(Threshold::new(5.0))
///     .enabled(Enabled { fisher: false, ..Enabled::ALL })
///     .build();
///
/// assert_eq!(config.tick_size().value(), 0.1);
/// assert_eq!(config.fisher().tick_size().value(), 0.1);
/// assert!(!config.enabled().fisher);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct ConfluenceConfig {
    waddah: WaddahConfig,
    macd: MacdConfig,
    fisher: FisherConfig,
    hull: HullConfig,
    psar: PsarConfig,
    dead_zone: Threshold,
    dot_offset: Threshold,
    enabled: Enabled,
}

impl IndicatorConfig for ConfluenceConfig {
    type Builder = ConfluenceConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        ConfluenceConfigBuilder::new()
    }
}

impl ConfluenceConfig {
    #[inline]
    #[must_use]
    pub fn waddah(&self) -> WaddahConfig {
        self.waddah
    }

    #[inline]
    #[must_use]
    pub fn macd(&self) -> MacdConfig {
        self.macd
    }

    #[inline]
    #[must_use]
    pub fn fisher(&self) -> FisherConfig {
        self.fisher
    }

    #[inline]
    #[must_use]
    pub fn hull(&self) -> HullConfig {
        self.hull
    }

    #[inline]
    #[must_use]
    pub fn psar(&self) -> PsarConfig {
        self.psar
    }

    /// Minimum Waddah momentum for a bar to be considered at all.
    #[inline]
    #[must_use]
    pub fn dead_zone(&self) -> Threshold {
        self.dead_zone
    }

    /// Marker distance from the bar, in ticks.
    #[inline]
    #[must_use]
    pub fn dot_offset(&self) -> Threshold {
        self.dot_offset
    }

    #[inline]
    #[must_use]
    pub fn tick_size(&self) -> Factor {
        self.fisher.tick_size()
    }

    #[inline]
    #[must_use]
    pub fn enabled(&self) -> Enabled {
        self.enabled
    }

    /// Marker distance from the bar, in price units.
    #[inline]
    #[must_use]
    pub fn marker_offset(&self) -> Price {
        self.tick_size().value() * self.dot_offset.value()
    }
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for ConfluenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConfluenceConfig({}, {}, {}, {}, {}, dz: {}, offset: {})",
            self.waddah,
            self.macd,
            self.fisher,
            self.hull,
            self.psar,
            self.dead_zone,
            self.dot_offset
        )
    }
}

/// Builder for [`ConfluenceConfig`], preloaded with the defaults.
pub struct ConfluenceConfigBuilder {
    waddah: WaddahConfig,
    macd: MacdConfig,
    fisher: FisherConfig,
    hull: HullConfig,
    psar: PsarConfig,
    dead_zone: Threshold,
    dot_offset: Threshold,
    tick_size: Option<Factor>,
    enabled: Enabled,
}

impl ConfluenceConfigBuilder {
    fn new() -> Self {
        Self {
            waddah: WaddahConfig::default(),
            macd: MacdConfig::default(),
            fisher: FisherConfig::default(),
            hull: HullConfig::default(),
            psar: PsarConfig::default(),
            dead_zone: DEFAULT_DEAD_ZONE,
            dot_offset: DEFAULT_DOT_OFFSET,
            tick_size: None,
            enabled: Enabled::ALL,
        }
    }

    #[inline]
    #[must_use]
    pub fn waddah(mut self, config: WaddahConfig) -> Self {
        self.waddah = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn macd(mut self, config: MacdConfig) -> Self {
        self.macd = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn fisher(mut self, config: FisherConfig) -> Self {
        self.fisher = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn hull(mut self, config: HullConfig) -> Self {
        self.hull = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn psar(mut self, config: PsarConfig) -> Self {
        self.psar = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn dead_zone(mut self, dead_zone: Threshold) -> Self {
        self.dead_zone = dead_zone;
        self
    }

    #[inline]
    #[must_use]
    pub fn dot_offset(mut self, dot_offset: Threshold) -> Self {
        self.dot_offset = dot_offset;
        self
    }

    /// Overrides the tick size of the Fisher config, whenever it is set.
    #[inline]
    #[must_use]
    pub fn tick_size(mut self, tick_size: Factor) -> Self {
        self.tick_size = Some(tick_size);
        self
    }

    #[inline]
    #[must_use]
    pub fn enabled(mut self, enabled: Enabled) -> Self {
        self.enabled = enabled;
        self
    }
}

impl IndicatorConfigBuilder<ConfluenceConfig> for ConfluenceConfigBuilder {
    fn build(self) -> ConfluenceConfig {
        let fisher = match self.tick_size {
            Some(tick_size) => self.fisher.with_tick_size(tick_size),
            None => self.fisher,
        };

        ConfluenceConfig {
            waddah: self.waddah,
            macd: self.macd,
            fisher,
            hull: self.hull,
            psar: self.psar,
            dead_zone: self.dead_zone,
            dot_offset: self.dot_offset,
            enabled: self.enabled,
        }
    }
}

/// Trade marker placed outside the bar's range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    /// Every enabled indicator is bullish; placed below the low.
    Bullish(Price),
    /// Every enabled indicator is bearish; placed above the high.
    Bearish(Price),
}

impl Marker {
    #[inline]
    #[must_use]
    pub fn price(self) -> Price {
        match self {
            Marker::Bullish(price) | Marker::Bearish(price) => price,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bullish(self) -> bool {
        matches!(self, Marker::Bullish(_))
    }
}

/// Every indicator's output for one bar, plus the marker if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfluenceValue {
    waddah: WaddahValue,
    macd: MacdValue,
    fisher: FisherValue,
    hull: HullValue,
    psar: Option<SarValue>,
    marker: Option<Marker>,
}

impl ConfluenceValue {
    #[inline]
    #[must_use]
    pub fn waddah(&self) -> WaddahValue {
        self.waddah
    }

    #[inline]
    #[must_use]
    pub fn macd(&self) -> MacdValue {
        self.macd
    }

    #[inline]
    #[must_use]
    pub fn fisher(&self) -> FisherValue {
        self.fisher
    }

    #[inline]
    #[must_use]
    pub fn hull(&self) -> HullValue {
        self.hull
    }

    /// `None` on the first bar.
    #[inline]
    #[must_use]
    pub fn psar(&self) -> Option<SarValue> {
        self.psar
    }

    #[inline]
    #[must_use]
    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    /// Waddah momentum magnitude.
    #[inline]
    #[must_use]
    pub fn waddah_value(&self) -> f64 {
        self.waddah.value()
    }

    /// Bollinger width the momentum is compared against.
    #[inline]
    #[must_use]
    pub fn bb_range(&self) -> f64 {
        self.waddah.explosion_line()
    }

    #[inline]
    #[must_use]
    pub fn hma(&self) -> Price {
        self.hull.hma()
    }

    #[inline]
    #[must_use]
    pub fn psar_value(&self) -> Option<Price> {
        self.psar.map(|psar| psar.sar())
    }

    /// SAR trend, `Rising` until the SAR has started.
    #[inline]
    #[must_use]
    pub fn psar_trend(&self) -> Trend {
        self.psar.map_or(Trend::Rising, |psar| psar.trend())
    }

    #[inline]
    #[must_use]
    pub fn bullish_signal(&self) -> Option<Price> {
        match self.marker {
            Some(Marker::Bullish(price)) => Some(price),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn bearish_signal(&self) -> Option<Price> {
        match self.marker {
            Some(Marker::Bearish(price)) => Some(price),
            _ => None,
        }
    }
}

impl Display for ConfluenceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Confluence({}, {}, {}, {}",
            self.waddah, self.macd, self.fisher, self.hull
        )?;
        if let Some(psar) = self.psar {
            write!(f, ", {psar}")?;
        }
        match self.marker {
            Some(Marker::Bullish(price)) => write!(f, ", buy: {price})"),
            Some(Marker::Bearish(price)) => write!(f, ", sell: {price})"),
            None => write!(f, ")"),
        }
    }
}

/// One indicator's say in the confluence decision.
#[derive(Clone, Copy, Debug)]
struct Vote {
    enabled: bool,
    bullish: bool,
}

impl Vote {
    fn passes(self, bullish: bool) -> bool {
        !self.enabled || self.bullish == bullish
    }
}

/// Confluence of five indicators into buy/sell markers.
///
/// Each bar updates the Waddah explosion, MACD, Fisher Transform, Hull MA
/// and Parabolic SAR, in that order. A bar is considered once at least one
/// bar precedes it and the Waddah momentum reaches the dead zone; with
/// Waddah enabled it must also break out of the Bollinger width.
///
/// Considered bars collect one vote per indicator:
///
/// | indicator | bullish when         |
/// |-----------|----------------------|
/// | MACD      | `macd > signal`      |
/// | PSAR      | trend is rising      |
/// | Fisher    | rising               |
/// | Waddah    | `roc ≥ 0`            |
/// | HMA       | price above the HMA  |
///
/// When every enabled vote is bullish the bar gets a bullish marker at
/// `low − tick_size × dot_offset`; when every enabled vote is bearish a
/// bearish marker at `high + tick_size × dot_offset`. With nothing enabled
/// both agree, and the Waddah direction picks the side. A bar carries at
/// most one marker.
///
/// # Example
///
/// ```
/// use confluence_ta::{ConfluenceConfig, ConfluenceEngine};
/// # use confluence_ta::{BarIndex, Ohlcv, Price};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 + 1.0 }
/// #     fn low(&self) -> Price { self.0 - 1.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn index(&self) -> BarIndex { self.1 }
/// # }
///
/// let mut engine = ConfluenceEngine::new(ConfluenceConfig::default());
///
/// for i in 0..100 {
///     let v = engine.compute(&Bar(4000.0 + (i % 7) as f64, i)).unwrap();
///     if let Some(buy) = v.bullish_signal() {
///         assert!(buy < 4000.0 + (i % 7) as f64 - 1.0);
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ConfluenceEngine {
    config: ConfluenceConfig,
    waddah: WaddahExplosion,
    macd: MacdCross,
    fisher: FisherTransform,
    hull: HullMovingAverage,
    psar: ParabolicSar,
    cursor: BarCursor,
    current: Option<ConfluenceValue>,
}

impl ConfluenceEngine {
    fn is_gated_open(&self, seen: u64, waddah: &WaddahValue) -> bool {
        seen >= 1
            && waddah.value() >= self.config.dead_zone.value()
            && (!self.config.enabled.waddah || waddah.is_explosion())
    }

    fn votes(&self, value: &ConfluenceValue) -> [Vote; 5] {
        let enabled = self.config.enabled;
        let psar_bullish = value.psar_trend().is_rising();

        [
            Vote {
                enabled: enabled.macd,
                bullish: value.macd.is_bullish(),
            },
            Vote {
                enabled: enabled.psar,
                bullish: psar_bullish,
            },
            Vote {
                enabled: enabled.fisher,
                bullish: value.fisher.is_rising(),
            },
            Vote {
                enabled: enabled.waddah,
                bullish: value.waddah.is_up(),
            },
            Vote {
                enabled: enabled.hma,
                bullish: value.hull.is_bullish(),
            },
        ]
    }

    fn decide(&self, value: &ConfluenceValue, ohlcv: &impl Ohlcv) -> Option<Marker> {
        let votes = self.votes(value);
        let bullish = votes.iter().all(|vote| vote.passes(true));
        let bearish = votes.iter().all(|vote| vote.passes(false));

        let bullish = match (bullish, bearish) {
            (true, true) => value.waddah.is_up(),
            (true, false) => true,
            (false, true) => false,
            (false, false) => return None,
        };

        let offset = self.config.marker_offset();
        let marker = if bullish {
            Marker::Bullish(ohlcv.low() - offset)
        } else {
            Marker::Bearish(ohlcv.high() + offset)
        };
        tracing::debug!(
            index = ohlcv.index(),
            price = marker.price(),
            bullish,
            "confluence marker"
        );
        Some(marker)
    }
}

impl Indicator for ConfluenceEngine {
    type Config = ConfluenceConfig;
    type Output = ConfluenceValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            waddah: WaddahExplosion::new(config.waddah),
            macd: MacdCross::new(config.macd),
            fisher: FisherTransform::new(config.fisher),
            hull: HullMovingAverage::new(config.hull),
            psar: ParabolicSar::new(config.psar),
            cursor: BarCursor::default(),
            current: None,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        let seen = self.cursor.advance(ohlcv.index());

        let mut value = ConfluenceValue {
            waddah: self.waddah.compute(ohlcv)?,
            macd: self.macd.compute(ohlcv)?,
            fisher: self.fisher.compute(ohlcv)?,
            hull: self.hull.compute(ohlcv)?,
            psar: self.psar.compute(ohlcv),
            marker: None,
        };

        if self.is_gated_open(seen, &value.waddah) {
            value.marker = self.decide(&value, ohlcv);
        }

        self.current = Some(value);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for ConfluenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Confluence({}, {}, {}, {}, {})",
            self.waddah, self.macd, self.fisher, self.hull, self.psar
        )
    }
}
