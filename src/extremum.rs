use std::{fmt::Display, num::NonZero};

use crate::{Price, RollingWindow};

#[derive(Clone, Debug)]
enum Storage {
    /// Trailing window with natural eviction.
    Bounded(RollingWindow<Price>),
    /// Everything since the last reset; only the extreme is kept.
    Unbounded { extreme: Option<Price>, len: usize },
}

/// Rolling maximum (`HIGHEST = true`) or minimum (`HIGHEST = false`) tracker.
///
/// Use the [`RollingHigh`] and [`RollingLow`] aliases. A bounded tracker
/// reports the extreme of the trailing `period` samples. An unbounded
/// tracker reports the extreme of every sample since the last
/// [`reset`](Self::reset) in O(1) memory; the Parabolic SAR uses it to
/// follow the extreme point of the current trend run.
///
/// # Example
///
/// ```
/// use confluence_ta::RollingHigh;
/// use std::num::NonZero;
///
/// let mut high = RollingHigh::bounded(NonZero::new(2).unwrap());
/// high.push(5.0);
/// high.push(3.0);
/// assert_eq!(high.current(), Some(5.0));
///
/// high.push(4.0); // 5 evicted
/// assert_eq!(high.current(), Some(4.0));
/// ```
#[derive(Clone, Debug)]
pub struct RollingExtremum<const HIGHEST: bool> {
    storage: Storage,
}

/// Tracks the maximum.
pub type RollingHigh = RollingExtremum<true>;

/// Tracks the minimum.
pub type RollingLow = RollingExtremum<false>;

impl<const HIGHEST: bool> RollingExtremum<HIGHEST> {
    /// Extreme of the last `period` samples.
    #[must_use]
    pub fn bounded(period: NonZero<usize>) -> Self {
        Self {
            storage: Storage::Bounded(RollingWindow::new(period)),
        }
    }

    /// Extreme of every sample since the last reset.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            storage: Storage::Unbounded {
                extreme: None,
                len: 0,
            },
        }
    }

    #[inline]
    fn pick(a: Price, b: Price) -> Price {
        if HIGHEST { a.max(b) } else { a.min(b) }
    }

    #[inline]
    pub fn push(&mut self, sample: Price) {
        match &mut self.storage {
            Storage::Bounded(window) => {
                window.push(sample);
            }
            Storage::Unbounded { extreme, len } => {
                *extreme = Some(extreme.map_or(sample, |e| Self::pick(e, sample)));
                *len += 1;
            }
        }
    }

    /// Current extreme, `None` while empty.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<Price> {
        match &self.storage {
            Storage::Bounded(window) => window.iter().reduce(Self::pick),
            Storage::Unbounded { extreme, .. } => *extreme,
        }
    }

    /// Number of samples the current extreme is taken over.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Bounded(window) => window.len(),
            Storage::Unbounded { len, .. } => *len,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards every sample.
    pub fn reset(&mut self) {
        match &mut self.storage {
            Storage::Bounded(window) => window.clear(),
            Storage::Unbounded { extreme, len } => {
                *extreme = None;
                *len = 0;
            }
        }
    }

    /// Discards every sample and starts over from `sample`.
    pub fn reseed(&mut self, sample: Price) {
        self.reset();
        self.push(sample);
    }
}

impl<const HIGHEST: bool> Display for RollingExtremum<HIGHEST> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = if HIGHEST { "Highest" } else { "Lowest" };
        match &self.storage {
            Storage::Bounded(window) => write!(f, "{name}({})", window.capacity()),
            Storage::Unbounded { .. } => write!(f, "{name}(∞)"),
        }
    }
}
