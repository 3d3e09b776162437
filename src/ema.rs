use std::{fmt::Display, num::NonZero};

use crate::Price;

/// Exponential Moving Average (EMA) over a stream of samples.
///
/// Uses the standard smoothing factor `α = 2 / (period + 1)`. The first
/// sample seeds the average; each following value is computed as:
///
/// ```text
/// EMA = α × sample + (1 − α) × prev_EMA
/// ```
///
/// There is no warm-up beyond the seed: the filter reports a value from
/// the first sample on. Runs in O(1) memory via a single fused
/// multiply-add per update.
///
/// # Example
///
/// ```
/// use confluence_ta::Ema;
/// use std::num::NonZero;
///
/// let mut ema = Ema::new(NonZero::new(3).unwrap());
///
/// // Seed
/// assert_eq!(ema.update(4.0), 4.0);
///
/// // EMA(3) α = 0.5: 8 × 0.5 + 4 × 0.5 = 6.0
/// assert_eq!(ema.update(8.0), 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    period: usize,
    alpha: f64,
    current: Option<Price>,
}

impl Ema {
    #[must_use]
    pub fn new(period: NonZero<usize>) -> Self {
        Self {
            period: period.get(),
            #[allow(clippy::cast_precision_loss)]
            alpha: 2.0 / (period.get() + 1) as f64,
            current: None,
        }
    }

    /// Folds `sample` into the average and returns the new value.
    #[inline]
    pub fn update(&mut self, sample: Price) -> Price {
        let next = match self.current {
            Some(previous) => self.alpha.mul_add(sample - previous, previous),
            None => sample,
        };

        self.current = Some(next);
        next
    }

    /// Last computed value, `None` before the first sample.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<Price> {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({})", self.period)
    }
}
