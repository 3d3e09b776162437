use std::{fmt::Display, num::NonZero};

use crate::{Price, RollingWindow};

/// Rolling population standard deviation over the last `period` samples.
///
/// Before the window fills, the deviation is taken over however many
/// samples have arrived, so the output is defined from the first sample
/// (where it is `0`).
///
/// ```text
/// mean = Σx / n
/// σ    = √( Σ(x − mean)² / n )
/// ```
///
/// Recomputed with two passes over the buffer on every update. That is
/// O(period) per sample but exact for flat input, where a running
/// sum-of-squares would leave cancellation noise in the band width.
///
/// # Example
///
/// ```
/// use confluence_ta::RollingStdDev;
/// use std::num::NonZero;
///
/// let mut sd = RollingStdDev::new(NonZero::new(2).unwrap());
///
/// assert_eq!(sd.update(3.0), 0.0);
/// // window [3, 5]: mean = 4, σ = 1
/// assert_eq!(sd.update(5.0), 1.0);
/// assert_eq!(sd.mean(), 4.0);
/// ```
#[derive(Clone, Debug)]
pub struct RollingStdDev {
    window: RollingWindow<Price>,
    mean: Price,
    current: Option<Price>,
}

impl RollingStdDev {
    #[must_use]
    pub fn new(period: NonZero<usize>) -> Self {
        Self {
            window: RollingWindow::new(period),
            mean: 0.0,
            current: None,
        }
    }

    /// Pushes `sample` and returns the standard deviation of the window.
    #[inline]
    pub fn update(&mut self, sample: Price) -> Price {
        self.window.push(sample);

        #[allow(clippy::cast_precision_loss)]
        let n = self.window.len() as f64;

        let mean = self.window.iter().sum::<Price>() / n;
        let variance = self
            .window
            .iter()
            .map(|x| (x - mean) * (x - mean))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        self.mean = mean;
        self.current = Some(std_dev);
        std_dev
    }

    /// Average of the window at the last update, `0` before any sample.
    #[inline]
    #[must_use]
    pub fn mean(&self) -> Price {
        self.mean
    }

    /// Last computed standard deviation, `None` before any sample.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<Price> {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.window.capacity()
    }
}

impl Display for RollingStdDev {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdDev({})", self.window.capacity())
    }
}
