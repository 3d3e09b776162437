use std::{fmt::Display, num::NonZero};

use crate::{Price, RollingWindow};

/// Linearly Weighted Moving Average (WMA).
///
/// The newest retained sample weighs `k`, the oldest `1`, where `k` is
/// the number of retained samples (`k ≤ period`):
///
/// ```text
/// WMA = Σ(wᵢ × xᵢ) / (k(k + 1) / 2)
/// ```
///
/// Before the window fills, the average is taken over the samples
/// received so far. Updates in O(1) by maintaining the weighted sum and
/// the plain sum of the window:
///
/// ```text
/// filling: weighted += k × x
/// full:    weighted += period × x − sum     (sum before eviction)
/// ```
///
/// # Fractional periods
///
/// [`Wma::fractional`] accepts derived periods such as `period / 2` or
/// `√period`. They are rounded half away from zero and clamped to at
/// least one bar, so `7.5 → 8`, `√14 ≈ 3.74 → 4`, `0.3 → 1`.
///
/// # Example
///
/// ```
/// use confluence_ta::Wma;
/// use std::num::NonZero;
///
/// let mut wma = Wma::new(NonZero::new(3).unwrap());
/// wma.update(1.0);
/// wma.update(2.0);
///
/// // (1×1 + 2×2 + 3×3) / 6
/// assert_eq!(wma.update(3.0), 14.0 / 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct Wma {
    window: RollingWindow<Price>,
    weighted_sum: f64,
    sum: f64,
    current: Option<Price>,
}

impl Wma {
    #[must_use]
    pub fn new(period: NonZero<usize>) -> Self {
        Self {
            window: RollingWindow::new(period),
            weighted_sum: 0.0,
            sum: 0.0,
            current: None,
        }
    }

    /// WMA over a derived, possibly fractional period.
    #[must_use]
    pub fn fractional(period: f64) -> Self {
        Self::new(Self::round_period(period))
    }

    /// Rounding rule shared by every derived period.
    #[must_use]
    pub fn round_period(period: f64) -> NonZero<usize> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = period.round().max(1.0) as usize;
        NonZero::new(rounded).unwrap_or(NonZero::<usize>::MIN)
    }

    /// Pushes `sample` and returns the weighted average of the window.
    #[inline]
    pub fn update(&mut self, sample: Price) -> Price {
        #[allow(clippy::cast_precision_loss)]
        let period = self.window.capacity() as f64;

        if self.window.is_full() {
            self.weighted_sum += period.mul_add(sample, -self.sum);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let weight = (self.window.len() + 1) as f64;
            self.weighted_sum += weight * sample;
        }

        if let Some(evicted) = self.window.push(sample) {
            self.sum -= evicted;
        }
        self.sum += sample;

        #[allow(clippy::cast_precision_loss)]
        let k = self.window.len() as f64;
        let value = self.weighted_sum / (k * (k + 1.0) / 2.0);

        self.current = Some(value);
        value
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
        self.window.capacity()
    }
}

impl Display for Wma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WMA({})", self.window.capacity())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, assert_near};

    fn wma(period: usize) -> Wma {
        Wma::new(NonZero::new(period).unwrap())
    }

    /// Direct windowed computation for comparison.
    fn direct(samples: &[f64], period: usize) -> f64 {
        let start = samples.len().saturating_sub(period);
        let window = &samples[start..];
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, x) in window.iter().enumerate() {
            let w = (i + 1) as f64;
            num += w * x;
            den += w;
        }
        num / den
    }

    mod filling {
        use super::*;

        #[test]
        fn first_sample_is_the_value() {
            let mut wma = wma(5);
            assert_eq!(wma.update(12.0), 12.0);
        }

        #[test]
        fn weights_available_samples() {
            // [4, 10] → (1×4 + 2×10) / 3 = 8
            let mut wma = wma(5);
            wma.update(4.0);
            assert_eq!(wma.update(10.0), 8.0);
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn oldest_weight_drops_out() {
            // [1, 2, 3] → [2, 3, 4]: (2 + 6 + 12) / 6
            let mut wma = wma(3);
            wma.update(1.0);
            wma.update(2.0);
            wma.update(3.0);
            assert_approx!(wma.update(4.0), 20.0 / 6.0);
        }

        #[test]
        fn incremental_matches_direct() {
            let samples: Vec<f64> = (0..60)
                .map(|i| 100.0 + (f64::from(i) * 0.7).sin() * 5.0 + f64::from(i) * 0.1)
                .collect();
            for period in [1, 2, 4, 7, 14] {
                let mut wma = wma(period);
                for (i, &x) in samples.iter().enumerate() {
                    let value = wma.update(x);
                    assert_near!(value, direct(&samples[..=i], period), 1e-9);
                }
            }
        }

        #[test]
        fn constant_input_stays_constant() {
            let mut wma = wma(7);
            for _ in 0..30 {
                assert_near!(wma.update(4321.75), 4321.75, 1e-9);
            }
        }
    }

    mod fractional {
        use super::*;

        #[test]
        fn rounds_half_away_from_zero() {
            assert_eq!(Wma::round_period(7.0).get(), 7);
            assert_eq!(Wma::round_period(7.5).get(), 8);
            assert_eq!(Wma::round_period(14_f64.sqrt()).get(), 4);
            assert_eq!(Wma::round_period(3.2).get(), 3);
        }

        #[test]
        fn clamps_to_one_bar() {
            assert_eq!(Wma::round_period(0.3).get(), 1);
            assert_eq!(Wma::round_period(0.0).get(), 1);
        }

        #[test]
        fn fractional_constructor_uses_rounded_period() {
            assert_eq!(Wma::fractional(7.5).period(), 8);
        }
    }

    #[test]
    fn display() {
        assert_eq!(wma(14).to_string(), "WMA(14)");
    }
}
