// Scale buckets: the decades of magnitude a floating range spans.
//
// A bucket is one decade `sign * [10^e, 10^(e+1))`. Choosing a bucket
// uniformly before choosing a fraction inside it gives every decade the same
// weight, however many representable values it holds.

use super::MagnitudeSettings;
use crate::entropy::EntropySource;
use crate::sampler::sample_offset;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleBucket {
    pub exponent: i32,
    pub negative: bool,
}

impl ScaleBucket {
    fn positive(exponent: i32) -> Self {
        ScaleBucket {
            exponent,
            negative: false,
        }
    }

    fn negative(exponent: i32) -> Self {
        ScaleBucket {
            exponent,
            negative: true,
        }
    }

    pub fn sign(&self) -> f64 {
        if self.negative {
            -1.0
        } else {
            1.0
        }
    }
}

// Decades with a finite, nonzero f64 power of ten.
const POW10_MIN_EXPONENT: i32 = -323;
const POW10_MAX_EXPONENT: i32 = 308;

/// `10^exponent`, correctly rounded: `pow10(n)` is bit-identical to the
/// literal `1en`. Zero below the subnormal range, infinite above `f64::MAX`.
pub fn pow10(exponent: i32) -> f64 {
    use std::sync::OnceLock;
    static POWERS_OF_TEN: OnceLock<Vec<f64>> = OnceLock::new();

    if exponent < POW10_MIN_EXPONENT {
        return 0.0;
    }
    if exponent > POW10_MAX_EXPONENT {
        return f64::INFINITY;
    }
    let table = POWERS_OF_TEN.get_or_init(|| {
        // Decimal parsing rounds correctly where repeated multiplication does not.
        (POW10_MIN_EXPONENT..=POW10_MAX_EXPONENT)
            .map(|e| format!("1e{}", e).parse::<f64>().unwrap_or(0.0))
            .collect()
    });
    table[(exponent - POW10_MIN_EXPONENT) as usize]
}

/// `floor(log10(magnitude))`, or `None` for zero and non-finite magnitudes.
pub fn decimal_exponent(magnitude: f64) -> Option<i32> {
    if !(magnitude > 0.0) || !magnitude.is_finite() {
        return None;
    }
    let mut exponent = magnitude.log10().floor() as i32;
    // log10 can land a hair off at exact powers of ten.
    if pow10(exponent) > magnitude {
        exponent -= 1;
    } else if pow10(exponent + 1) <= magnitude {
        exponent += 1;
    }
    Some(exponent)
}

// Exponent of the decade a range reaches into from below when `magnitude` is
// its far edge. An exact power of ten only touches its own decade at a point.
fn outer_exponent(magnitude: f64) -> Option<i32> {
    decimal_exponent(magnitude).map(|exponent| {
        if pow10(exponent) == magnitude {
            exponent - 1
        } else {
            exponent
        }
    })
}

/// Ordered decades spanned by the inclusive range `[low, high]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBuckets {
    low: f64,
    high: f64,
    min_exponent: i32,
    max_exponent: i32,
    buckets: Vec<ScaleBucket>,
}

impl ScaleBuckets {
    /// Callers guarantee `low <= high`, both finite.
    pub fn new(low: f64, high: f64, settings: MagnitudeSettings) -> Self {
        debug_assert!(low <= high, "inverted range [{}, {}]", low, high);
        let floor = settings.epsilon_exponent;
        let clamp = |exponent: Option<i32>| exponent.map_or(floor, |e| e.max(floor));

        let (min_exponent, max_exponent, buckets) = if low >= 0.0 {
            let min_exponent = clamp(decimal_exponent(low));
            let max_exponent = clamp(outer_exponent(high)).max(min_exponent);
            let buckets = (min_exponent..=max_exponent)
                .map(ScaleBucket::positive)
                .collect::<Vec<_>>();
            (min_exponent, max_exponent, buckets)
        } else if high < 0.0 {
            let max_exponent = clamp(decimal_exponent(-high));
            let min_exponent = clamp(outer_exponent(-low)).max(max_exponent);
            let buckets = (max_exponent..=min_exponent)
                .rev()
                .map(ScaleBucket::negative)
                .collect::<Vec<_>>();
            (min_exponent, max_exponent, buckets)
        } else {
            let min_exponent = clamp(outer_exponent(-low));
            let max_exponent = clamp(outer_exponent(high));
            let buckets = (floor..=min_exponent)
                .rev()
                .map(ScaleBucket::negative)
                .chain((floor..=max_exponent).map(ScaleBucket::positive))
                .collect::<Vec<_>>();
            (min_exponent, max_exponent, buckets)
        };

        ScaleBuckets {
            low,
            high,
            min_exponent,
            max_exponent,
            buckets,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScaleBucket> + '_ {
        self.buckets.iter()
    }

    pub fn min_exponent(&self) -> i32 {
        self.min_exponent
    }

    pub fn max_exponent(&self) -> i32 {
        self.max_exponent
    }

    /// Fraction bounds inside bucket `index`, clamped to the range edges.
    pub fn fraction_bounds(&self, index: usize) -> (f64, f64) {
        let bucket = self.buckets[index];
        let scale = pow10(bucket.exponent);
        let (mut lower, mut upper) = (1.0, 10.0);

        if index == 0 {
            if self.low < 0.0 {
                upper = -self.low / scale;
            } else {
                lower = self.low / scale;
            }
        }
        if index == self.buckets.len() - 1 {
            if self.high < 0.0 {
                lower = -self.high / scale;
            } else {
                upper = self.high / scale;
            }
        }
        if lower > upper {
            lower = 0.0;
        }
        (lower, upper)
    }

    /// Pick a bucket uniformly, then a fraction uniformly inside it.
    pub fn sample<E: EntropySource + ?Sized>(&self, entropy: &mut E) -> f64 {
        let index = sample_offset(self.buckets.len() as u64, entropy) as usize;
        let bucket = self.buckets[index];
        let (lower, upper) = self.fraction_bounds(index);

        let fraction = (lower + entropy.next_unit() * (upper - lower)).min(upper);
        let value = bucket.sign() * fraction * pow10(bucket.exponent);
        trace!(
            "Bucket {} of {} (e={}, negative={}): fraction={} in [{}, {}) -> {}",
            index,
            self.buckets.len(),
            bucket.exponent,
            bucket.negative,
            fraction,
            lower,
            upper,
            value
        );
        value.max(self.low).min(self.high)
    }
}
