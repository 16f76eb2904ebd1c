// Magnitude-aware floating point generation with multi-width support
// (16, 32 and 64-bit).
//
// Samples are drawn by choosing a decade of magnitude uniformly and then a
// fraction inside it, so wide ranges such as [1e-10, 1e10] spread their
// samples across every order of magnitude instead of piling up near the top.
// All arithmetic happens in f64; results are narrowed to the target width and
// clamped back into the requested range.

mod buckets;

pub use self::buckets::{decimal_exponent, pow10, ScaleBucket, ScaleBuckets};

use crate::entropy::EntropySource;
use crate::error::{GeneratorError, GeneratorResult, Relation};
use crate::generator::{ComparableGenerator, Generator};
use half::f16;
use log::debug;

use std::fmt;

/// Attempts `next_distinct` makes before reporting the domain as exhausted.
pub const MAX_DISTINCT_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    Width16,
    Width32,
    Width64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::Width16 => 16,
            FloatWidth::Width32 => 32,
            FloatWidth::Width64 => 64,
        }
    }

    fn sign_bit(self) -> u64 {
        1u64 << (self.bits() - 1)
    }
}

/// Floating point types the magnitude generator can produce.
pub trait MagnitudeFloat: Copy + PartialOrd + fmt::Debug + fmt::Display {
    const WIDTH: FloatWidth;
    /// Decade below which all magnitudes share one bucket.
    const EPSILON_EXPONENT: i32;
    /// Decades below `other`'s own magnitude used as the strict-query step.
    const MIN_INTERVAL_DELTA: i32;
    const MIN: Self;
    const MAX: Self;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
    fn to_raw(self) -> u64;
    fn from_raw(raw: u64) -> Self;

    fn is_nan(self) -> bool {
        self.to_f64().is_nan()
    }

    fn is_finite(self) -> bool {
        self.to_f64().is_finite()
    }
}

impl MagnitudeFloat for f64 {
    const WIDTH: FloatWidth = FloatWidth::Width64;
    const EPSILON_EXPONENT: i32 = -323;
    const MIN_INTERVAL_DELTA: i32 = 16;
    const MIN: Self = f64::MIN;
    const MAX: Self = f64::MAX;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    fn from_raw(raw: u64) -> Self {
        f64::from_bits(raw)
    }
}

impl MagnitudeFloat for f32 {
    const WIDTH: FloatWidth = FloatWidth::Width32;
    const EPSILON_EXPONENT: i32 = -44;
    const MIN_INTERVAL_DELTA: i32 = 7;
    const MIN: Self = f32::MIN;
    const MAX: Self = f32::MAX;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_raw(self) -> u64 {
        self.to_bits() as u64
    }

    fn from_raw(raw: u64) -> Self {
        f32::from_bits(raw as u32)
    }
}

impl MagnitudeFloat for f16 {
    const WIDTH: FloatWidth = FloatWidth::Width16;
    const EPSILON_EXPONENT: i32 = -8;
    const MIN_INTERVAL_DELTA: i32 = 3;
    const MIN: Self = f16::MIN;
    const MAX: Self = f16::MAX;

    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }

    fn from_f64(value: f64) -> Self {
        f16::from_f64(value)
    }

    fn to_raw(self) -> u64 {
        self.to_bits() as u64
    }

    fn from_raw(raw: u64) -> Self {
        f16::from_bits(raw as u16)
    }
}

// Next representable value above a finite `value` in T's own precision.
pub fn next_up<T: MagnitudeFloat>(value: T) -> T {
    let sign_bit = T::WIDTH.sign_bit();
    let raw = value.to_raw();
    if raw & !sign_bit == 0 {
        // Either zero steps to the smallest positive subnormal.
        T::from_raw(1)
    } else if raw & sign_bit == 0 {
        T::from_raw(raw + 1)
    } else {
        T::from_raw(raw - 1)
    }
}

// Next representable value below a finite `value` in T's own precision.
pub fn next_down<T: MagnitudeFloat>(value: T) -> T {
    let sign_bit = T::WIDTH.sign_bit();
    let raw = value.to_raw();
    if raw & !sign_bit == 0 {
        T::from_raw(sign_bit | 1)
    } else if raw & sign_bit == 0 {
        T::from_raw(raw - 1)
    } else {
        T::from_raw(raw + 1)
    }
}

/// Bucket-granularity tuning for the magnitude generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnitudeSettings {
    /// Smallest decade given its own bucket
    pub epsilon_exponent: i32,
    /// How many decades below a reference value the strict-query step sits
    pub min_interval_delta: i32,
}

impl MagnitudeSettings {
    /// Defaults tuned for `T`.
    pub fn of<T: MagnitudeFloat>() -> Self {
        MagnitudeSettings {
            epsilon_exponent: T::EPSILON_EXPONENT,
            min_interval_delta: T::MIN_INTERVAL_DELTA,
        }
    }

    /// Approximate smallest meaningful step near `other`'s magnitude.
    pub fn min_interval(&self, other: f64) -> f64 {
        let exponent = decimal_exponent(other.abs())
            .map_or(self.epsilon_exponent, |e| e - self.min_interval_delta)
            .max(self.epsilon_exponent);
        pow10(exponent)
    }
}

/// Generator over the inclusive domain `[low, high]`.
#[derive(Debug, Clone)]
pub struct FloatGenerator<T, S> {
    low: T,
    high: T,
    settings: MagnitudeSettings,
    buckets: ScaleBuckets,
    entropy: S,
}

fn clamp<T: MagnitudeFloat>(value: T, low: T, high: T) -> T {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

impl<T: MagnitudeFloat, S: EntropySource> FloatGenerator<T, S> {
    pub fn new(low: T, high: T, entropy: S) -> Result<Self, GeneratorError<T>> {
        Self::with_settings(low, high, MagnitudeSettings::of::<T>(), entropy)
    }

    pub fn with_settings(
        low: T,
        high: T,
        settings: MagnitudeSettings,
        entropy: S,
    ) -> Result<Self, GeneratorError<T>> {
        let invalid = |reason| Err(GeneratorError::InvalidBounds { low, high, reason });
        if !low.is_finite() || !high.is_finite() {
            return invalid("bounds must be finite numbers");
        }
        if low > high {
            return invalid("low must not exceed high");
        }
        if low >= T::MAX {
            return invalid("low must be below the type's maximum");
        }
        if high <= T::MIN {
            return invalid("high must be above the type's minimum");
        }

        let buckets = ScaleBuckets::new(low.to_f64(), high.to_f64(), settings);
        debug!(
            "Created float generator over [{}, {}] with {} buckets (e={}..{})",
            low,
            high,
            buckets.len(),
            buckets.min_exponent(),
            buckets.max_exponent()
        );
        Ok(FloatGenerator {
            low,
            high,
            settings,
            buckets,
            entropy,
        })
    }

    pub fn settings(&self) -> MagnitudeSettings {
        self.settings
    }

    pub fn buckets(&self) -> &ScaleBuckets {
        &self.buckets
    }

    pub fn is_in_domain(&self, value: T) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn into_entropy(self) -> S {
        self.entropy
    }

    // Sample an ad hoc sub-range; its buckets are rebuilt for this call only.
    fn sample_between(&mut self, low: T, high: T) -> T {
        let buckets = ScaleBuckets::new(low.to_f64(), high.to_f64(), self.settings);
        debug!("Narrowed to [{}, {}] with {} buckets", low, high, buckets.len());
        clamp(T::from_f64(buckets.sample(&mut self.entropy)), low, high)
    }

    fn min_interval(&self, other: T) -> f64 {
        self.settings.min_interval(other.to_f64())
    }

    fn unsatisfiable(&self, relation: Relation, other: T) -> GeneratorError<T> {
        debug!(
            "No value in [{}, {}] is {} {}",
            self.low, self.high, relation, other
        );
        GeneratorError::Unsatisfiable {
            relation,
            low: self.low,
            high: self.high,
            other,
            upper_inclusive: true,
        }
    }
}

impl<T: MagnitudeFloat, S: EntropySource> Generator for FloatGenerator<T, S> {
    type Value = T;

    fn low(&self) -> T {
        self.low
    }

    fn high(&self) -> T {
        self.high
    }

    fn next(&mut self) -> T {
        let value = self.buckets.sample(&mut self.entropy);
        clamp(T::from_f64(value), self.low, self.high)
    }
}

impl<T: MagnitudeFloat, S: EntropySource> ComparableGenerator for FloatGenerator<T, S> {
    fn next_distinct(&mut self, other: T) -> GeneratorResult<T> {
        if other.is_nan() {
            return Ok(self.next());
        }
        if self.low == self.high && self.are_equal(&self.low, &other) {
            return Err(self.unsatisfiable(Relation::Distinct, other));
        }
        for _ in 0..MAX_DISTINCT_ATTEMPTS {
            let value = self.next();
            if !self.are_equal(&value, &other) {
                return Ok(value);
            }
        }
        let (up, down) = (next_up(other), next_down(other));
        if up >= self.low && up <= self.high {
            Ok(up)
        } else if down >= self.low && down <= self.high {
            Ok(down)
        } else {
            Err(self.unsatisfiable(Relation::Distinct, other))
        }
    }

    fn next_greater_than(&mut self, other: T) -> GeneratorResult<T> {
        if other.is_nan() || other >= self.high {
            return Err(self.unsatisfiable(Relation::GreaterThan, other));
        }
        if other < self.low {
            return Ok(self.next());
        }
        let stepped = T::from_f64(other.to_f64() + self.min_interval(other));
        let low = if stepped > other && stepped <= self.high {
            stepped
        } else {
            next_up(other)
        };
        if low > self.high {
            return Err(self.unsatisfiable(Relation::GreaterThan, other));
        }
        let high = self.high;
        Ok(self.sample_between(low, high))
    }

    fn next_greater_than_or_equal_to(&mut self, other: T) -> GeneratorResult<T> {
        if other.is_nan() || other > self.high {
            return Err(self.unsatisfiable(Relation::GreaterThanOrEqualTo, other));
        }
        if other <= self.low {
            return Ok(self.next());
        }
        let high = self.high;
        Ok(self.sample_between(other, high))
    }

    fn next_less_than(&mut self, other: T) -> GeneratorResult<T> {
        if other.is_nan() || other <= self.low {
            return Err(self.unsatisfiable(Relation::LessThan, other));
        }
        if other > self.high {
            return Ok(self.next());
        }
        let stepped = T::from_f64(other.to_f64() - self.min_interval(other));
        let high = if stepped < other && stepped >= self.low {
            stepped
        } else {
            next_down(other)
        };
        if high < self.low {
            return Err(self.unsatisfiable(Relation::LessThan, other));
        }
        let low = self.low;
        Ok(self.sample_between(low, high))
    }

    fn next_less_than_or_equal_to(&mut self, other: T) -> GeneratorResult<T> {
        if other.is_nan() || other < self.low {
            return Err(self.unsatisfiable(Relation::LessThanOrEqualTo, other));
        }
        if other >= self.high {
            return Ok(self.next());
        }
        let low = self.low;
        Ok(self.sample_between(low, other))
    }
}

#[cfg(test)]
mod tests;
