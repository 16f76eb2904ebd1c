// Bounded integral generation.
//
// The five query operations are written once against the `IntegralDomain`
// adapter, which supplies uniform sampling over a half-open range plus
// increment and decrement. Every width and signedness maps its range onto the
// 64-bit quadrant sampler, so no per-width copies of the edge-case policy exist.

use crate::entropy::EntropySource;
use crate::error::{GeneratorError, GeneratorResult, Relation};
use crate::generator::{ComparableGenerator, Generator};
use crate::sampler::sample_offset;
use log::debug;

use std::fmt;
use std::ops::Range;

/// Per-width capability set used by [`IntegralGenerator`].
pub trait IntegralDomain: Copy + Ord + fmt::Debug + fmt::Display {
    const MIN: Self;
    const MAX: Self;

    /// Uniform value in `[low, high)`. Callers guarantee `low < high`.
    fn sample<E: EntropySource + ?Sized>(low: Self, high: Self, entropy: &mut E) -> Self;

    /// `self + 1`. Callers guarantee `self < MAX`.
    fn increment(self) -> Self;

    /// `self - 1`. Callers guarantee `self > MIN`.
    fn decrement(self) -> Self;
}

macro_rules! integral_domain {
    ($($t:ty => $wide:ty),* $(,)?) => {
        $(
            impl IntegralDomain for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                fn sample<E>(low: Self, high: Self, entropy: &mut E) -> Self
                where
                    E: EntropySource + ?Sized,
                {
                    // Two's complement wrapping turns any signed span into its
                    // unsigned width.
                    let span = (high as $wide).wrapping_sub(low as $wide) as u64;
                    let offset = sample_offset(span, entropy);
                    (low as $wide).wrapping_add(offset as $wide) as $t
                }

                fn increment(self) -> Self {
                    self + 1
                }

                fn decrement(self) -> Self {
                    self - 1
                }
            }
        )*
    };
}

integral_domain!(
    i8 => i64,
    i16 => i64,
    i32 => i64,
    i64 => i64,
    isize => i64,
    u8 => u64,
    u16 => u64,
    u32 => u64,
    u64 => u64,
    usize => u64,
);

/// Generator over the half-open domain `[low, high)`.
///
/// Draws are exactly uniform for domains of at most 65536 values. Wider
/// domains inherit the weighting of [`sample_offset`].
#[derive(Debug, Clone)]
pub struct IntegralGenerator<T, S> {
    low: T,
    high: T,
    entropy: S,
}

impl<T: IntegralDomain, S: EntropySource> IntegralGenerator<T, S> {
    /// Fails with a configuration error unless `low < high`.
    pub fn new(low: T, high: T, entropy: S) -> Result<Self, GeneratorError<T>> {
        if low >= high {
            return Err(GeneratorError::InvalidBounds {
                low,
                high,
                reason: "low must be less than high",
            });
        }
        debug!("Created integral generator over [{}, {})", low, high);
        Ok(Self { low, high, entropy })
    }

    pub fn from_range(range: Range<T>, entropy: S) -> Result<Self, GeneratorError<T>> {
        Self::new(range.start, range.end, entropy)
    }

    pub fn is_in_domain(&self, value: T) -> bool {
        self.low <= value && value < self.high
    }

    pub fn into_entropy(self) -> S {
        self.entropy
    }

    fn sample(&mut self, low: T, high: T) -> T {
        T::sample(low, high, &mut self.entropy)
    }

    // Every value of the domain satisfies the relation.
    fn delegate(&mut self, relation: Relation, other: T) -> T {
        debug!(
            "All of [{}, {}) is {} {}, drawing from the full domain",
            self.low, self.high, relation, other
        );
        self.next()
    }

    fn sample_narrowed(&mut self, relation: Relation, other: T, low: T, high: T) -> T {
        debug!(
            "Drawing {} {} from [{}, {}) within [{}, {})",
            relation, other, low, high, self.low, self.high
        );
        self.sample(low, high)
    }

    fn unsatisfiable(&self, relation: Relation, other: T) -> GeneratorError<T> {
        debug!(
            "No value in [{}, {}) is {} {}",
            self.low, self.high, relation, other
        );
        GeneratorError::Unsatisfiable {
            relation,
            low: self.low,
            high: self.high,
            other,
            upper_inclusive: false,
        }
    }
}

impl<T: IntegralDomain, S: EntropySource> Generator for IntegralGenerator<T, S> {
    type Value = T;

    fn low(&self) -> T {
        self.low
    }

    fn high(&self) -> T {
        self.high
    }

    fn next(&mut self) -> T {
        let (low, high) = (self.low, self.high);
        self.sample(low, high)
    }
}

impl<T: IntegralDomain, S: EntropySource> ComparableGenerator for IntegralGenerator<T, S> {
    fn next_distinct(&mut self, other: T) -> GeneratorResult<T> {
        if !self.is_in_domain(other) {
            return Ok(self.delegate(Relation::Distinct, other));
        }
        let last = self.high.decrement();
        if self.low == last {
            return Err(self.unsatisfiable(Relation::Distinct, other));
        }
        // One candidate fewer than the domain, then shift past the collision.
        let low = self.low;
        let value = self.sample_narrowed(Relation::Distinct, other, low, last);
        Ok(if value >= other { value.increment() } else { value })
    }

    fn next_greater_than(&mut self, other: T) -> GeneratorResult<T> {
        if other < self.low {
            return Ok(self.delegate(Relation::GreaterThan, other));
        }
        if other >= self.high.decrement() {
            return Err(self.unsatisfiable(Relation::GreaterThan, other));
        }
        let high = self.high;
        Ok(self.sample_narrowed(Relation::GreaterThan, other, other.increment(), high))
    }

    fn next_greater_than_or_equal_to(&mut self, other: T) -> GeneratorResult<T> {
        if other <= self.low {
            return Ok(self.delegate(Relation::GreaterThanOrEqualTo, other));
        }
        if other >= self.high {
            return Err(self.unsatisfiable(Relation::GreaterThanOrEqualTo, other));
        }
        let high = self.high;
        Ok(self.sample_narrowed(Relation::GreaterThanOrEqualTo, other, other, high))
    }

    fn next_less_than(&mut self, other: T) -> GeneratorResult<T> {
        if other >= self.high {
            return Ok(self.delegate(Relation::LessThan, other));
        }
        if other <= self.low {
            return Err(self.unsatisfiable(Relation::LessThan, other));
        }
        let low = self.low;
        Ok(self.sample_narrowed(Relation::LessThan, other, low, other))
    }

    fn next_less_than_or_equal_to(&mut self, other: T) -> GeneratorResult<T> {
        if other >= self.high.decrement() {
            return Ok(self.delegate(Relation::LessThanOrEqualTo, other));
        }
        if other < self.low {
            return Err(self.unsatisfiable(Relation::LessThanOrEqualTo, other));
        }
        let low = self.low;
        let high = other.increment();
        Ok(self.sample_narrowed(Relation::LessThanOrEqualTo, other, low, high))
    }
}
