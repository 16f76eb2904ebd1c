//! Generator contract consumed by domain-specific and composition generators.

use crate::error::GeneratorResult;
use std::cmp::Ordering;

/// A source of values from a fixed, declared domain.
pub trait Generator {
    type Value;

    /// Declared lower bound (inclusive).
    fn low(&self) -> Self::Value;

    /// Declared upper bound; exclusive for integral domains, inclusive for
    /// floating domains.
    fn high(&self) -> Self::Value;

    /// Draw a value from the declared domain. Never fails once constructed.
    fn next(&mut self) -> Self::Value;
}

/// Generators over ordered domains that can answer distinctness and
/// directional queries.
///
/// Each query prefers producing a value and fails only when no value of the
/// declared domain satisfies the relation.
pub trait ComparableGenerator: Generator
where
    Self::Value: PartialEq + PartialOrd,
{
    fn next_distinct(&mut self, other: Self::Value) -> GeneratorResult<Self::Value>;

    fn next_greater_than(&mut self, other: Self::Value) -> GeneratorResult<Self::Value>;

    fn next_greater_than_or_equal_to(&mut self, other: Self::Value) -> GeneratorResult<Self::Value>;

    fn next_less_than(&mut self, other: Self::Value) -> GeneratorResult<Self::Value>;

    fn next_less_than_or_equal_to(&mut self, other: Self::Value) -> GeneratorResult<Self::Value>;

    /// Equality as this generator defines it. `next_distinct` never returns a
    /// value equal to `other` under this definition.
    fn are_equal(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a == b
    }

    /// Ordering as this generator defines it.
    fn compare(&self, a: &Self::Value, b: &Self::Value) -> Option<Ordering> {
        a.partial_cmp(b)
    }
}
