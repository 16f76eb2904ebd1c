// Error types shared by the range sampler and the generators.
//
// Two kinds of failure exist: configuration errors raised when a generator is
// built with bounds it cannot honour, and unsatisfiable-constraint errors raised
// when a distinctness or directional query has no answer inside the declared
// domain. Both carry enough context to diagnose the call without looking at
// generator internals.

use std::fmt;

/// Error raised by the raw range sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    /// `min` was greater than `max`
    InvalidRange { min: u64, max: u64 },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerError::InvalidRange { min, max } => {
                write!(f, "Invalid range: min_value {} > max_value {}", min, max)
            }
        }
    }
}

impl std::error::Error for SamplerError {}

/// The relation a query asked for between the generated value and `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Distinct,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

/// Which side of the domain made a query unsatisfiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// The domain holds a single value and it is the excluded one
    SingleValue,
    Lower,
    Upper,
}

impl Relation {
    pub fn boundary(self) -> Boundary {
        match self {
            Relation::Distinct => Boundary::SingleValue,
            Relation::GreaterThan | Relation::GreaterThanOrEqualTo => Boundary::Upper,
            Relation::LessThan | Relation::LessThanOrEqualTo => Boundary::Lower,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Relation::Distinct => "!=",
            Relation::GreaterThan => ">",
            Relation::GreaterThanOrEqualTo => ">=",
            Relation::LessThan => "<",
            Relation::LessThanOrEqualTo => "<=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relation::Distinct => "distinct from",
            Relation::GreaterThan => "greater than",
            Relation::GreaterThanOrEqualTo => "greater than or equal to",
            Relation::LessThan => "less than",
            Relation::LessThanOrEqualTo => "less than or equal to",
        };
        f.write_str(name)
    }
}

/// Error raised by a generator, parameterised over the generated value type.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError<T> {
    /// The generator was constructed with bounds that describe no usable domain
    InvalidBounds {
        low: T,
        high: T,
        reason: &'static str,
    },
    /// No value of the domain satisfies `value <relation> other`
    Unsatisfiable {
        relation: Relation,
        low: T,
        high: T,
        other: T,
        /// Whether `high` itself belongs to the domain (floating domains)
        upper_inclusive: bool,
    },
}

impl<T> GeneratorError<T> {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GeneratorError::InvalidBounds { .. })
    }

    pub fn relation(&self) -> Option<Relation> {
        match self {
            GeneratorError::Unsatisfiable { relation, .. } => Some(*relation),
            GeneratorError::InvalidBounds { .. } => None,
        }
    }

    pub fn boundary(&self) -> Option<Boundary> {
        self.relation().map(Relation::boundary)
    }
}

impl<T: fmt::Display> fmt::Display for GeneratorError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::InvalidBounds { low, high, reason } => {
                write!(f, "Invalid bounds (low={}, high={}): {}", low, high, reason)
            }
            GeneratorError::Unsatisfiable {
                relation,
                low,
                high,
                other,
                upper_inclusive,
            } => {
                let close = if *upper_inclusive { ']' } else { ')' };
                let side = match relation.boundary() {
                    Boundary::SingleValue => "the domain holds no other value",
                    Boundary::Lower => "the lower bound leaves no room",
                    Boundary::Upper => "the upper bound leaves no room",
                };
                write!(
                    f,
                    "No value in [{}, {}{} is {} {} (x {} {}): {}",
                    low,
                    high,
                    close,
                    relation,
                    other,
                    relation.symbol(),
                    other,
                    side
                )
            }
        }
    }
}

impl<T: fmt::Debug + fmt::Display> std::error::Error for GeneratorError<T> {}

pub type GeneratorResult<T> = Result<T, GeneratorError<T>>;
