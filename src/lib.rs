//! # valuegen
//!
//! Bounded value generators for synthesizing test inputs.
//!
//! Three pieces do the numeric work and everything else composes them:
//!
//! - [`sampler`]: draws an offset below any 64-bit span by walking its four
//!   16-bit quadrants, with no remainder reduction of wide draws.
//! - [`integral`]: [`IntegralGenerator`] over `[low, high)` for every integer
//!   width, answering distinctness and directional queries with a single draw.
//! - [`floats`]: [`FloatGenerator`] over `[low, high]`, choosing a decade of
//!   magnitude before a fraction so huge ranges are not dominated by their
//!   largest values.
//!
//! All randomness comes from an injected [`EntropySource`].

pub mod entropy;
pub mod error;
pub mod floats;
pub mod generator;
pub mod integral;
pub mod sampler;

// Re-export core types for easy access
pub use entropy::{EntropySource, RngEntropySource, ScriptedEntropySource, SharedEntropySource};
pub use error::{Boundary, GeneratorError, GeneratorResult, Relation, SamplerError};
pub use floats::{
    FloatGenerator, FloatWidth, MagnitudeFloat, MagnitudeSettings, ScaleBucket, ScaleBuckets,
};
pub use generator::{ComparableGenerator, Generator};
pub use integral::{IntegralDomain, IntegralGenerator};
pub use sampler::{next_in_range, sample_offset, Quadrants};
