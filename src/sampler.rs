//! Range sampler over the 64-bit unsigned domain
//!
//! Draws an offset below a span by walking the span's four 16-bit quadrants,
//! most significant first. While the digits drawn so far equal the span's own
//! digits the walk is "on the ceiling" and each quadrant is capped by the
//! span's digit; the first digit drawn strictly below it frees every later
//! quadrant to take any 16-bit value. No draw is ever discarded and no
//! remainder reduction is applied to a wide draw.
//!
//! Every integral width in the crate normalises its `[low, high)` problem onto
//! [`sample_offset`], so this is the only place integer entropy is shaped.

use crate::entropy::{EntropySource, QUADRANT_BOUND};
use crate::error::SamplerError;
use log::trace;

pub const QUADRANT_BITS: u32 = 16;
pub const QUADRANT_COUNT: usize = 4;

/// Four 16-bit digits of a 64-bit span, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrants([u16; QUADRANT_COUNT]);

impl Quadrants {
    pub fn from_span(span: u64) -> Self {
        let mut digits = [0u16; QUADRANT_COUNT];
        for (k, digit) in digits.iter_mut().enumerate() {
            *digit = (span >> Self::shift(k)) as u16;
        }
        Quadrants(digits)
    }

    /// Concatenate four digits back into a 64-bit value.
    pub fn compose(digits: [u16; QUADRANT_COUNT]) -> u64 {
        digits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (k, &digit)| acc | (digit as u64) << Self::shift(k))
    }

    pub fn get(&self, k: usize) -> u16 {
        self.0[k]
    }

    /// Whether any quadrant after `k` is nonzero.
    pub fn has_lower_bits(&self, k: usize) -> bool {
        self.0[k + 1..].iter().any(|&digit| digit != 0)
    }

    pub fn span(&self) -> u64 {
        Self::compose(self.0)
    }

    fn shift(k: usize) -> u32 {
        QUADRANT_BITS * (QUADRANT_COUNT - 1 - k) as u32
    }
}

fn draw_quadrant<E: EntropySource + ?Sized>(entropy: &mut E, bound: u32) -> u32 {
    if bound <= 1 {
        0
    } else {
        entropy.next_below(bound)
    }
}

/// Draw an offset in `[0, range)`.
///
/// A `range` of zero describes an empty span and yields 0 without touching the
/// entropy source.
///
/// Exactly uniform while only the lowest quadrant of `range` is active. For
/// wider spans a draw equal to the ceiling digit keeps the walk capped, so
/// offsets sharing the ceiling prefix are over-weighted.
pub fn sample_offset<E: EntropySource + ?Sized>(range: u64, entropy: &mut E) -> u64 {
    if range == 0 {
        return 0;
    }

    let ceiling = Quadrants::from_span(range);
    let mut below_ceiling = false;
    let mut digits = [0u16; QUADRANT_COUNT];

    for (k, digit) in digits.iter_mut().enumerate() {
        let maximum = ceiling.get(k) as u32;
        let bound = if below_ceiling {
            QUADRANT_BOUND
        } else if ceiling.has_lower_bits(k) {
            // Equal to the ceiling digit is still fine: later quadrants can
            // land strictly below the span.
            maximum + 1
        } else {
            maximum
        };
        debug_assert!(below_ceiling || bound > 0, "walked past the span {}", range);

        let value = draw_quadrant(entropy, bound);
        if !below_ceiling && value < maximum {
            below_ceiling = true;
        }
        trace!(
            "Quadrant {}: bound={}, value={:#06x}, below_ceiling={}",
            k,
            bound,
            value,
            below_ceiling
        );
        *digit = value as u16;
    }

    Quadrants::compose(digits)
}

/// Draw `v` with `min_value <= v < max_value`.
///
/// `min_value == max_value` is an empty span and returns `min_value`.
pub fn next_in_range<E: EntropySource + ?Sized>(
    min_value: u64,
    max_value: u64,
    entropy: &mut E,
) -> Result<u64, SamplerError> {
    if min_value > max_value {
        return Err(SamplerError::InvalidRange {
            min: min_value,
            max: max_value,
        });
    }
    let offset = sample_offset(max_value - min_value, entropy);
    Ok(min_value + offset)
}
