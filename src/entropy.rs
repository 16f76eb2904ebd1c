//! Entropy sources
//!
//! Every generator in this crate draws its randomness through the
//! [`EntropySource`] trait. Sources are injected at construction and never
//! owned implicitly by the library, so a caller decides how randomness is
//! shared: one owned source per thread, a [`SharedEntropySource`] handle that
//! serialises access to one source, or a [`ScriptedEntropySource`] that replays
//! known values for exact, deterministic tests.

use log::trace;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex, PoisonError};

/// Largest bound a single quadrant request may ask for.
pub const QUADRANT_BOUND: u32 = 1 << 16;

/// Capability producing uniformly distributed values on demand.
pub trait EntropySource {
    /// Draw a uniform value in `[0, bound)`.
    ///
    /// `bound` is at most [`QUADRANT_BOUND`]. A bound of 0 or 1 has a single
    /// possible answer and returns 0.
    fn next_below(&mut self, bound: u32) -> u32;

    /// Draw a full-width uniform `u64`.
    fn next_u64(&mut self) -> u64;

    /// Draw a uniform `f64` in `[0, 1)` from the top 53 bits of a `u64` draw.
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }

    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }

    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Entropy source backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngEntropySource<R = ChaCha8Rng> {
    rng: R,
}

impl RngEntropySource<ChaCha8Rng> {
    /// ChaCha8 seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// ChaCha8 seeded from `seed`; the same seed replays the same stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RngEntropySource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore> EntropySource for RngEntropySource<R> {
    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound <= QUADRANT_BOUND, "bound {} exceeds one quadrant", bound);
        if bound <= 1 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Cloneable handle serialising access to one source across threads.
///
/// Each request holds the lock only for the duration of that request.
#[derive(Debug)]
pub struct SharedEntropySource<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedEntropySource<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        // A panic mid-request cannot leave a source half-updated in a way that
        // matters here, so a poisoned lock is still usable.
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<S> Clone for SharedEntropySource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EntropySource> EntropySource for SharedEntropySource<S> {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.with(|source| source.next_below(bound))
    }

    fn next_u64(&mut self) -> u64 {
        self.with(|source| source.next_u64())
    }

    fn next_unit(&mut self) -> f64 {
        self.with(|source| source.next_unit())
    }
}

/// Deterministic source replaying a fixed script of values.
///
/// Each request consumes the next scripted value, cycling back to the start
/// when the script runs out. `next_below` reduces the value into the requested
/// bound, so scripting values already below the bound replays them exactly.
/// Requests with a single possible answer consume nothing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEntropySource {
    script: Vec<u64>,
    position: usize,
    requests: Vec<u32>,
}

impl ScriptedEntropySource {
    pub fn new(script: Vec<u64>) -> Self {
        Self {
            script,
            position: 0,
            requests: Vec::new(),
        }
    }

    /// Number of scripted values consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bounds passed to `next_below`, in request order.
    pub fn requests(&self) -> &[u32] {
        &self.requests
    }

    fn advance(&mut self) -> u64 {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.position % self.script.len()];
        self.position += 1;
        trace!("Replaying scripted value {} (position {})", value, self.position);
        value
    }
}

impl EntropySource for ScriptedEntropySource {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        self.requests.push(bound);
        (self.advance() % bound as u64) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }
}
