//! Injected randomness for outcome, reward, and capture rolls.
//!
//! Every probabilistic rule takes a [`RandomSource`] so reward and outcome
//! computation can be reproduced in tests. Three sources are provided:
//!
//! - [`SeededRandom`]: reproducible stream from a `u64` seed
//! - [`ThreadRandom`]: thread-local entropy for production use
//! - [`SequenceRandom`]: scripted unit draws, cycling, for exact scenarios

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest value strictly below `1.0`.
const UNIT_CEILING: f64 = 1.0 - f64::EPSILON;

/// Source of uniform draws.
///
/// Only [`next_unit`](Self::next_unit) must be implemented; every helper is
/// derived from it so a scripted source controls all downstream rolls.
pub trait RandomSource: Send + Sync {
    /// Uniform real in `[0, 1)`.
    fn next_unit(&self) -> f64;

    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn below(&self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        ((self.next_unit() * n as f64) as u64).min(n - 1)
    }

    /// Uniform integer in `[min, max]` inclusive.
    fn range_inclusive(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + self.below(span) as u32
    }

    /// Uniform real in `[min, max)`.
    fn uniform(&self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }

    /// One Bernoulli trial at probability `p`.
    fn chance(&self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl<T: RandomSource + ?Sized> RandomSource for std::sync::Arc<T> {
    fn next_unit(&self) -> f64 {
        (**self).next_unit()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &T {
    fn next_unit(&self) -> f64 {
        (**self).next_unit()
    }
}

/// Reproducible source backed by [`StdRng`].
///
/// The generator sits behind a mutex so one source can be shared by
/// concurrent requests; draws are serialized but never block on I/O.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        // A poisoned generator is still a valid generator.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.r#gen::<f64>()
    }
}

/// Entropy-seeded source using the thread-local generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Scripted source that replays a fixed list of unit draws.
///
/// Draws cycle once the list is exhausted. Values are clamped into `[0, 1)`
/// so a script can say `1.0` to mean "the largest possible draw".
#[derive(Debug)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Source that always returns the same draw.
    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.draws.len();
        self.draws[index].clamp(0.0, UNIT_CEILING)
    }
}
