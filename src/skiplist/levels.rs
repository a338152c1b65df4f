//! Random tower heights.
//!
//! A node's height is drawn from a geometric distribution: start at 1 and keep
//! adding a level with probability `p`, capped at `max_levels`. With `p = 0.5`
//! half the nodes reach level 2, a quarter reach level 3, and so on, which is
//! what keeps expected search depth logarithmic.

use crate::error::{Result, StrataError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default cap on tower height.
pub const MAX_LEVELS: usize = 32;

/// Default promotion probability.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Draw a tower height in `[1, max_levels]`.
///
/// `p` must lie in `[0, 1]`; callers going through [`LevelGenerator`] get that checked.
pub fn calculate_levels<R: Rng>(rng: &mut R, max_levels: usize, p: f64) -> usize {
    let mut levels = 1;
    while levels < max_levels && rng.random_bool(p) {
        levels += 1;
    }
    levels
}

/// Seeded source of tower heights, owned by a skip list.
#[derive(Debug, Clone)]
pub struct LevelGenerator<R = StdRng> {
    rng: R,
    max_levels: usize,
    probability: f64,
}

impl LevelGenerator<StdRng> {
    /// Default parameters (`MAX_LEVELS`, `p = 0.5`) with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_levels: MAX_LEVELS,
            probability: DEFAULT_PROBABILITY,
        }
    }

    /// Deterministic generator for a given seed.
    pub fn seeded(seed: u64, max_levels: usize, probability: f64) -> Result<Self> {
        Self::with_rng(StdRng::seed_from_u64(seed), max_levels, probability)
    }

    /// Seed from `seed` when given, otherwise from the thread-local entropy source.
    pub fn from_seed_or_entropy(
        seed: Option<u64>,
        max_levels: usize,
        probability: f64,
    ) -> Result<Self> {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self::seeded(seed, max_levels, probability)
    }
}

impl Default for LevelGenerator<StdRng> {
    fn default() -> Self {
        Self::with_seed(rand::rng().random())
    }
}

impl<R: Rng> LevelGenerator<R> {
    /// Wrap a caller-supplied RNG.
    pub fn with_rng(rng: R, max_levels: usize, probability: f64) -> Result<Self> {
        validate(max_levels, probability)?;
        Ok(Self {
            rng,
            max_levels,
            probability,
        })
    }

    /// Next tower height.
    #[inline]
    pub fn next_level(&mut self) -> usize {
        calculate_levels(&mut self.rng, self.max_levels, self.probability)
    }

    #[inline]
    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

pub(crate) fn validate(max_levels: usize, probability: f64) -> Result<()> {
    if max_levels == 0 {
        return Err(StrataError::InvalidParameter(
            "max_levels must be at least 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&probability) {
        return Err(StrataError::InvalidParameter(format!(
            "probability must be in [0, 1], got {probability}"
        )));
    }
    Ok(())
}
