//! Deterministic random sources.
//!
//! Nothing in this crate touches a thread-local or global RNG. Every draw comes
//! from a [`RandomSource`] passed in by the caller, and parallel work derives
//! its own sub-stream from a stable index so results do not depend on
//! scheduling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Seedable random stream used by the mask generator and the synthesizer.
pub trait RandomSource {
    /// Uniform float in `[low, high)`. Returns `low` when the range is empty.
    fn uniform_f32(&mut self, low: f32, high: f32) -> f32;

    /// Uniform integer in `[low, high]`. Returns `low` when the range is empty.
    fn uniform_u32(&mut self, low: u32, high: u32) -> u32;

    /// Normally distributed float.
    fn normal_f32(&mut self, mean: f32, std_dev: f32) -> f32;

    /// Independent stream derived from this source's key and `index`.
    ///
    /// The result must not depend on how many values were already drawn, so
    /// that sub-streams can be handed out in any order. Sub-streams of a
    /// sub-stream must not collide with sub-streams of the root.
    fn substream(&self, index: u64) -> Self
    where
        Self: Sized;
}

/// [`RandomSource`] backed by `ChaCha8Rng` for cross-platform determinism.
///
/// Sub-streams of a root reuse its key with a different ChaCha stream id, which
/// gives 2^64 non-overlapping sequences per seed. A sub-stream's own
/// sub-streams are keyed by `derive_seed(seed, stream)`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    nested: bool,
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self {
            seed,
            nested: false,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the ChaCha key of this source was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// ChaCha stream id this source draws from (0 for a root source).
    pub fn stream(&self) -> u64 {
        self.inner.get_stream()
    }
}

impl RandomSource for SeededRng {
    fn uniform_f32(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    fn uniform_u32(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    fn normal_f32(&mut self, mean: f32, std_dev: f32) -> f32 {
        let z: f32 = self.inner.sample(StandardNormal);
        mean + std_dev * z
    }

    fn substream(&self, index: u64) -> Self {
        let seed = if self.nested {
            derive_seed(self.seed, self.stream())
        } else {
            self.seed
        };
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        inner.set_stream(index);
        Self {
            seed,
            nested: true,
            inner,
        }
    }
}

/// Mix a master seed with a sample index. Adjacent indices land far apart.
pub fn derive_seed(master_seed: u64, index: u64) -> u64 {
    let mut z = master_seed ^ index.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    // splitmix64 finalizer
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
