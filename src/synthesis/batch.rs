//! Batches of independent sample grids.

use std::iter::FusedIterator;

use crate::rng::derive_seed;
use crate::synthesis::{DepthField, FieldSynthesizer};
use crate::types::SurfaceError;

impl FieldSynthesizer {
    /// Lazily synthesize `count` samples. Sample `k` is seeded with
    /// `derive_seed(master_seed, k)`; stop iterating to cancel the batch.
    pub fn samples(&self, master_seed: u64, count: u64) -> Samples<'_> {
        Samples {
            synthesizer: self,
            master_seed,
            next: 0,
            end: count,
        }
    }

    /// Regenerate a single sample of a batch without producing the others.
    pub fn sample(&self, master_seed: u64, index: u64) -> Result<DepthField, SurfaceError> {
        self.synthesize(derive_seed(master_seed, index))
    }
}

/// Iterator returned by [`FieldSynthesizer::samples`].
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    synthesizer: &'a FieldSynthesizer,
    master_seed: u64,
    next: u64,
    end: u64,
}

impl Samples<'_> {
    /// Index of the sample the next call to `next` produces.
    pub fn position(&self) -> u64 {
        self.next
    }
}

impl Iterator for Samples<'_> {
    type Item = Result<DepthField, SurfaceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        tracing::debug!(index, "synthesizing batch sample");
        Some(self.synthesizer.sample(self.master_seed, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples<'_> {}

impl FusedIterator for Samples<'_> {}
