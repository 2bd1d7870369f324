//! Batch sampling for training.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Splits dataset indices into batches, reshuffling every epoch.
///
/// The final batch of an epoch is kept even when it is short.
#[derive(Debug, Clone)]
pub struct BatchSampler {
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
}

impl BatchSampler {
    /// Create a new batch sampler. `seed = None` draws from OS entropy.
    pub fn new(batch_size: usize, shuffle: bool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            batch_size: batch_size.max(1),
            shuffle,
            rng,
        }
    }

    /// Images per full batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches one epoch over `len` items produces.
    pub fn num_batches(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// Index batches for one epoch over `len` items.
    pub fn epoch(&mut self, len: usize) -> Vec<Vec<usize>> {
        let mut indices: Vec<usize> = (0..len).collect();
        if self.shuffle {
            indices.shuffle(&mut self.rng);
        }

        indices
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_every_index_once() {
        let mut sampler = BatchSampler::new(4, true, Some(3));
        let mut seen: Vec<usize> = sampler.epoch(10).into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_last_batch_is_short() {
        let mut sampler = BatchSampler::new(4, false, None);
        let batches = sampler.epoch(10);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(sampler.num_batches(10), 3);
    }

    #[test]
    fn test_unshuffled_is_sequential() {
        let mut sampler = BatchSampler::new(3, false, None);
        assert_eq!(sampler.epoch(5), vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = BatchSampler::new(5, true, Some(11));
        let mut b = BatchSampler::new(5, true, Some(11));
        assert_eq!(a.epoch(50), b.epoch(50));
        assert_eq!(a.epoch(50), b.epoch(50));
    }

    #[test]
    fn test_empty_dataset() {
        let mut sampler = BatchSampler::new(8, true, Some(1));
        assert!(sampler.epoch(0).is_empty());
        assert_eq!(sampler.num_batches(0), 0);
    }
}
