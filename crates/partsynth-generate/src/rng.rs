use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Source of randomness for one sampling session.
///
/// Every draw the engine makes goes through this trait so callers can seed
/// it, or replay a scripted sequence to pin down individual branches.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`; `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform integer in `[low, high]`.
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = (high - low) as usize + 1;
        low + self.next_index(span) as u32
    }

    /// One element drawn uniformly; `None` for an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_index(items.len()))
    }

    /// Up to `count` distinct elements, in draw order.
    fn sample_distinct<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        let count = count.min(pool.len());
        for slot in 0..count {
            let pick = slot + self.next_index(pool.len() - slot);
            pool.swap(slot, pick);
        }
        pool.truncate(count);
        pool
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Replays fixed floats and indices in order.
///
/// Once a queue runs dry it yields `0.0` / `0`. Indices are reduced modulo
/// the requested length.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    floats: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new(
        floats: impl IntoIterator<Item = f64>,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            floats: floats.into_iter().collect(),
            indices: indices.into_iter().collect(),
        }
    }

    pub fn from_floats(floats: impl IntoIterator<Item = f64>) -> Self {
        Self::new(floats, Vec::new())
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::new(Vec::new(), indices)
    }

    pub fn remaining_floats(&self) -> usize {
        self.floats.len()
    }

    pub fn remaining_indices(&self) -> usize {
        self.indices.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.0)
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len.max(1)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn sample_distinct_never_repeats() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let items: Vec<u32> = (0..10).collect();
        for count in [0, 3, 10, 25] {
            let mut drawn = rng.sample_distinct(&items, count);
            assert_eq!(drawn.len(), count.min(items.len()));
            drawn.sort();
            drawn.dedup();
            assert_eq!(drawn.len(), count.min(items.len()));
        }
    }

    #[test]
    fn range_inclusive_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let value = rng.range_inclusive(5, 8);
            assert!((5..=8).contains(&value));
        }
        assert_eq!(rng.range_inclusive(3, 3), 3);
    }

    #[test]
    fn scripted_source_replays_then_defaults() {
        let mut source = ScriptedSource::new([0.25], [4, 1]);
        assert_eq!(source.remaining_floats(), 1);
        assert_eq!(source.remaining_indices(), 2);
        assert_eq!(source.next_f64(), 0.25);
        assert_eq!(source.next_f64(), 0.0);
        assert_eq!(source.remaining_floats(), 0);
        assert_eq!(source.next_index(3), 1);
        assert_eq!(source.next_index(3), 1);
        assert_eq!(source.remaining_indices(), 0);
        assert_eq!(source.next_index(3), 0);
        let empty: [u8; 0] = [];
        assert_eq!(source.choose(&empty), None);
    }
}
