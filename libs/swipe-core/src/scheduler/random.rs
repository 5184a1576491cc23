//! Randomness used by the review scheduler.

use crate::types::ReviewWindow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two random decisions the scheduler makes.
pub trait ReviewRandom {
    /// Draw a review interval uniformly from `window` (inclusive).
    fn draw_interval(&mut self, window: ReviewWindow) -> u32;

    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// [`ReviewRandom`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomSource<R = StdRng> {
    rng: R,
}

impl RandomSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible source for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ReviewRandom for RandomSource<R> {
    fn draw_interval(&mut self, window: ReviewWindow) -> u32 {
        self.rng.gen_range(window.min()..=window.max())
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl<T: ReviewRandom + ?Sized> ReviewRandom for Box<T> {
    fn draw_interval(&mut self, window: ReviewWindow) -> u32 {
        (**self).draw_interval(window)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// Replays fixed draws. Intervals default to the window maximum and picks to
/// zero once the script runs out.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedRandom {
    intervals: std::collections::VecDeque<u32>,
    picks: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(intervals: &[u32], picks: &[usize]) -> Self {
        Self {
            intervals: intervals.iter().copied().collect(),
            picks: picks.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl ReviewRandom for ScriptedRandom {
    fn draw_interval(&mut self, window: ReviewWindow) -> u32 {
        self.intervals.pop_front().unwrap_or(window.max())
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_stay_in_window() {
        let mut random = RandomSource::seeded(7);
        let window = ReviewWindow::default();
        for _ in 0..1_000 {
            assert!(window.contains(random.draw_interval(window)));
        }
    }

    #[test]
    fn single_value_window() {
        let mut random = RandomSource::seeded(3);
        let window = ReviewWindow::new(9, 9).unwrap();
        assert_eq!(random.draw_interval(window), 9);
    }

    #[test]
    fn picks_stay_in_range() {
        let mut random = RandomSource::seeded(11);
        for len in 1..20 {
            assert!(random.pick_index(len) < len);
        }
    }

    #[test]
    fn seeded_sources_agree() {
        let window = ReviewWindow::default();
        let mut a = RandomSource::seeded(42);
        let mut b = RandomSource::seeded(42);
        let first: Vec<u32> = (0..10).map(|_| a.draw_interval(window)).collect();
        let second: Vec<u32> = (0..10).map(|_| b.draw_interval(window)).collect();
        assert_eq!(first, second);
    }
}
