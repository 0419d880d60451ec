//! Uniform shuffling of track sequences

use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a new vector with the same elements in uniformly random order
///
/// The input is never mutated. Uses the Fisher–Yates scan provided by
/// `SliceRandom::shuffle`, so each of the `n!` orderings is equally
/// likely under a uniform random source. Pass a seeded `StdRng` for a
/// deterministic order in tests; runtime callers use `thread_rng()`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
