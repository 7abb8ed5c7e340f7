use rand::{seq::SliceRandom, Rng};

/// Source of randomness for page and genre selection.
///
/// The production implementation draws from the thread RNG; tests inject a
/// fixed order so tier behavior is deterministic.
pub trait Randomness: Send + Sync {
    /// Uniform page number in `1..=upper`.
    fn page(&self, upper: u32) -> u32;

    /// Random permutation of `0..len`, used to shuffle collections by index.
    fn permutation(&self, len: usize) -> Vec<usize>;
}

pub struct ThreadRandomness;

impl Randomness for ThreadRandomness {
    fn page(&self, upper: u32) -> u32 {
        rand::rng().random_range(1..=upper)
    }

    fn permutation(&self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(&mut rand::rng());
        indices
    }
}
