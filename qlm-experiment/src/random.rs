use rand::Rng;
use rand::seq::SliceRandom;

/// Source of counterbalancing randomness.
///
/// Every `rand::Rng` is a `Randomizer`; tests substitute fixed permutations.
pub trait Randomizer {
    /// Reorders `items` in place with a uniform permutation.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

impl<R: Rng + ?Sized> Randomizer for R {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}
