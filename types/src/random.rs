//! Steppable random streams.
//!
//! Every game state carries its own [`RandomStream`]. Transitions derive the
//! successor's stream from the current one with [`RandomStream::next`], so a
//! whole trajectory is reproducible from the root seed while each state still
//! draws from an independent-looking sequence.

use std::cell::RefCell;

use rand::{
    seq::{IteratorRandom, SliceRandom},
    Rng, RngCore, SeedableRng,
};
use rand_xorshift::XorShiftRng;

#[derive(Clone)]
pub struct RandomStream {
    seed: u64,
    // Advanced in place by every draw, including `next`.
    rng: RefCell<XorShiftRng>,
}

impl RandomStream {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: RefCell::new(XorShiftRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derives a fresh stream seeded from this stream's next output.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Self {
        Self::new(self.next_u64())
    }

    pub fn next_u64(&self) -> u64 {
        self.rng.borrow_mut().next_u64()
    }

    /// Uniform index in `0..len`, `None` when `len` is zero.
    pub fn index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.borrow_mut().gen_range(0..len))
    }

    pub fn gen_bool(&self, p: f64) -> bool {
        self.rng.borrow_mut().gen_bool(p)
    }

    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut *self.rng.borrow_mut())
    }

    pub fn choose_iter<T, I>(&self, items: I) -> Option<T>
    where
        I: IntoIterator<Item = T>,
    {
        items.into_iter().choose(&mut *self.rng.borrow_mut())
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.rng.borrow_mut());
    }
}

impl std::fmt::Debug for RandomStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomStream")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
