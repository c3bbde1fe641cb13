//! 7-bag piece randomizer.
//!
//! All seven kinds are shuffled into a bag and drawn one at a time; an empty
//! bag is refilled with a fresh Fisher-Yates shuffle. Within one fill every
//! kind appears exactly once, so no kind repeats more than once in any seven
//! consecutive draws from a single fill.
//!
//! Randomness comes from a small seedable LCG so games are reproducible in
//! tests and replays.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform-ish value in `[0, max)`. `max` must be non-zero.
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// The bag randomizer. Draw with [`BagRandomizer::next`], look ahead with
/// [`BagRandomizer::peek`].
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    /// Remaining kinds of the current fill, drawn from the back.
    bag: ArrayVec<PieceKind, 7>,
    rng: SimpleRng,
}

impl BagRandomizer {
    /// A randomizer with an empty bag; the first draw shuffles a fresh fill.
    pub fn new(seed: u32) -> Self {
        Self {
            bag: ArrayVec::new(),
            rng: SimpleRng::new(seed),
        }
    }

    fn refill(bag: &mut ArrayVec<PieceKind, 7>, rng: &mut SimpleRng) {
        bag.clear();
        bag.extend(PieceKind::ALL);
        rng.shuffle(bag.as_mut_slice());
    }

    /// Draw the next kind, refilling the bag first if it is empty.
    pub fn next(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            Self::refill(&mut self.bag, &mut self.rng);
        }
        // Refill guarantees at least one element.
        self.bag.pop().unwrap()
    }

    /// The next `n` kinds in draw order, without consuming anything. Looks
    /// across bag boundaries by replaying the refill on scratch state.
    pub fn peek(&self, n: usize) -> Vec<PieceKind> {
        let mut scratch_bag = self.bag.clone();
        let mut scratch_rng = self.rng.clone();

        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            if scratch_bag.is_empty() {
                Self::refill(&mut scratch_bag, &mut scratch_rng);
            }
            out.push(scratch_bag.pop().unwrap());
        }
        out
    }

    /// Empty the bag so the next draw forces a fresh shuffle. Used when a
    /// new game starts.
    pub fn reset(&mut self) {
        self.bag.clear();
    }

    /// Remaining draws before the next refill.
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }
}
