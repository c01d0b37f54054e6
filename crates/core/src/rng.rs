//! RNG module - piece sequencing strategies
//!
//! The engine asks a [`Randomizer`] for the next kind each time it promotes
//! the preview piece. Three strategies ship:
//!
//! - [`UniformRandomizer`]: independent uniform pick per spawn (default)
//! - [`BagRandomizer`]: the "7-bag", one of each kind per shuffled bag
//! - [`SequenceRandomizer`]: cycles a fixed list, for scripted sessions
//!
//! All randomness comes from a small LCG so a session is reproducible from
//! its seed.

use crate::error::ConfigError;
use crate::types::{PieceKind, RandomizerKind};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (((self.next_u32() >> 8) as u64 * max as u64) >> 24) as u32
    }

    /// Shuffle a slice using Fisher-Yates
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

/// Source of upcoming piece kinds.
pub trait Randomizer: Send + std::fmt::Debug {
    fn next_kind(&mut self) -> PieceKind;
}

/// Uniform choice among the seven kinds.
#[derive(Debug, Clone)]
pub struct UniformRandomizer {
    rng: SimpleRng,
}

impl UniformRandomizer {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl Randomizer for UniformRandomizer {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(7) as usize]
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    rng: SimpleRng,
}

impl BagRandomizer {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill_bag();
        bag
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Pieces left in the current bag.
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl Randomizer for BagRandomizer {
    fn next_kind(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }
}

/// Replays a fixed list of kinds, wrapping at the end.
#[derive(Debug, Clone)]
pub struct SequenceRandomizer {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl SequenceRandomizer {
    pub fn new(kinds: Vec<PieceKind>) -> Result<Self, ConfigError> {
        if kinds.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        Ok(Self { kinds, pos: 0 })
    }
}

impl Randomizer for SequenceRandomizer {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.pos];
        self.pos = (self.pos + 1) % self.kinds.len();
        kind
    }
}

/// Build the configured strategy.
pub fn build_randomizer(kind: RandomizerKind, seed: u32) -> Box<dyn Randomizer> {
    match kind {
        RandomizerKind::Uniform => Box::new(UniformRandomizer::new(seed)),
        RandomizerKind::Bag => Box::new(BagRandomizer::new(seed)),
    }
}
