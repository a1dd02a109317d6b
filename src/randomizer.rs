//! Seeded piece generation
//!
//! Two strategies share one preview queue:
//! - `uniform`: every piece is drawn independently
//! - `bag`: all 7 pieces are shuffled, then dealt out before reshuffling
//!
//! Colors are drawn from the palette independently of the shape.

use crate::color::{Color, DEFAULT_PALETTE};
use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomizerKind {
    #[default]
    Uniform,
    Bag,
}

#[derive(Debug, Clone)]
pub struct Randomizer {
    kind: RandomizerKind,
    rng: ChaCha8Rng,
    /// Preview queue for upcoming pieces
    queue: Vec<TetrominoType>,
    palette: Vec<Color>,
}

impl Randomizer {
    /// Create a randomizer with an initial queue
    pub fn new(kind: RandomizerKind, palette: Vec<Color>, seed: u64) -> Self {
        let mut randomizer = Self {
            kind,
            rng: ChaCha8Rng::seed_from_u64(seed),
            queue: Vec::with_capacity(14),
            palette,
        };
        randomizer.refill();
        randomizer.refill();
        randomizer
    }

    /// Get the next piece type from the queue
    pub fn next_kind(&mut self) -> TetrominoType {
        if self.queue.len() <= 7 {
            self.refill();
        }
        self.queue.remove(0)
    }

    /// Pick a color for the next piece
    pub fn next_color(&mut self) -> Color {
        self.palette
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(DEFAULT_PALETTE[0])
    }

    /// Preview the next N piece types without removing them
    pub fn preview(&self, count: usize) -> &[TetrominoType] {
        &self.queue[..count.min(self.queue.len())]
    }

    fn refill(&mut self) {
        let all = TetrominoType::all();
        match self.kind {
            RandomizerKind::Uniform => {
                for _ in 0..all.len() {
                    if let Some(&kind) = all.choose(&mut self.rng) {
                        self.queue.push(kind);
                    }
                }
            }
            RandomizerKind::Bag => {
                let mut bag = all.to_vec();
                bag.shuffle(&mut self.rng);
                self.queue.extend(bag);
            }
        }
    }
}
