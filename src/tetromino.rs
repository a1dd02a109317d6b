//! Tetromino definitions and shapes
//!
//! Every shape lives in a 4x4 box anchored at its top-left corner. Offsets
//! are `(x, y)` with `y` growing downward. Rotation just steps through the
//! listed states; there is no kick table.

use serde::{Deserialize, Serialize};

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

type Offsets = [(i32, i32); 4];

const I_STATES: &[Offsets] = &[
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const O_STATES: &[Offsets] = &[[(1, 0), (2, 0), (1, 1), (2, 1)]];

// .T.   .T.   ...   .T.
// TTT   .TT   TTT   TT.
//       .T.   .T.   .T.
const T_STATES: &[Offsets] = &[
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_STATES: &[Offsets] = &[
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
];

const Z_STATES: &[Offsets] = &[
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
];

const J_STATES: &[Offsets] = &[
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_STATES: &[Offsets] = &[
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

impl TetrominoType {
    /// Get all tetromino types
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    fn states(&self) -> &'static [Offsets] {
        match self {
            TetrominoType::I => I_STATES,
            TetrominoType::O => O_STATES,
            TetrominoType::T => T_STATES,
            TetrominoType::S => S_STATES,
            TetrominoType::Z => Z_STATES,
            TetrominoType::J => J_STATES,
            TetrominoType::L => L_STATES,
        }
    }

    /// Number of distinct rotation states
    pub fn rotation_count(&self) -> u8 {
        self.states().len() as u8
    }

    /// Rotation state that follows `rotation`, wrapping to the first
    pub fn next_rotation(&self, rotation: u8) -> u8 {
        (rotation + 1) % self.rotation_count()
    }

    /// Get the 4 (x, y) offsets of this tetromino at a rotation state
    pub fn shape(&self, rotation: u8) -> [(i32, i32); 4] {
        let states = self.states();
        states[rotation as usize % states.len()]
    }
}
