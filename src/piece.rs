//! Active falling piece logic

use crate::board::Board;
use crate::collision;
use crate::color::Color;
use crate::tetromino::TetrominoType;

/// An active falling piece
///
/// Only the anchor and rotation state are stored; the occupied cells are
/// always derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Index into the type's rotation states
    pub rotation: u8,
    /// Column of the top-left corner of the shape box
    pub x: i32,
    /// Row of the top-left corner of the shape box
    pub y: i32,
    pub color: Color,
}

impl Piece {
    /// Create a piece at an explicit anchor
    pub fn new(kind: TetrominoType, color: Color, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: 0,
            x,
            y,
            color,
        }
    }

    /// Create a new piece centered on the top row of a board
    pub fn spawn(kind: TetrominoType, color: Color, columns: usize) -> Self {
        let x = (columns as i32 - 4).max(0) / 2;
        Self::new(kind, color, x, 0)
    }

    /// Get the absolute (x, y) positions of all 4 blocks
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.kind
            .shape(self.rotation)
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same piece in its next rotation state, anchor unchanged
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.kind.next_rotation(self.rotation),
            ..*self
        }
    }

    /// Move by (dx, dy) if the destination is free, returns true if successful
    pub fn try_shift(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        if !collision::can_move(board, self, dx, dy) {
            return false;
        }
        *self = self.shifted(dx, dy);
        true
    }

    /// Rotate in place if the new cells are free, returns true if successful
    pub fn try_rotate(&mut self, board: &Board) -> bool {
        if !collision::can_rotate(board, self) {
            return false;
        }
        *self = self.rotated();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    const BLUE: Color = Color::rgb(0, 0, 255);

    fn board() -> Board {
        Board::new(10, 20, Color::EMPTY)
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(TetrominoType::T, BLUE, 10);
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!(piece.rotation, 0);
        assert_eq!(piece.cells(), [(4, 0), (3, 1), (4, 1), (5, 1)]);
    }

    #[test]
    fn test_cells_follow_anchor() {
        let piece = Piece::new(TetrominoType::O, BLUE, 0, 5);
        assert_eq!(piece.shifted(2, 1).cells(), [(3, 6), (4, 6), (3, 7), (4, 7)]);
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let board = board();
        let mut piece = Piece::new(TetrominoType::I, BLUE, 0, 0);
        assert!(!piece.try_shift(-1, 0, &board));
        assert_eq!(piece.x, 0);
        assert!(piece.try_shift(1, 0, &board));
        assert_eq!(piece.x, 1);
    }

    #[test]
    fn test_move_blocked_by_settled_cell() {
        let mut board = board();
        board.set(4, 2, Cell::filled(BLUE));
        let mut piece = Piece::spawn(TetrominoType::T, BLUE, 10);
        assert!(!piece.try_shift(0, 1, &board));
        assert_eq!(piece.y, 0);
    }

    #[test]
    fn test_rotation_cycles() {
        let board = board();
        let mut piece = Piece::new(TetrominoType::T, BLUE, 3, 5);
        for expected in [1, 2, 3, 0] {
            assert!(piece.try_rotate(&board));
            assert_eq!(piece.rotation, expected);
        }
    }

    #[test]
    fn test_rotation_rejected_without_kick() {
        let board = board();
        // Horizontal I on the bottom row: the vertical state would poke below the floor
        let mut piece = Piece::new(TetrominoType::I, BLUE, 3, 19);
        let before = piece;
        assert!(!piece.try_rotate(&board));
        assert_eq!(piece, before);
    }
}
