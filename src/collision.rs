//! Collision detection - walls, floor, settled cells
//!
//! Every check here is a pure read of the board.

use crate::board::Board;
use crate::piece::Piece;

/// Can a single cell be occupied?
pub fn is_free(board: &Board, x: i32, y: i32) -> bool {
    matches!(board.get(x, y), Some(cell) if !cell.occupied)
}

/// Can every one of these cells be occupied?
pub fn fits(board: &Board, cells: &[(i32, i32)]) -> bool {
    cells.iter().all(|&(x, y)| is_free(board, x, y))
}

/// Would the piece still fit after moving by (dx, dy)?
pub fn can_move(board: &Board, piece: &Piece, dx: i32, dy: i32) -> bool {
    fits(board, &piece.shifted(dx, dy).cells())
}

pub fn can_move_left(board: &Board, piece: &Piece) -> bool {
    can_move(board, piece, -1, 0)
}

pub fn can_move_right(board: &Board, piece: &Piece) -> bool {
    can_move(board, piece, 1, 0)
}

pub fn can_move_down(board: &Board, piece: &Piece) -> bool {
    can_move(board, piece, 0, 1)
}

/// Would the piece fit in its next rotation state?
pub fn can_rotate(board: &Board, piece: &Piece) -> bool {
    fits(board, &piece.rotated().cells())
}
