//! Read-only view of a session for renderers and tooling

use crate::board::Cell;
use crate::color::Color;
use crate::lock::LockPhase;
use crate::tetromino::TetrominoType;
use serde::Serialize;

/// The falling piece as a renderer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePiece {
    pub kind: TetrominoType,
    pub rotation: u8,
    pub cells: [(i32, i32); 4],
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub columns: usize,
    pub rows: usize,
    /// Settled cells, row-major
    pub cells: Vec<Cell>,
    pub score: u64,
    pub active: Option<ActivePiece>,
    /// Rows highlighted and waiting to be removed
    pub marked_rows: Vec<usize>,
    pub lock_phase: LockPhase,
    pub paused: bool,
    pub can_act: bool,
    pub game_over: bool,
    pub elapsed_ms: u64,
}

impl Snapshot {
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.columns + x]
    }

    /// Character grid: `@` active piece, `*` marked row, `#` settled, `.` empty
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for y in 0..self.rows {
            for x in 0..self.columns {
                let is_active = self.active.as_ref().is_some_and(|piece| {
                    piece.cells.contains(&(x as i32, y as i32))
                });
                let ch = if is_active {
                    '@'
                } else if self.marked_rows.contains(&y) {
                    '*'
                } else if self.cell(x, y).occupied {
                    '#'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
