//! Full-row detection, scoring, and the collapse that follows
//!
//! A clear happens in two steps so the caller can hold a highlight window
//! between them: [`LineClearEngine::mark`] paints the rows, then
//! [`LineClearEngine::collapse`] empties them and drops everything above.

use crate::board::{Board, Cell};
use crate::color::Color;

#[derive(Debug, Clone)]
pub struct LineClearEngine {
    per_square_score: u64,
    highlight: Color,
}

impl LineClearEngine {
    pub fn new(per_square_score: u64, highlight: Color) -> Self {
        Self {
            per_square_score,
            highlight,
        }
    }

    /// Indices of every full row, top to bottom
    pub fn detect(board: &Board) -> Vec<usize> {
        (0..board.rows()).filter(|&y| board.is_row_full(y)).collect()
    }

    /// Points for clearing `rows` rows at once
    pub fn score(&self, columns: usize, rows: usize) -> u64 {
        columns as u64 * rows as u64 * self.per_square_score
    }

    /// Paint rows that are about to disappear
    pub fn mark(&self, board: &mut Board, rows: &[usize]) {
        for &y in rows {
            board.paint_row(y, self.highlight);
        }
    }

    /// Empty the cleared rows and shift every surviving row down by the
    /// number of cleared rows beneath it
    pub fn collapse(board: &mut Board, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        for &y in rows {
            board.clear_row(y);
        }

        let mut cleared = vec![false; board.rows()];
        for &y in rows {
            cleared[y] = true;
        }

        let empty = Cell::empty(board.empty_color());
        for x in 0..board.columns() {
            // Cells are copied by value from the bottom up, so a source row
            // is always read before anything overwrites it.
            let mut write = board.rows();
            for y in (0..board.rows()).rev() {
                if cleared[y] {
                    continue;
                }
                write -= 1;
                if write != y {
                    let cell = board.cell(x, y);
                    board.set(x, write, cell);
                }
            }
            for y in 0..write {
                board.set(x, y, empty);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const GOLD: Color = Color::rgb(0xFF, 0xD3, 0x00);

    fn engine() -> LineClearEngine {
        LineClearEngine::new(1, Color::HIGHLIGHT)
    }

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.columns() {
            board.set(x, y, Cell::filled(GOLD));
        }
    }

    #[test]
    fn test_detect_nothing_on_partial_rows() {
        let mut board = Board::new(10, 20, Color::EMPTY);
        for x in 0..9 {
            board.set(x, 19, Cell::filled(GOLD));
        }
        let before = board.clone();
        let rows = LineClearEngine::detect(&board);
        assert!(rows.is_empty());
        LineClearEngine::collapse(&mut board, &rows);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_bottom_row() {
        let mut board = Board::new(10, 20, Color::EMPTY);
        fill_row(&mut board, 19);
        board.set(0, 18, Cell::filled(GOLD));
        board.set(4, 17, Cell::filled(Color::rgb(1, 2, 3)));

        let rows = LineClearEngine::detect(&board);
        assert_eq!(rows, vec![19]);
        assert_eq!(engine().score(board.columns(), rows.len()), 10);

        LineClearEngine::collapse(&mut board, &rows);
        assert_eq!(board.cell(0, 19), Cell::filled(GOLD));
        assert_eq!(board.cell(4, 18), Cell::filled(Color::rgb(1, 2, 3)));
        assert!(!board.cell(1, 19).occupied);
        assert!(!board.row_has_block(17));
    }

    #[test]
    fn test_mark_keeps_rows_full() {
        let mut board = Board::new(4, 6, Color::EMPTY);
        fill_row(&mut board, 5);
        engine().mark(&mut board, &[5]);
        assert!(board.is_row_full(5));
        assert!((0..4).all(|x| board.cell(x, 5).color == Color::HIGHLIGHT));
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new(4, 6, Color::EMPTY);
        // Rows, top to bottom:
        // 0 ....
        // 1 #...
        // 2 ####
        // 3 .#..
        // 4 ####
        // 5 ..#.
        board.set(0, 1, Cell::filled(GOLD));
        fill_row(&mut board, 2);
        board.set(1, 3, Cell::filled(GOLD));
        fill_row(&mut board, 4);
        board.set(2, 5, Cell::filled(GOLD));

        let rows = LineClearEngine::detect(&board);
        assert_eq!(rows, vec![2, 4]);
        LineClearEngine::collapse(&mut board, &rows);
        assert_eq!(board.to_string(), "....\n....\n....\n#...\n.#..\n..#.\n");
    }

    #[test]
    fn test_clear_whole_board() {
        let mut board = Board::new(4, 4, Color::EMPTY);
        for y in 0..4 {
            fill_row(&mut board, y);
        }
        let rows = LineClearEngine::detect(&board);
        assert_eq!(rows, vec![0, 1, 2, 3]);
        assert_eq!(engine().score(4, rows.len()), 16);
        LineClearEngine::collapse(&mut board, &rows);
        assert!(board.is_empty());
    }

    #[test]
    fn test_collapse_preserves_columns_on_random_boards() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let (columns, rows) = (rng.gen_range(4..12), rng.gen_range(4..24));
            let mut board = Board::new(columns, rows, Color::EMPTY);
            for y in 0..rows {
                if rng.gen_bool(0.3) {
                    fill_row(&mut board, y);
                    continue;
                }
                for x in 0..columns {
                    if rng.gen_bool(0.5) {
                        board.set(x, y, Cell::filled(Color::rgb(x as u8, y as u8, 0)));
                    }
                }
            }

            let before = board.clone();
            let cleared = LineClearEngine::detect(&board);
            LineClearEngine::collapse(&mut board, &cleared);

            for x in 0..columns {
                assert_eq!(
                    board.column_height(x),
                    before.column_height(x) - cleared.len()
                );
                // Each surviving row lands exactly below by the cleared rows beneath it
                for y in (0..rows).filter(|y| !cleared.contains(y)) {
                    let below = cleared.iter().filter(|&&c| c > y).count();
                    assert_eq!(board.cell(x, y + below), before.cell(x, y));
                }
            }
            assert!(LineClearEngine::detect(&board).is_empty());
        }
    }
}
