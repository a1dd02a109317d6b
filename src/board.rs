//! Game board representation
//!
//! The board is a flat row-major grid. Coordinates are `(x, y)` with `x`
//! counting columns from the left and `y` counting rows from the top.

use crate::color::Color;
use std::fmt;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Cell {
    pub occupied: bool,
    pub color: Color,
}

impl Cell {
    pub const fn empty(color: Color) -> Self {
        Self {
            occupied: false,
            color,
        }
    }

    pub const fn filled(color: Color) -> Self {
        Self {
            occupied: true,
            color,
        }
    }
}

/// The settled cells of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    rows: usize,
    empty_color: Color,
    /// Grid stored as `y * columns + x`
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(columns: usize, rows: usize, empty_color: Color) -> Self {
        Self {
            columns,
            rows,
            empty_color,
            cells: vec![Cell::empty(empty_color); columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn empty_color(&self) -> Color {
        self.empty_color
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.columns || y >= self.rows {
            return None;
        }
        Some(y * self.columns + x)
    }

    /// Index of an in-range coordinate. Anything else is a logic fault.
    fn index_checked(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.columns && y < self.rows,
            "board coordinate ({x}, {y}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        y * self.columns + x
    }

    /// Get the cell at (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Cell at an in-range coordinate; panics otherwise
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index_checked(x, y)]
    }

    /// Overwrite the cell at an in-range coordinate; panics otherwise
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let idx = self.index_checked(x, y);
        self.cells[idx] = cell;
    }

    /// True when (x, y) is inside the grid and holds a settled block
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.occupied)
    }

    /// Copy a piece's cells into the grid
    pub fn lock_cells(&mut self, positions: &[(i32, i32)], color: Color) {
        for &(x, y) in positions {
            let idx = self
                .index(x, y)
                .unwrap_or_else(|| panic!("locked cell ({x}, {y}) is off the board"));
            debug_assert!(!self.cells[idx].occupied, "locked cell ({x}, {y}) already taken");
            self.cells[idx] = Cell::filled(color);
        }
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = self.index_checked(0, y);
        &self.cells[start..start + self.columns]
    }

    fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        let start = self.index_checked(0, y);
        let columns = self.columns;
        &mut self.cells[start..start + columns]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| cell.occupied)
    }

    /// Check if any cell of a row is filled
    pub fn row_has_block(&self, y: usize) -> bool {
        self.row(y).iter().any(|cell| cell.occupied)
    }

    /// Repaint every cell of a row without touching occupancy
    pub fn paint_row(&mut self, y: usize, color: Color) {
        for cell in self.row_mut(y) {
            cell.color = color;
        }
    }

    /// Reset every cell of a row to empty
    pub fn clear_row(&mut self, y: usize) {
        let empty = Cell::empty(self.empty_color);
        self.row_mut(y).fill(empty);
    }

    /// Reset the whole grid to empty in place
    pub fn reset(&mut self) {
        let empty = Cell::empty(self.empty_color);
        self.cells.fill(empty);
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.occupied)
    }

    /// Number of filled cells in a column
    pub fn column_height(&self, x: usize) -> usize {
        (0..self.rows).filter(|&y| self.cell(x, y).occupied).count()
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// `#` for filled cells, `.` for empty ones, one line per row
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            for cell in self.row(y) {
                f.write_str(if cell.occupied { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20, Color::EMPTY);
        assert!(board.is_empty());
        assert_eq!(board.cells().len(), 200);
        assert_eq!(board.get(0, 0), Some(Cell::empty(Color::EMPTY)));
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new(10, 20, Color::EMPTY);
        board.set(5, 7, Cell::filled(RED));
        assert_eq!(board.get(5, 7), Some(Cell::filled(RED)));
        assert!(board.is_occupied(5, 7));
        assert!(!board.is_occupied(7, 5));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new(10, 20, Color::EMPTY);
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(10, 0), None);
        assert_eq!(board.get(0, 20), None);
        assert!(!board.is_occupied(-1, 0));
    }

    #[test]
    #[should_panic(expected = "outside 10x20 grid")]
    fn test_unchecked_access_fails_fast() {
        let board = Board::new(10, 20, Color::EMPTY);
        board.cell(10, 0);
    }

    #[test]
    fn test_row_queries() {
        let mut board = Board::new(4, 4, Color::EMPTY);
        board.lock_cells(&[(0, 3), (1, 3), (2, 3), (3, 3), (2, 2)], RED);
        assert!(board.is_row_full(3));
        assert!(!board.is_row_full(2));
        assert!(board.row_has_block(2));
        assert!(!board.row_has_block(1));
        assert_eq!(board.column_height(2), 2);

        board.paint_row(3, Color::HIGHLIGHT);
        assert!(board.is_row_full(3));
        assert_eq!(board.cell(0, 3).color, Color::HIGHLIGHT);

        board.clear_row(3);
        assert!(!board.row_has_block(3));
        assert_eq!(board.cell(0, 3), Cell::empty(Color::EMPTY));
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3, 2, Color::EMPTY);
        board.set(1, 1, Cell::filled(RED));
        assert_eq!(board.to_string(), "...\n.#.\n");
        board.reset();
        assert!(board.is_empty());
    }
}
