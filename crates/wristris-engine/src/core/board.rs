use std::fmt;

use serde::{Deserialize, Serialize};

use super::piece::{Piece, PiecePosition, PieceShape};

/// Dimensions of the playing grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub cols: u8,
    pub rows: u8,
}

impl BoardSize {
    /// 10 columns by 12 rows, sized for a wrist-worn screen.
    pub const DEFAULT: Self = Self::new(10, 12);

    /// Widest board a [`BitRow`] can hold.
    pub const MAX_COLS: u8 = 16;

    #[must_use]
    pub const fn new(cols: u8, rows: u8) -> Self {
        Self { cols, rows }
    }

    #[must_use]
    pub fn cell_count(self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Single board row stored as a bitmask.
///
/// Bit `x` is set when column `x` is occupied. Bits at or beyond the board
/// width are never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitRow {
    bits: u16,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };

    /// Mask with the lowest `cols` bits set.
    #[must_use]
    pub fn full_mask(cols: u8) -> u16 {
        let bits = (1_u32 << cols) - 1;
        u16::try_from(bits).unwrap_or(u16::MAX)
    }

    #[inline]
    #[must_use]
    pub fn is_filled(self, cols: u8) -> bool {
        let mask = Self::full_mask(cols);
        self.bits & mask == mask
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        x < 16 && self.bits & (1 << x) != 0
    }

    #[inline]
    fn occupy_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    /// Iterates over the occupancy of the first `cols` cells.
    pub fn iter_cells(self, cols: u8) -> impl Iterator<Item = bool> {
        (0..usize::from(cols)).map(move |x| self.is_cell_occupied(x))
    }
}

/// The grid of locked cells.
///
/// Row 0 is the top of the grid and `y` grows downward. Positions above the
/// top (negative `y`) are outside the grid but never blocked, so pieces may
/// rotate or spawn partially off-board.
///
/// # Example
///
/// ```
/// use wristris_engine::{Board, BoardSize, Piece, PieceKind, PiecePosition};
///
/// let board = Board::new(BoardSize::DEFAULT);
/// let piece = Piece::new(PieceKind::O, PiecePosition::new(4, 0));
/// assert!(!board.is_colliding(&piece));
/// assert!(board.is_colliding(&piece.moved(0, 11)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    rows: Vec<BitRow>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `size.cols` exceeds [`BoardSize::MAX_COLS`].
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        assert!(size.cols <= BoardSize::MAX_COLS);
        Self {
            size,
            rows: vec![BitRow::EMPTY; usize::from(size.rows)],
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows.iter().copied()
    }

    /// Returns `(x, y)` of every occupied cell, row by row from the top.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        let cols = self.size.cols;
        (0..self.size.rows).flat_map(move |y| {
            let row = self.rows[usize::from(y)];
            (0..cols).filter_map(move |x| row.is_cell_occupied(usize::from(x)).then_some((x, y)))
        })
    }

    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.is_shape_colliding(piece.shape(), piece.position())
    }

    /// Checks whether `shape` placed with its top-left cell at `position`
    /// leaves the side or bottom bounds or overlaps a locked cell.
    #[must_use]
    pub fn is_shape_colliding(&self, shape: PieceShape, position: PiecePosition) -> bool {
        let cols = usize::from(self.size.cols);
        let rows = usize::from(self.size.rows);
        for (x, y) in shape.cells_at(position) {
            let Ok(x) = usize::try_from(x) else {
                return true;
            };
            if x >= cols {
                return true;
            }
            // Above the top is always free.
            let Ok(y) = usize::try_from(y) else {
                continue;
            };
            if y >= rows || self.rows[y].is_cell_occupied(x) {
                return true;
            }
        }
        false
    }

    /// Locks the piece's cells into the board.
    ///
    /// Cells above the top of the grid are discarded.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let cols = usize::from(self.size.cols);
        for (x, y) in piece.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x < cols
                && let Some(row) = self.rows.get_mut(y)
            {
                row.occupy_cell(x);
            }
        }
    }

    /// Removes every filled row and returns how many were removed.
    ///
    /// Rows above a removed row shift down and empty rows are inserted at
    /// the top, so the board height never changes.
    pub fn clear_lines(&mut self) -> usize {
        let cols = self.size.cols;
        let mut count = 0;
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].is_filled(cols) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BitRow::EMPTY);
        count
    }

    /// Creates a board from ASCII art, `#` for occupied and `.` for empty.
    ///
    /// The width is taken from the first row, the height from the number of
    /// non-blank lines. Meant for tests and fixtures.
    ///
    /// # Panics
    ///
    /// Panics if rows have different widths or the width exceeds
    /// [`BoardSize::MAX_COLS`].
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<bool>> = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .map(|c| c == '#')
                    .collect()
            })
            .collect();
        let cols = lines.first().map_or(0, Vec::len);
        let size = BoardSize::new(
            u8::try_from(cols).expect("board too wide"),
            u8::try_from(lines.len()).expect("board too tall"),
        );
        let mut board = Self::new(size);
        for (y, line) in lines.iter().enumerate() {
            assert_eq!(
                line.len(),
                cols,
                "Each row must have exactly {cols} cells, got {} at row {y}",
                line.len()
            );
            for (x, _) in line.iter().enumerate().filter(|(_, occupied)| **occupied) {
                board.rows[y].occupy_cell(x);
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for occupied in row.iter_cells(self.size.cols) {
                f.write_str(if occupied { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
