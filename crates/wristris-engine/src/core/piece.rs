use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A falling piece: a shape matrix anchored at a board position.
///
/// Pieces are immutable values. Movement and rotation return new pieces and
/// leave validation against the board to the caller.
///
/// # Example
///
/// ```
/// use wristris_engine::{Piece, PieceKind, PiecePosition};
///
/// let piece = Piece::spawned(PieceKind::O, 10);
/// assert_eq!(piece.position(), PiecePosition::new(4, 0));
///
/// let rotated = Piece::spawned(PieceKind::I, 10).rotated();
/// assert_eq!((rotated.shape().width(), rotated.shape().height()), (1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: PieceShape,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece in its rotation-0 shape at `position`.
    #[must_use]
    pub fn new(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position,
        }
    }

    /// Creates a piece horizontally centered on a board `cols` wide, at row 0.
    #[must_use]
    pub fn spawned(kind: PieceKind, cols: u8) -> Self {
        let shape = kind.shape();
        let x = cols.saturating_sub(shape.width()) / 2;
        Self::new(kind, PiecePosition::new(i32::from(x), 0))
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> PieceShape {
        self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Absolute board coordinates of every set cell.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i32, i32), { PieceShape::MAX_CELLS }> {
        self.shape.cells_at(self.position).collect()
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.shifted(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.moved(0, 1)
    }

    /// Rotates the shape 90° clockwise around the unchanged top-left anchor.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..*self
        }
    }
}

/// Column and row of a piece's top-left cell.
///
/// Coordinates are signed: candidate positions may lie left of or above the
/// grid while a move is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Binary matrix of a piece, at most 4×4.
///
/// Each row is a bitmask where bit `x` marks column `x` as set.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    width: u8,
    height: u8,
    rows: [u8; 4],
}

impl PieceShape {
    pub const MAX_CELLS: usize = 16;

    /// Builds a shape from a row-major 0/1 matrix.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_matrix<const W: usize, const H: usize>(matrix: [[u8; W]; H]) -> Self {
        assert!(W > 0 && W <= 4 && H > 0 && H <= 4);
        let mut rows = [0; 4];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                if matrix[y][x] != 0 {
                    rows[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W as u8,
            height: H as u8,
            rows,
        }
    }

    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> u8 {
        self.height
    }

    #[must_use]
    pub const fn is_set(self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height && self.rows[y as usize] & (1 << x) != 0
    }

    /// Offsets `(dx, dy)` of set cells, row by row.
    pub fn offsets(self) -> impl Iterator<Item = (u8, u8)> {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.is_set(x, y).then_some((x, y)))
        })
    }

    /// Absolute coordinates of set cells when the top-left cell is at `position`.
    pub fn cells_at(self, position: PiecePosition) -> impl Iterator<Item = (i32, i32)> {
        self.offsets().map(move |(dx, dy)| {
            (
                position.x() + i32::from(dx),
                position.y() + i32::from(dy),
            )
        })
    }

    /// Transposes and reverses the matrix, a 90° clockwise turn.
    ///
    /// The result has the width and height swapped.
    #[must_use]
    pub fn rotated(self) -> Self {
        let mut rows = [0; 4];
        for (y, row) in rows.iter_mut().enumerate().take(usize::from(self.width)) {
            for x in 0..self.height {
                // new[y][x] = old[h - 1 - x][y]
                let Ok(src_x) = u8::try_from(y) else {
                    continue;
                };
                if self.is_set(src_x, self.height - 1 - x) {
                    *row |= 1 << x;
                }
            }
        }
        Self {
            width: self.height,
            height: self.width,
            rows,
        }
    }
}

impl fmt::Debug for PieceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PieceShape({self})")
    }
}

impl fmt::Display for PieceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                f.write_str("/")?;
            }
            for x in 0..self.width {
                f.write_str(if self.is_set(x, y) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = [
    PieceShape::from_matrix([[1, 1, 1, 1]]),
    PieceShape::from_matrix([[1, 0, 0], [1, 1, 1]]),
    PieceShape::from_matrix([[0, 0, 1], [1, 1, 1]]),
    PieceShape::from_matrix([[1, 1], [1, 1]]),
    PieceShape::from_matrix([[0, 1, 1], [1, 1, 0]]),
    PieceShape::from_matrix([[0, 1, 0], [1, 1, 1]]),
    PieceShape::from_matrix([[1, 1, 0], [0, 1, 1]]),
];

/// Uniform choice among the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
    ];

    /// Rotation-0 shape of this kind.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        PIECE_SHAPES[self as usize]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }
}
