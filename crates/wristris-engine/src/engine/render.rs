use crate::PieceKind;

use super::{GameField, HighScore, SessionState};

/// What a positioned block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Locked,
    Falling(PieceKind),
}

/// One visible block of the sprite pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Board column.
    pub col: u8,
    /// Board row.
    pub row: u8,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    pub kind: SpriteKind,
}

/// Blocks to show for one frame.
///
/// The first [`visible`](Self::visible) pool elements are positioned by
/// `sprites`, the remaining [`hidden`](Self::hidden) elements must be hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteFrame {
    sprites: Vec<Sprite>,
    hidden: usize,
    dropped: usize,
}

impl SpriteFrame {
    #[must_use]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    #[must_use]
    pub fn visible(&self) -> usize {
        self.sprites.len()
    }

    #[must_use]
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Cells that had no pool element left and were not drawn.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// A fixed pool of on-screen blocks.
///
/// Locked cells are laid out first, row by row from the top, followed by the
/// falling piece. Cells above the grid are skipped and cells beyond the pool
/// capacity are silently not drawn.
///
/// # Example
///
/// ```
/// use wristris_engine::{BoardSize, GameField, PieceKind, SpritePool};
///
/// let mut field = GameField::new(BoardSize::DEFAULT);
/// field.spawn_piece(PieceKind::O)?;
///
/// let frame = SpritePool::new(3, 18).layout(&field);
/// assert_eq!(frame.visible(), 3);
/// assert_eq!(frame.dropped(), 1);
/// assert_eq!((frame.sprites()[0].x, frame.sprites()[0].y), (72, 0));
/// # Ok::<(), wristris_engine::PieceCollisionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpritePool {
    capacity: usize,
    block_size: u32,
}

impl SpritePool {
    #[must_use]
    pub const fn new(capacity: usize, block_size: u32) -> Self {
        Self {
            capacity,
            block_size,
        }
    }

    #[must_use]
    pub fn layout(&self, field: &GameField) -> SpriteFrame {
        let size = field.board().size();
        let locked = field
            .occupied_cells()
            .map(|(col, row)| (col, row, SpriteKind::Locked));
        let falling_kind = field.falling_piece().map(|piece| piece.kind());
        let falling = field.falling_cells().filter_map(move |(x, y)| {
            let col = u8::try_from(x).ok().filter(|col| *col < size.cols)?;
            let row = u8::try_from(y).ok().filter(|row| *row < size.rows)?;
            Some((col, row, SpriteKind::Falling(falling_kind?)))
        });

        let mut sprites = Vec::with_capacity(self.capacity.min(size.cell_count()));
        let mut dropped = 0;
        for (col, row, kind) in locked.chain(falling) {
            if sprites.len() == self.capacity {
                dropped += 1;
                continue;
            }
            sprites.push(Sprite {
                col,
                row,
                x: u32::from(col) * self.block_size,
                y: u32::from(row) * self.block_size,
                kind,
            });
        }
        SpriteFrame {
            hidden: self.capacity - sprites.len(),
            sprites,
            dropped,
        }
    }
}

/// Text-side state shown next to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub state: SessionState,
    pub score: usize,
    pub cleared_lines: usize,
    pub high_score: Option<HighScore>,
    /// The current game beat the previous high score.
    pub is_new_high_score: bool,
}

/// Rendering capability fed by [`GameSession::present`](super::GameSession::present).
pub trait RenderSink {
    fn draw_sprites(&mut self, frame: &SpriteFrame);

    fn draw_scoreboard(&mut self, scoreboard: &Scoreboard);
}
