use tracing::debug;

use crate::{
    MoveError, NoActivePiece, PieceCollisionError,
    core::{Board, BoardSize, Piece, PieceKind},
};

use super::{GameStats, PieceGenerator, PieceSeed};

/// Result of moving the falling piece one row down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// There was no falling piece.
    NoPiece,
    /// The piece moved down one row.
    Fell,
    /// The piece locked and the next piece spawned.
    Locked { cleared_lines: usize },
    /// The piece locked but the next piece collided at its spawn position.
    ToppedOut { cleared_lines: usize },
}

/// Board, falling piece and score of one game.
///
/// # Example
///
/// ```
/// use wristris_engine::{BoardSize, GameField, PieceKind, PiecePosition};
///
/// let mut field = GameField::new(BoardSize::DEFAULT);
/// field.spawn_piece(PieceKind::O)?;
/// field.try_move(-1)?;
/// assert_eq!(field.falling_piece().unwrap().position(), PiecePosition::new(3, 0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<Piece>,
    generator: PieceGenerator,
    stats: GameStats,
}

impl GameField {
    /// Creates an empty field without a falling piece.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self::with_generator(size, PieceGenerator::new())
    }

    #[must_use]
    pub fn with_seed(size: BoardSize, seed: PieceSeed) -> Self {
        Self::with_generator(size, PieceGenerator::with_seed(seed))
    }

    fn with_generator(size: BoardSize, generator: PieceGenerator) -> Self {
        Self {
            board: Board::new(size),
            falling_piece: None,
            generator,
            stats: GameStats::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_board(board: Board, seed: PieceSeed) -> Self {
        let mut field = Self::with_seed(board.size(), seed);
        field.replace_board(board);
        field
    }

    #[cfg(test)]
    pub(crate) fn replace_board(&mut self, board: Board) {
        self.board = board;
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<Piece> {
        self.falling_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    /// Coordinates of locked cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.board.occupied_cells()
    }

    /// Coordinates of the falling piece's cells, possibly above the grid.
    pub fn falling_cells(&self) -> impl Iterator<Item = (i32, i32)> {
        self.falling_piece
            .map(|piece| piece.cells())
            .into_iter()
            .flatten()
    }

    /// Clears the board and score and spawns the first piece.
    pub fn reset(&mut self) -> Result<(), PieceCollisionError> {
        self.board = Board::new(self.board.size());
        self.stats = GameStats::new();
        self.falling_piece = None;
        self.spawn_next()
    }

    /// Spawns a randomly chosen piece.
    pub fn spawn_next(&mut self) -> Result<(), PieceCollisionError> {
        let kind = self.generator.next_kind();
        self.spawn_piece(kind)
    }

    /// Spawns `kind` centered on row 0.
    ///
    /// When the spawn position already collides the piece is not placed and
    /// the field is left without a falling piece.
    pub fn spawn_piece(&mut self, kind: PieceKind) -> Result<(), PieceCollisionError> {
        let piece = Piece::spawned(kind, self.board.size().cols);
        if self.board.is_colliding(&piece) {
            self.falling_piece = None;
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    /// Replaces the falling piece if it fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    /// Shifts the falling piece `dx` columns; the piece stays put on collision.
    pub fn try_move(&mut self, dx: i32) -> Result<(), MoveError> {
        let piece = self.falling_piece.ok_or(NoActivePiece)?;
        self.set_falling_piece(piece.moved(dx, 0))?;
        Ok(())
    }

    /// Rotates the falling piece clockwise in place; no wall kicks.
    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        let piece = self.falling_piece.ok_or(NoActivePiece)?;
        self.set_falling_piece(piece.rotated())?;
        Ok(())
    }

    /// Moves the falling piece one row down, locking it when it cannot fall.
    ///
    /// Locking merges the piece into the board, clears full rows, scores them
    /// and spawns the next piece.
    pub fn step_down(&mut self) -> DropOutcome {
        let Some(piece) = self.falling_piece else {
            return DropOutcome::NoPiece;
        };
        if self.set_falling_piece(piece.down()).is_ok() {
            return DropOutcome::Fell;
        }

        let cleared_lines = self.lock_piece(piece);
        match self.spawn_next() {
            Ok(()) => DropOutcome::Locked { cleared_lines },
            Err(PieceCollisionError) => DropOutcome::ToppedOut { cleared_lines },
        }
    }

    fn lock_piece(&mut self, piece: Piece) -> usize {
        self.board.fill_piece(&piece);
        self.falling_piece = None;
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);
        debug!(
            kind = %piece.kind().as_char(),
            x = piece.position().x(),
            y = piece.position().y(),
            cleared_lines,
            score = self.stats.score(),
            "piece locked"
        );
        cleared_lines
    }
}

#[cfg(test)]
mod tests {
    use crate::PiecePosition;

    use super::*;

    fn field_with_board(board: Board) -> GameField {
        GameField::with_board(board, PieceSeed::from(0))
    }

    #[test]
    fn test_spawn_on_empty_board_never_collides() {
        for kind in PieceKind::ALL {
            let mut field = GameField::new(BoardSize::DEFAULT);
            assert_eq!(field.spawn_piece(kind), Ok(()), "{kind:?}");
        }
        let mut field = GameField::new(BoardSize::DEFAULT);
        for _ in 0..50 {
            assert_eq!(field.reset(), Ok(()));
        }
    }

    #[test]
    fn test_move_left_until_wall() {
        let mut field = GameField::new(BoardSize::new(10, 12));
        field.spawn_piece(PieceKind::O).unwrap();
        assert_eq!(
            field.falling_piece().unwrap().position(),
            PiecePosition::new(4, 0)
        );

        field.try_move(-1).unwrap();
        assert_eq!(
            field.falling_piece().unwrap().position(),
            PiecePosition::new(3, 0)
        );

        while field.falling_piece().unwrap().position().x() > 0 {
            field.try_move(-1).unwrap();
        }
        assert_eq!(
            field.try_move(-1),
            Err(MoveError::Collision(PieceCollisionError))
        );
        assert_eq!(
            field.falling_piece().unwrap().position(),
            PiecePosition::new(0, 0)
        );
    }

    #[test]
    fn test_move_right_until_wall() {
        let mut field = GameField::new(BoardSize::new(10, 12));
        field.spawn_piece(PieceKind::I).unwrap();
        for _ in 0..10 {
            _ = field.try_move(1);
        }
        assert_eq!(
            field.falling_piece().unwrap().position(),
            PiecePosition::new(6, 0)
        );
    }

    #[test]
    fn test_commands_without_piece() {
        let mut field = GameField::new(BoardSize::DEFAULT);
        assert_eq!(field.try_move(1), Err(MoveError::NoPiece(NoActivePiece)));
        assert_eq!(field.try_rotate(), Err(MoveError::NoPiece(NoActivePiece)));
        assert_eq!(field.step_down(), DropOutcome::NoPiece);
    }

    #[test]
    fn test_rotation_reverts_on_collision() {
        let board = Board::from_ascii(
            "\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ...#......\n\
            ..........\n",
        );
        let mut field = field_with_board(board.clone());
        // Standing the I up at column 3 would reach the block at (3, 4).
        field
            .set_falling_piece(Piece::new(PieceKind::I, PiecePosition::new(3, 1)))
            .unwrap();
        assert_eq!(
            field.try_rotate(),
            Err(MoveError::Collision(PieceCollisionError))
        );
        assert_eq!(
            field.falling_piece().unwrap().shape(),
            PieceKind::I.shape()
        );

        // Rotations never touch the board.
        field
            .set_falling_piece(Piece::new(PieceKind::T, PiecePosition::new(6, 0)))
            .unwrap();
        field.try_rotate().unwrap();
        _ = field.try_rotate();
        assert_eq!(field.board(), &board);
    }

    #[test]
    fn test_rotation_against_wall_has_no_kick() {
        let mut field = GameField::new(BoardSize::DEFAULT);
        // Vertical I at the right wall: turning it horizontal would overflow.
        let vertical = Piece::new(PieceKind::I, PiecePosition::new(9, 0)).rotated();
        field.set_falling_piece(vertical).unwrap();
        assert!(field.try_rotate().is_err());
        assert_eq!(field.falling_piece(), Some(vertical));
    }

    #[test]
    fn test_step_down_falls_then_locks() {
        let mut field = GameField::with_seed(BoardSize::new(4, 4), PieceSeed::from(5));
        field.spawn_piece(PieceKind::O).unwrap();
        assert_eq!(field.step_down(), DropOutcome::Fell);
        assert_eq!(field.step_down(), DropOutcome::Fell);
        assert_eq!(
            field.step_down(),
            DropOutcome::Locked { cleared_lines: 0 }
        );
        assert_eq!(field.board().to_string(), "....\n....\n.##.\n.##.\n");
        assert_eq!(field.stats().completed_pieces(), 1);
        assert!(field.falling_piece().is_some());
    }

    #[test]
    fn test_completing_bottom_row_scores_ten() {
        let board = Board::from_ascii(
            "\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ..........\n\
            ######....\n",
        );
        let mut field = field_with_board(board);
        field
            .set_falling_piece(Piece::new(PieceKind::I, PiecePosition::new(6, 10)))
            .unwrap();

        assert_eq!(field.step_down(), DropOutcome::Fell);
        let outcome = field.step_down();
        assert_eq!(outcome, DropOutcome::Locked { cleared_lines: 1 });
        assert_eq!(field.stats().score(), 10);
        assert_eq!(field.board().rows().count(), 12);
        assert_eq!(field.occupied_cells().count(), 0);
    }

    #[test]
    fn test_clear_keeps_partial_rows() {
        let board = Board::from_ascii(
            "\
            ....\n\
            ....\n\
            #...\n\
            ##..\n",
        );
        let mut field = field_with_board(board);
        field
            .set_falling_piece(Piece::new(PieceKind::O, PiecePosition::new(2, 2)))
            .unwrap();
        assert_eq!(
            field.step_down(),
            DropOutcome::Locked { cleared_lines: 1 }
        );
        assert_eq!(field.board().to_string(), "....\n....\n....\n#.##\n");
        assert_eq!(field.stats().score(), 10);
    }

    #[test]
    fn test_spawn_collision_tops_out() {
        let board = Board::from_ascii(
            "\
            ....##....\n\
            ..........\n\
            ..........\n\
            ..........\n",
        );
        let mut field = field_with_board(board);
        assert_eq!(field.spawn_piece(PieceKind::O), Err(PieceCollisionError));
        assert_eq!(field.falling_piece(), None);
    }

    #[test]
    fn test_lock_then_topped_out() {
        let board = Board::from_ascii(
            "\
            ..........\n\
            ..........\n\
            #########.\n\
            #########.\n",
        );
        let mut field = field_with_board(board);
        // The locked O covers a cell of every spawn footprint.
        field
            .set_falling_piece(Piece::new(PieceKind::O, PiecePosition::new(4, 0)))
            .unwrap();
        assert_eq!(
            field.step_down(),
            DropOutcome::ToppedOut { cleared_lines: 0 }
        );
        assert_eq!(field.falling_piece(), None);
        for kind in PieceKind::ALL {
            assert_eq!(field.spawn_piece(kind), Err(PieceCollisionError), "{kind:?}");
        }
    }

    #[test]
    fn test_falling_cells() {
        let mut field = GameField::new(BoardSize::DEFAULT);
        assert_eq!(field.falling_cells().count(), 0);
        field.spawn_piece(PieceKind::T).unwrap();
        assert_eq!(
            field.falling_cells().collect::<Vec<_>>(),
            vec![(4, 0), (3, 1), (4, 1), (5, 1)]
        );
    }
}
