/// Points awarded for every cleared line.
pub const SCORE_PER_LINE: usize = 10;

/// Score and line counters of a single game.
///
/// # Scoring
///
/// Every cleared line is worth [`SCORE_PER_LINE`] points, regardless of how
/// many lines a single lock clears. There are no combo or level bonuses.
///
/// # Example
///
/// ```
/// use wristris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 20);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Records a locked piece that cleared `cleared_lines` lines.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.score += cleared_lines * SCORE_PER_LINE;
    }
}
