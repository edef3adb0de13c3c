use std::time::Duration;

use tracing::{info, warn};

use super::{
    ConfigError, DropOutcome, FrameTimer, GameConfig, GameField, GameStats, HighScore,
    HighScoreStore, PieceSeed, RenderSink, RestartPolicy, Scoreboard, SpritePool,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// Created but not started yet.
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Player input applied to the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    /// Moves the piece one row down, exactly like an expired drop timer.
    SoftDrop,
}

/// A game session: the field, its lifecycle and the timers driving it.
///
/// The session is advanced by [`increment_frame`](Self::increment_frame) at a
/// fixed `fps` and by [`handle_command`](Self::handle_command) for input.
/// Drop and restart intervals are converted into frame countdowns.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    state: SessionState,
    fps: u64,
    total_frames: u64,
    drop_timer: Option<FrameTimer>,
    restart_timer: Option<FrameTimer>,
    high_score: Option<HighScore>,
    new_high_score: bool,
    store: Box<dyn HighScoreStore>,
    today: fn() -> String,
}

fn local_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

impl GameSession {
    /// Creates an idle session and loads the stored high score.
    ///
    /// A store that fails to load is logged and treated as empty.
    pub fn new(
        config: GameConfig,
        fps: u64,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = GameField::new(config.size);
        Ok(Self::with_field(config, fps, field, store))
    }

    /// Like [`new`](Self::new), with a reproducible piece sequence.
    pub fn with_seed(
        config: GameConfig,
        fps: u64,
        seed: PieceSeed,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = GameField::with_seed(config.size, seed);
        Ok(Self::with_field(config, fps, field, store))
    }

    fn with_field(
        config: GameConfig,
        fps: u64,
        field: GameField,
        mut store: Box<dyn HighScoreStore>,
    ) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load high score");
            None
        });
        Self {
            config,
            field,
            state: SessionState::Idle,
            fps: fps.max(1),
            total_frames: 0,
            drop_timer: None,
            restart_timer: None,
            high_score,
            new_high_score: false,
            store,
            today: local_date,
        }
    }

    /// Replaces the source of the date stamped on new high scores.
    #[must_use]
    pub fn with_date_source(mut self, today: fn() -> String) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        self.field.stats()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn high_score(&self) -> Option<&HighScore> {
        self.high_score.as_ref()
    }

    /// The last game beat the previous high score.
    #[must_use]
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    #[must_use]
    pub fn is_drop_timer_active(&self) -> bool {
        self.drop_timer.is_some()
    }

    #[must_use]
    pub fn is_restart_pending(&self) -> bool {
        self.restart_timer.is_some()
    }

    /// Time spent running in the current game.
    #[must_use]
    pub fn duration(&self) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let secs = self.total_frames / self.fps;
        let nanos = (self.total_frames % self.fps) * NANOS_PER_SEC / self.fps;
        Duration::new(secs, u32::try_from(nanos).unwrap_or(0))
    }

    /// Starts a fresh game, from any state.
    ///
    /// Clears the board and score, cancels a pending restart and arms the
    /// drop timer. When even the first piece cannot spawn the game is over
    /// right away.
    pub fn start(&mut self) {
        self.restart_timer = None;
        self.total_frames = 0;
        self.new_high_score = false;
        self.state = SessionState::Running;
        self.drop_timer = Some(FrameTimer::from_interval(
            self.config.drop_interval,
            self.fps,
        ));
        info!(seed = %self.field.seed(), "game started");
        if self.field.reset().is_err() {
            self.game_over();
        }
    }

    /// Starts a new game if none is in progress.
    ///
    /// Returns `false` while a game is running or paused.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.state, SessionState::Idle | SessionState::GameOver) {
            return false;
        }
        self.start();
        true
    }

    /// Toggles between running and paused; other states are left alone.
    ///
    /// Pausing keeps the drop timer armed, it just stops counting.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Running => SessionState::Paused,
            SessionState::Paused => SessionState::Running,
            state => state,
        };
    }

    /// Applies a command to the falling piece.
    ///
    /// Commands are ignored unless the game is running. Returns whether the
    /// field changed.
    pub fn handle_command(&mut self, command: Command) -> bool {
        if !self.state.is_running() {
            return false;
        }
        match command {
            Command::MoveLeft => self.field.try_move(-1).is_ok(),
            Command::MoveRight => self.field.try_move(1).is_ok(),
            Command::Rotate => self.field.try_rotate().is_ok(),
            Command::SoftDrop => !self.drop_piece().is_no_piece(),
        }
    }

    /// Advances the session by one frame.
    pub fn increment_frame(&mut self) {
        match self.state {
            SessionState::Running => {
                self.total_frames += 1;
                if self.drop_timer.as_mut().is_some_and(FrameTimer::tick) {
                    self.drop_piece();
                }
            }
            SessionState::GameOver => {
                if self.restart_timer.as_mut().is_some_and(FrameTimer::tick) {
                    self.start();
                }
            }
            SessionState::Idle | SessionState::Paused => {}
        }
    }

    fn drop_piece(&mut self) -> DropOutcome {
        let outcome = self.field.step_down();
        if outcome.is_topped_out() {
            self.game_over();
        }
        outcome
    }

    fn game_over(&mut self) {
        self.state = SessionState::GameOver;
        self.drop_timer = None;

        let score = self.stats().score();
        info!(
            score,
            cleared_lines = self.stats().total_cleared_lines(),
            duration = ?self.duration(),
            "game over"
        );

        let best = self.high_score.as_ref().map_or(0, |record| record.score);
        if score > best {
            let record = HighScore {
                score,
                date: (self.today)(),
            };
            info!(score, date = %record.date, "new high score");
            if let Err(e) = self.store.save(&record) {
                warn!(error = %e, "failed to save high score");
            }
            self.high_score = Some(record);
            self.new_high_score = true;
        }

        if let RestartPolicy::Auto(delay) = self.config.restart {
            self.restart_timer = Some(FrameTimer::from_interval(delay, self.fps));
        }
    }

    #[must_use]
    pub fn sprite_pool(&self) -> SpritePool {
        SpritePool::new(self.config.sprite_capacity, self.config.block_size)
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            state: self.state,
            score: self.stats().score(),
            cleared_lines: self.stats().total_cleared_lines(),
            high_score: self.high_score.clone(),
            is_new_high_score: self.new_high_score,
        }
    }

    /// Pushes the current frame to a renderer.
    pub fn present(&self, sink: &mut dyn RenderSink) {
        sink.draw_sprites(&self.sprite_pool().layout(&self.field));
        sink.draw_scoreboard(&self.scoreboard());
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io, rc::Rc};

    use crate::{Board, BoardSize, MemoryStore, Piece, PieceKind, PiecePosition, StoreError};

    use super::*;

    /// Store whose contents stay observable after the session takes it.
    #[derive(Debug, Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl HighScoreStore for SharedStore {
        fn load(&mut self) -> Result<Option<HighScore>, StoreError> {
            self.0.borrow_mut().load()
        }

        fn save(&mut self, record: &HighScore) -> Result<(), StoreError> {
            self.0.borrow_mut().save(record)
        }
    }

    #[derive(Debug)]
    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&mut self) -> Result<Option<HighScore>, StoreError> {
            Err(io::Error::other("disk gone").into())
        }

        fn save(&mut self, _record: &HighScore) -> Result<(), StoreError> {
            Err(io::Error::other("disk gone").into())
        }
    }

    fn fixed_date() -> String {
        "2026-10-15".to_owned()
    }

    fn small_config(restart: RestartPolicy) -> GameConfig {
        GameConfig {
            size: BoardSize::new(10, 4),
            drop_interval: Duration::from_millis(100),
            restart,
            ..GameConfig::default()
        }
    }

    fn session(config: GameConfig, store: Box<dyn HighScoreStore>) -> GameSession {
        GameSession::with_seed(config, 10, PieceSeed::from(7), store)
            .unwrap()
            .with_date_source(fixed_date)
    }

    /// Blocks every spawn footprint; whatever piece falls next cannot move.
    fn blocked_board() -> Board {
        Board::from_ascii(
            "\
            #########.\n\
            #########.\n\
            ..........\n\
            ..........\n",
        )
    }

    /// Clears one line with an I piece and leaves the board empty.
    fn score_one_line(session: &mut GameSession) {
        session.field.replace_board(Board::from_ascii(
            "\
            ..........\n\
            ..........\n\
            ..........\n\
            ######....\n",
        ));
        session
            .field
            .set_falling_piece(Piece::new(PieceKind::I, PiecePosition::new(6, 3)))
            .unwrap();
        assert!(session.handle_command(Command::SoftDrop));
        assert_eq!(session.stats().score(), 10);
        assert!(session.state().is_running());
    }

    fn top_out(session: &mut GameSession) {
        session.field.replace_board(blocked_board());
        session.handle_command(Command::SoftDrop);
    }

    #[test]
    fn test_lifecycle() {
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(MemoryStore::new()));
        assert!(session.state().is_idle());
        assert!(!session.is_drop_timer_active());
        assert!(!session.handle_command(Command::MoveLeft));

        session.start();
        assert!(session.state().is_running());
        assert!(session.is_drop_timer_active());
        assert!(session.field().falling_piece().is_some());

        session.toggle_pause();
        assert!(session.state().is_paused());
        session.toggle_pause();
        assert!(session.state().is_running());

        top_out(&mut session);
        assert!(session.state().is_game_over());
        session.toggle_pause();
        assert!(session.state().is_game_over());
    }

    #[test]
    fn test_drop_timer_moves_piece() {
        // 100 ms at 10 fps is one drop per frame.
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(MemoryStore::new()));
        session.start();
        let y = session.field().falling_piece().unwrap().position().y();
        session.increment_frame();
        assert_eq!(
            session.field().falling_piece().unwrap().position().y(),
            y + 1
        );
        assert_eq!(session.duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_paused_ignores_commands_and_frames() {
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(MemoryStore::new()));
        session.start();
        let piece = session.field().falling_piece();
        session.toggle_pause();

        assert!(!session.handle_command(Command::MoveRight));
        assert!(!session.handle_command(Command::SoftDrop));
        for _ in 0..10 {
            session.increment_frame();
        }
        assert_eq!(session.field().falling_piece(), piece);
        assert!(session.is_drop_timer_active());
        assert_eq!(session.duration(), Duration::ZERO);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(MemoryStore::new()));
        session.start();
        top_out(&mut session);

        assert!(session.state().is_game_over());
        assert!(!session.is_drop_timer_active());
        assert_eq!(session.field().falling_piece(), None);
        assert!(!session.handle_command(Command::Rotate));
        // A zero score never counts as a high score.
        assert_eq!(session.high_score(), None);
        assert!(!session.is_new_high_score());
    }

    #[test]
    fn test_manual_restart() {
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(MemoryStore::new()));
        assert!(session.restart());
        assert!(!session.restart());
        top_out(&mut session);

        for _ in 0..100 {
            session.increment_frame();
        }
        assert!(session.state().is_game_over());
        assert!(!session.is_restart_pending());

        assert!(session.restart());
        assert!(session.state().is_running());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.field().occupied_cells().count(), 0);
    }

    #[test]
    fn test_auto_restart_after_delay() {
        let config = small_config(RestartPolicy::Auto(Duration::from_millis(300)));
        let mut session = session(config, Box::new(MemoryStore::new()));
        session.start();
        top_out(&mut session);
        assert!(session.is_restart_pending());

        session.increment_frame();
        session.increment_frame();
        assert!(session.state().is_game_over());
        session.increment_frame();
        assert!(session.state().is_running());
        assert!(!session.is_restart_pending());
        assert!(session.is_drop_timer_active());
    }

    #[test]
    fn test_explicit_restart_cancels_pending_auto_restart() {
        let config = small_config(RestartPolicy::Auto(Duration::from_millis(300)));
        let mut session = session(config, Box::new(MemoryStore::new()));
        session.start();
        top_out(&mut session);
        assert!(session.restart());
        assert!(!session.is_restart_pending());
    }

    #[test]
    fn test_new_high_score_is_saved() {
        let store = SharedStore::default();
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(store.clone()));
        session.start();
        score_one_line(&mut session);
        top_out(&mut session);

        let expected = HighScore {
            score: 10,
            date: fixed_date(),
        };
        assert!(session.state().is_game_over());
        assert!(session.is_new_high_score());
        assert_eq!(session.high_score(), Some(&expected));
        assert_eq!(store.0.borrow().record(), Some(&expected));
        assert_eq!(store.0.borrow().saves(), 1);

        let scoreboard = session.scoreboard();
        assert_eq!(scoreboard.score, 10);
        assert_eq!(scoreboard.cleared_lines, 1);
        assert!(scoreboard.is_new_high_score);
    }

    #[test]
    fn test_lower_score_keeps_record() {
        let previous = HighScore {
            score: 50,
            date: "2026-01-01".to_owned(),
        };
        let store = SharedStore(Rc::new(RefCell::new(MemoryStore::with_record(
            previous.clone(),
        ))));
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(store.clone()));
        assert_eq!(session.high_score(), Some(&previous));

        session.start();
        score_one_line(&mut session);
        top_out(&mut session);

        assert!(!session.is_new_high_score());
        assert_eq!(session.high_score(), Some(&previous));
        assert_eq!(store.0.borrow().saves(), 0);
    }

    #[test]
    fn test_store_failures_are_ignored() {
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(BrokenStore));
        assert_eq!(session.high_score(), None);

        session.start();
        score_one_line(&mut session);
        top_out(&mut session);

        assert!(session.state().is_game_over());
        assert_eq!(session.high_score().map(|record| record.score), Some(10));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            sprite_capacity: 0,
            ..GameConfig::default()
        };
        let result = GameSession::new(config, 60, Box::new(MemoryStore::new()));
        assert_eq!(result.err(), Some(ConfigError::SpriteCapacity));
    }

    #[derive(Debug, Default)]
    struct RecordingSink {
        sprites: usize,
        hidden: usize,
        scoreboard: Option<Scoreboard>,
    }

    impl RenderSink for RecordingSink {
        fn draw_sprites(&mut self, frame: &crate::SpriteFrame) {
            self.sprites = frame.visible();
            self.hidden = frame.hidden();
        }

        fn draw_scoreboard(&mut self, scoreboard: &Scoreboard) {
            self.scoreboard = Some(scoreboard.clone());
        }
    }

    #[test]
    fn test_present() {
        let mut session = session(small_config(RestartPolicy::Manual), Box::new(MemoryStore::new()));
        session.start();
        let mut sink = RecordingSink::default();
        session.present(&mut sink);

        assert_eq!(sink.sprites, 4);
        assert_eq!(sink.hidden, GameConfig::DEFAULT_SPRITE_CAPACITY - 4);
        assert_eq!(
            sink.scoreboard.map(|scoreboard| scoreboard.state),
            Some(SessionState::Running)
        );
    }
}
