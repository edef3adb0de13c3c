use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use tracing::info;
use wristris_engine::{
    BoardSize, GameConfig, GameSession, JsonFileStore, PieceSeed, RestartPolicy,
};
use wristris_runtime::Runtime;

use self::app::{FPS, PlayApp};
use super::DEFAULT_HIGH_SCORE_FILE;

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Board width in cells
    #[clap(long, default_value_t = BoardSize::DEFAULT.cols)]
    cols: u8,
    /// Board height in cells
    #[clap(long, default_value_t = BoardSize::DEFAULT.rows)]
    rows: u8,
    /// Milliseconds between automatic drops
    #[clap(long, default_value_t = GameConfig::DEFAULT_DROP_INTERVAL_MS)]
    drop_interval_ms: u64,
    /// Milliseconds before a new game starts after game over
    #[clap(long, default_value_t = GameConfig::DEFAULT_RESTART_DELAY_MS)]
    restart_delay_ms: u64,
    /// Wait for Enter instead of restarting automatically
    #[clap(long)]
    manual_restart: bool,
    /// Number of blocks the renderer can show at once
    #[clap(long, default_value_t = GameConfig::DEFAULT_SPRITE_CAPACITY)]
    sprite_capacity: usize,
    /// Edge length of one block in pixels
    #[clap(long, default_value_t = GameConfig::DEFAULT_BLOCK_SIZE)]
    block_size: u32,
    /// File holding the high score record
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// Seed for a reproducible piece sequence
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            cols: BoardSize::DEFAULT.cols,
            rows: BoardSize::DEFAULT.rows,
            drop_interval_ms: GameConfig::DEFAULT_DROP_INTERVAL_MS,
            restart_delay_ms: GameConfig::DEFAULT_RESTART_DELAY_MS,
            manual_restart: false,
            sprite_capacity: GameConfig::DEFAULT_SPRITE_CAPACITY,
            block_size: GameConfig::DEFAULT_BLOCK_SIZE,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            seed: None,
        }
    }
}

impl PlayArg {
    fn config(&self) -> GameConfig {
        let restart = if self.manual_restart {
            RestartPolicy::Manual
        } else {
            RestartPolicy::Auto(Duration::from_millis(self.restart_delay_ms))
        };
        GameConfig {
            size: BoardSize::new(self.cols, self.rows),
            drop_interval: Duration::from_millis(self.drop_interval_ms),
            restart,
            sprite_capacity: self.sprite_capacity,
            block_size: self.block_size,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.config();
    let store = Box::new(JsonFileStore::new(&arg.high_score_file));
    let fps = u64::from(FPS);
    let session = match arg.seed {
        Some(seed) => GameSession::with_seed(config, fps, seed, store),
        None => GameSession::new(config, fps, store),
    }
    .context("invalid game settings")?;
    info!(
        seed = %session.field().seed(),
        high_score_file = %arg.high_score_file.display(),
        "starting play"
    );

    let mut app = PlayApp::new(session);
    Runtime::new()
        .run(&mut app)
        .context("terminal I/O failed")?;
    Ok(())
}
