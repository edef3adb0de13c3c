use std::time::Duration;

use crate::BoardSize;

/// What happens after a game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Start a new game once the delay has elapsed.
    Auto(Duration),
    /// Wait for an explicit restart.
    Manual,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self::Auto(GameConfig::DEFAULT_RESTART_DELAY)
    }
}

/// Settings for a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub size: BoardSize,
    /// Interval of the automatic drop timer.
    pub drop_interval: Duration,
    pub restart: RestartPolicy,
    /// Number of on-screen blocks the renderer can position.
    pub sprite_capacity: usize,
    /// Edge length of one cell, in pixels.
    pub block_size: u32,
}

impl GameConfig {
    pub const DEFAULT_DROP_INTERVAL_MS: u64 = 1000;
    pub const DEFAULT_RESTART_DELAY_MS: u64 = 2000;
    pub const DEFAULT_DROP_INTERVAL: Duration =
        Duration::from_millis(Self::DEFAULT_DROP_INTERVAL_MS);
    pub const DEFAULT_RESTART_DELAY: Duration =
        Duration::from_millis(Self::DEFAULT_RESTART_DELAY_MS);
    pub const DEFAULT_SPRITE_CAPACITY: usize = 120;
    pub const DEFAULT_BLOCK_SIZE: u32 = 18;

    pub const MIN_COLS: u8 = 4;
    pub const MIN_ROWS: u8 = 4;
    pub const MAX_ROWS: u8 = 64;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let BoardSize { cols, rows } = self.size;
        if !(Self::MIN_COLS..=BoardSize::MAX_COLS).contains(&cols) {
            return Err(ConfigError::Columns { cols });
        }
        if !(Self::MIN_ROWS..=Self::MAX_ROWS).contains(&rows) {
            return Err(ConfigError::Rows { rows });
        }
        if self.drop_interval.is_zero() {
            return Err(ConfigError::DropInterval);
        }
        if self.restart == RestartPolicy::Auto(Duration::ZERO) {
            return Err(ConfigError::RestartDelay);
        }
        if self.sprite_capacity == 0 {
            return Err(ConfigError::SpriteCapacity);
        }
        if self.block_size == 0 {
            return Err(ConfigError::BlockSize);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: BoardSize::DEFAULT,
            drop_interval: Self::DEFAULT_DROP_INTERVAL,
            restart: RestartPolicy::default(),
            sprite_capacity: Self::DEFAULT_SPRITE_CAPACITY,
            block_size: Self::DEFAULT_BLOCK_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board width must be {}..={} columns, got {cols}",
        GameConfig::MIN_COLS,
        BoardSize::MAX_COLS
    )]
    Columns { cols: u8 },
    #[display(
        "board height must be {}..={} rows, got {rows}",
        GameConfig::MIN_ROWS,
        GameConfig::MAX_ROWS
    )]
    Rows { rows: u8 },
    #[display("drop interval must be positive")]
    DropInterval,
    #[display("restart delay must be positive")]
    RestartDelay,
    #[display("sprite capacity must be positive")]
    SpriteCapacity,
    #[display("block size must be positive")]
    BlockSize,
}
