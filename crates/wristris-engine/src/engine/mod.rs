//! Game logic built on top of the core board and piece types.
//!
//! - [`GameField`] - board, falling piece, piece generator and score
//! - [`GameSession`] - lifecycle state machine with drop and restart timers
//! - [`GameStats`] - score and line counters
//! - [`GameConfig`] - board size, timing and renderer settings
//! - [`HighScoreStore`] - persistence capability for the best score
//! - [`RenderSink`] / [`SpritePool`] - rendering capability for a fixed pool
//!   of on-screen blocks
//!
//! # Game Flow
//!
//! 1. [`GameSession::start`] clears the field, spawns a piece and arms the
//!    drop timer
//! 2. Input commands move, rotate or drop the falling piece
//! 3. Every expired drop timer moves the piece one row down, locking it and
//!    clearing full rows when it cannot fall any more
//! 4. A spawn that collides ends the game and records a new high score

pub use self::{
    config::*, game_field::*, game_session::*, game_stats::*, high_score::*,
    piece_generator::*, render::*, timer::*,
};

mod config;
mod game_field;
mod game_session;
mod game_stats;
mod high_score;
mod piece_generator;
mod render;
mod timer;
