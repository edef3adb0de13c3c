//! Game-state engine for a small-screen falling-block puzzle.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - the board grid, piece shapes and the collision detector
//! - [`engine`] - the playing field, the session lifecycle, timers, high-score
//!   persistence and the sprite-pool rendering capability
//!
//! # Example
//!
//! ```
//! use wristris_engine::{Command, GameConfig, GameSession, MemoryStore};
//!
//! let mut session = GameSession::new(GameConfig::default(), 60, Box::new(MemoryStore::new()))?;
//! session.start();
//! session.handle_command(Command::MoveLeft);
//! session.increment_frame();
//! assert!(session.state().is_running());
//! # Ok::<(), wristris_engine::ConfigError>(())
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or its bounds")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no active piece on the field")]
pub struct NoActivePiece;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum MoveError {
    #[display("piece colliding when moving")]
    Collision(PieceCollisionError),
    #[display("nothing to move")]
    NoPiece(NoActivePiece),
}
