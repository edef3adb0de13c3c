use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use self::{high_score::HighScoreArg, play::PlayArg};
use crate::logging;

mod high_score;
mod play;

pub(crate) const DEFAULT_HIGH_SCORE_FILE: &str = "./data/high_score.json";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write log events to this file
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Most verbose level written to the log file
    #[clap(long, global = true, default_value_t = Level::INFO)]
    log_level: Level,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Show or clear the stored high score
    HighScore(#[clap(flatten)] HighScoreArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        logging::init(path, args.log_level)?;
    }
    match args.mode.unwrap_or_else(|| Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::HighScore(arg) => high_score::run(&arg)?,
    }
    Ok(())
}
