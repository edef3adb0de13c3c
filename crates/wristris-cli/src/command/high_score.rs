use std::path::PathBuf;

use anyhow::Context as _;
use wristris_engine::{HighScoreStore as _, JsonFileStore};

use super::DEFAULT_HIGH_SCORE_FILE;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighScoreArg {
    /// File holding the high score record
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// Delete the stored record
    #[clap(long)]
    clear: bool,
}

pub(crate) fn run(arg: &HighScoreArg) -> anyhow::Result<()> {
    let HighScoreArg {
        high_score_file,
        clear,
    } = arg;

    let mut store = JsonFileStore::new(high_score_file);
    if *clear {
        store
            .clear()
            .with_context(|| format!("failed to remove {}", high_score_file.display()))?;
        return Ok(());
    }

    let record = store
        .load()
        .with_context(|| format!("failed to read {}", high_score_file.display()))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
