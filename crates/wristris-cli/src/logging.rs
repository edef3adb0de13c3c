use std::{fs::File, path::Path, sync::Mutex};

use anyhow::Context as _;
use tracing::Level;

/// Sends log events to `path`.
///
/// The terminal belongs to the TUI, so events are only ever written to a file.
pub(crate) fn init(path: &Path, level: Level) -> anyhow::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install the log subscriber")?;
    Ok(())
}
