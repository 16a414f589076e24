use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to `<cache dir>/folio/folio.log`. The terminal is
/// owned by the TUI, so nothing may be printed to it.
///
/// Filter comes from `FOLIO_LOG` (e.g. `FOLIO_LOG=folio_core=debug`).
pub fn init() -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?
        .join("folio");
    fs::create_dir_all(&dir)?;

    let path = dir.join("folio.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))?;

    Ok(path)
}
