//! Logging setup for the terminal front end
//!
//! Logs go to a file so they never interleave with the interactive output.
//! The filter comes from `RUST_LOG` and defaults to `info`.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default log location in the system temp dir
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("control-session.log")
}

/// Install the global subscriber writing to `log_file`
pub fn init_global(log_file: &Path) -> io::Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (e.g. a rebuilt session)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}
