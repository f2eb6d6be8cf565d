// Logging setup.
// Routes the `log` facade to a file so records never land on the terminal UI.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};

use crate::config::LOG_VAR;
use crate::error::Result;

const LOG_FILE_NAME: &str = "notehub.log";

/// Get the base cache directory (~/.cache/notehub on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "notehub").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the log file inside a directory.
pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

/// Open the log file for appending, creating the directory if needed.
pub fn open_log_file(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(dir))?;
    Ok(file)
}

/// Install the global logger writing to `dir`. Level comes from NOTEHUB_LOG.
/// Returns the log file path.
pub fn init(dir: &Path) -> Result<PathBuf> {
    let file = open_log_file(dir)?;

    // A second init in the same process keeps the first logger.
    let _ = Builder::from_env(Env::new().filter_or(LOG_VAR, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();

    Ok(log_path(dir))
}
