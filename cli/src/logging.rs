use std::path::{Path, PathBuf};

use anyhow::Result;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Platform data-local dir, falling back to the temp dir when the
/// platform gives us nothing.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tickdo").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("tickdo-logs"))
}

/// File-based logging; the TUI owns the terminal, so nothing may go
/// to stdout/stderr. Level comes from RUST_LOG, default info. The
/// returned handle must stay alive for the process lifetime.
pub fn init(dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(dir)?;
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(dir).basename("tickdo"))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()?;
    Ok(handle)
}
