use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{HistoryError, HistoryRow, HistorySink};
use crate::types::RunResult;

/// History kept as a CSV file with a fixed header.
///
/// Rows are appended through an `O_APPEND` handle with a single `write_all`, while an
/// in-process mutex serialises writers, so concurrent passes never interleave partial rows.
/// A new file appears with its header and first row already in place, so a second process
/// writing to the same path never sees it empty.
pub struct CsvHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io { path: self.path.clone(), source }
    }

    /// Every row in file order. A missing file is an empty history.
    pub fn read_all(&self) -> Result<Vec<HistoryRow>, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut lines = content.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
        match lines.next() {
            None => return Ok(Vec::new()),
            Some((_, header)) if header.trim() == HistoryRow::header() => {}
            Some((_, header)) => return Err(HistoryError::UnexpectedHeader(header.to_string())),
        }

        // a header repeated by an older writer carries no row
        lines
            .filter(|(_, line)| line.trim() != HistoryRow::header())
            .map(|(idx, line)| HistoryRow::parse(idx + 1, line))
            .collect()
    }

    /// Publishes a new file holding the header and `line`. `Ok(false)` when the file exists already.
    fn create_with(&self, dir: &Path, line: &str) -> Result<bool, HistoryError> {
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        let content = format!("{}\n{line}", HistoryRow::header());
        staged.write_all(content.as_bytes()).map_err(|e| self.io_error(e))?;
        staged.as_file().sync_data().map_err(|e| self.io_error(e))?;

        match staged.persist_noclobber(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(self.io_error(e.error)),
        }
    }
}

impl HistorySink for CsvHistory {
    fn append(&self, result: &RunResult) -> Result<(), HistoryError> {
        let row = HistoryRow::from(result);
        let line = row.to_line();
        let _guard = self.write_lock.lock().map_err(|e| HistoryError::LockPoisoned(e.to_string()))?;

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        if !self.path.exists() && self.create_with(&dir, &line)? {
            info!(path = %self.path.display(), "Created history file");
        } else {
            let mut file = OpenOptions::new().append(true).open(&self.path).map_err(|e| self.io_error(e))?;
            // files created here are never empty, an empty one was made outside the agent
            let content = match file.metadata().map_err(|e| self.io_error(e))?.len() {
                0 => format!("{}\n{line}", HistoryRow::header()),
                _ => line,
            };
            file.write_all(content.as_bytes()).map_err(|e| self.io_error(e))?;
            file.sync_data().map_err(|e| self.io_error(e))?;
        }

        debug!(status = %row.status, path = %self.path.display(), "History row appended");
        Ok(())
    }
}
