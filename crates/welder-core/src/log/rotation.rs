//! Daily rotating log file.
//!
//! The active file always lives at the configured path. When a rotation
//! period ends (or a rollover is forced) the active file is renamed to
//! `<file>.<YYYY-MM-DD>`, a fresh file is opened, and the oldest backups
//! beyond the retained count are deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::{Mutex, MutexGuard};
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;
use welder_types::{Result, WelderError};

use crate::time::{backup_suffix, next_rollover, rotation_interval};
use crate::util::ensure_file;

/// Number of rotated files kept next to the active log.
pub const BACKUP_COUNT: usize = 3;

/// A log file that rotates once a day and keeps a bounded number of backups.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: Option<File>,
    backup_count: usize,
    rollover_at: DateTime<Local>,
    backup_pattern: Regex,
}

impl RotatingFile {
    /// Open (creating if needed) the active log file.
    ///
    /// The first rollover is scheduled one period after the file was last
    /// modified. Backups beyond `backup_count` left over from earlier runs are
    /// deleted.
    pub fn open(path: impl AsRef<Path>, backup_count: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_file(&path)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| WelderError::Config(format!("Log path has no file name: {}", path.display())))?;
        let backup_pattern = Regex::new(&format!(
            r"^{}\.\d{{4}}-\d{{2}}-\d{{2}}(\.\w+)?$",
            regex::escape(&file_name)
        ))
        .map_err(|e| WelderError::Other(format!("Invalid backup pattern: {}", e)))?;

        let started = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());

        let mut rotating = Self {
            file: Some(open_append(&path)?),
            path,
            backup_count,
            rollover_at: started + rotation_interval(),
            backup_pattern,
        };
        rotating.delete_backups_beyond(backup_count)?;
        Ok(rotating)
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of backups retained after a rotation.
    pub fn backup_count(&self) -> usize {
        self.backup_count
    }

    /// Instant of the next scheduled rotation.
    pub fn rollover_at(&self) -> DateTime<Local> {
        self.rollover_at
    }

    /// Whether the current period has ended at `now`.
    pub fn should_rollover(&self, now: DateTime<Local>) -> bool {
        now >= self.rollover_at
    }

    /// Rotate immediately.
    ///
    /// The active file is reopened and the next rollover scheduled even when
    /// renaming or pruning fails, so a failed rotation never leaves the file
    /// closed.
    pub fn do_rollover(&mut self) -> Result<()> {
        let now = Local::now();
        self.file = None;

        let period_start = self.rollover_at - rotation_interval();
        let backup = self.backup_path(period_start);
        let rotated = self.rotate_to(&backup);

        self.rollover_at = next_rollover(now, now);
        self.file = Some(open_append(&self.path)?);
        rotated?;

        debug!("Rotated {} to {}", self.path.display(), backup.display());
        Ok(())
    }

    fn rotate_to(&mut self, backup: &Path) -> Result<()> {
        if backup.exists() {
            fs::remove_file(backup).map_err(|e| WelderError::filesystem(backup, e))?;
        }
        if self.path.exists() {
            fs::rename(&self.path, backup).map_err(|e| WelderError::filesystem(&self.path, e))?;
        }
        self.delete_backups_beyond(self.backup_count)?;
        Ok(())
    }

    /// Delete every retained backup, leaving only the active file.
    pub fn delete_all_backups(&mut self) -> Result<usize> {
        let retained = self.backup_count;
        self.backup_count = 0;
        let outcome = self.delete_backups_beyond(0);
        self.backup_count = retained;
        outcome
    }

    /// Backups next to the active file, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut backups = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                WelderError::filesystem(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_backup = self
                .backup_pattern
                .is_match(&entry.file_name().to_string_lossy());
            if is_backup {
                backups.push(entry.into_path());
            }
        }
        // Dated suffixes sort chronologically by name.
        backups.sort();
        Ok(backups)
    }

    fn backup_path(&self, period_start: DateTime<Local>) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(backup_suffix(period_start));
        PathBuf::from(name)
    }

    fn files_to_delete(&self, keep: usize) -> Result<Vec<PathBuf>> {
        let mut backups = self.backups()?;
        if backups.len() <= keep {
            return Ok(Vec::new());
        }
        backups.truncate(backups.len() - keep);
        Ok(backups)
    }

    fn delete_backups_beyond(&mut self, keep: usize) -> Result<usize> {
        let doomed = self.files_to_delete(keep)?;
        for path in &doomed {
            fs::remove_file(path).map_err(|e| WelderError::filesystem(path, e))?;
        }
        Ok(doomed.len())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rollover(Local::now()) {
            if let Err(err) = self.do_rollover() {
                warn!("Log rotation failed, writing to the active file: {}", err);
            }
        }
        if self.file.is_none() {
            self.file = Some(open_append(&self.path).map_err(io::Error::other)?);
        }
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "log file is closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WelderError::filesystem(path, e))
}

/// A [`RotatingFile`] shared between a sink's writer thread and the registry.
#[derive(Debug, Clone)]
pub struct SharedRotatingFile {
    inner: Arc<Mutex<RotatingFile>>,
}

impl SharedRotatingFile {
    /// Share a rotating file.
    pub fn new(file: RotatingFile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }

    /// Lock the file for rotation or inspection.
    pub fn lock(&self) -> MutexGuard<'_, RotatingFile> {
        self.inner.lock()
    }
}

impl Write for SharedRotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
