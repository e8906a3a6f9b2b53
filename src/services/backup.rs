//! Backup retention: timestamped snapshots of the database file, pruned to
//! a bounded count
//!
//! Backups run at startup and on demand; a failed backup is reported but
//! never takes the engine down.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;

use crate::{config::BackupConfig, error::AppResult};

/// Timestamp format used in snapshot file names, second resolution
const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Clone)]
pub struct BackupService {
    database_path: Option<PathBuf>,
    directory: PathBuf,
    max_kept: usize,
}

impl BackupService {
    pub fn new(database_path: Option<PathBuf>, config: BackupConfig) -> Self {
        Self {
            database_path,
            directory: config.directory,
            max_kept: config.max_kept,
        }
    }

    /// Copy the database file to `<directory>/<timestamp>_<file name>`.
    ///
    /// A missing source file is an error (precondition); the snapshot is
    /// named after the moment of creation and never touched again.
    pub fn snapshot(&self) -> AppResult<PathBuf> {
        let source = self.database_path.as_deref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, "in-memory database has no file to back up")
        })?;
        if !source.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("database file {} not found", source.display()),
            )
            .into());
        }

        fs::create_dir_all(&self.directory)?;

        let timestamp = Local::now().format(SNAPSHOT_TIMESTAMP_FORMAT);
        let destination = self
            .directory
            .join(format!("{}_{}", timestamp, file_name_of(source)));
        fs::copy(source, &destination)?;

        tracing::info!(path = %destination.display(), "database snapshot written");
        Ok(destination)
    }

    /// Delete all but the `max_kept` newest snapshots; returns how many were
    /// removed.
    ///
    /// Snapshots are ordered by modified time ascending with the file name as
    /// secondary key, so repeated runs against the same files always pick the
    /// same victims even when timestamps collide.
    pub fn prune(&self, max_kept: usize) -> AppResult<usize> {
        let suffix = match self.database_path.as_deref() {
            Some(source) => format!("_{}", file_name_of(source)),
            None => return Ok(0),
        };

        let mut snapshots: Vec<(SystemTime, String, PathBuf)> = Vec::new();
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(&suffix) {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            snapshots.push((modified, name, entry.path()));
        }

        snapshots.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        if snapshots.len() <= max_kept {
            return Ok(0);
        }

        let excess = snapshots.len() - max_kept;
        let mut removed = 0;
        for (_, name, path) in snapshots.into_iter().take(excess) {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "old snapshot removed");
            removed += 1;
        }
        Ok(removed)
    }

    /// Startup convenience: snapshot and prune, logging failures instead of
    /// propagating them. A missing database file (first run) just skips the
    /// snapshot.
    pub fn run_auto_backup(&self) {
        match self.database_path.as_deref() {
            None => return,
            Some(source) if !source.exists() => {
                tracing::info!("database file not present yet, skipping backup");
                return;
            }
            Some(_) => {}
        }

        match self.snapshot() {
            Ok(path) => tracing::info!(path = %path.display(), "automatic backup completed"),
            Err(e) => {
                tracing::warn!(error = %e, "automatic backup failed");
                return;
            }
        }

        match self.prune(self.max_kept) {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "snapshot retention applied"),
            Err(e) => tracing::warn!(error = %e, "snapshot pruning failed"),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "kitaplik.db".to_string())
}
