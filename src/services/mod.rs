//! Business logic services

pub mod backup;
pub mod loans;
pub mod overdue;
pub mod policy;
pub mod stats;

use std::path::PathBuf;

use crate::{config::BackupConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub loans: loans::LoansService,
    pub policy: policy::PolicyService,
    pub stats: stats::StatsService,
    pub backup: backup::BackupService,
}

impl Services {
    /// Create all services with the given repository.
    ///
    /// `database_path` is the SQLite file the backup service snapshots;
    /// `None` (in-memory database) disables backups.
    pub fn new(
        repository: Repository,
        backup_config: BackupConfig,
        database_path: Option<PathBuf>,
    ) -> Self {
        Self {
            loans: loans::LoansService::new(repository.clone()),
            policy: policy::PolicyService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            backup: backup::BackupService::new(database_path, backup_config),
        }
    }
}
