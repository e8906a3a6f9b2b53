//! Policy service: typed access to the loan limit and loan period settings
//!
//! Values are read from the settings table on every call, never cached, so a
//! change made from the administrative surface governs all subsequent
//! decisions without touching existing loans.

use crate::{
    error::AppResult,
    models::setting::{
        DEFAULT_LOAN_DAYS, DEFAULT_LOAN_DAYS_KEY, DEFAULT_LOAN_LIMIT, LOAN_LIMIT_KEY,
    },
    models::Setting,
    repository::Repository,
};

#[derive(Clone)]
pub struct PolicyService {
    repository: Repository,
}

impl PolicyService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Raw setting value by key
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.repository.settings.get(key).await
    }

    /// Upsert a setting value
    pub async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.repository.settings.set(key, value).await
    }

    /// List all settings for the administrative surface
    pub async fn list(&self) -> AppResult<Vec<Setting>> {
        self.repository.settings.list().await
    }

    /// Maximum concurrent loans per member; substitutes the default on a
    /// missing or unparsable value instead of failing
    pub async fn loan_limit(&self) -> AppResult<i64> {
        self.int_setting(LOAN_LIMIT_KEY, DEFAULT_LOAN_LIMIT).await
    }

    /// Default loan period in calendar days; same fallback behavior
    pub async fn default_loan_days(&self) -> AppResult<i64> {
        self.int_setting(DEFAULT_LOAN_DAYS_KEY, DEFAULT_LOAN_DAYS)
            .await
    }

    pub async fn set_loan_limit(&self, limit: i64) -> AppResult<()> {
        self.set(LOAN_LIMIT_KEY, &limit.to_string()).await
    }

    pub async fn set_default_loan_days(&self, days: i64) -> AppResult<()> {
        self.set(DEFAULT_LOAN_DAYS_KEY, &days.to_string()).await
    }

    async fn int_setting(&self, key: &str, default: i64) -> AppResult<i64> {
        let value = self.repository.settings.get(key).await?;
        Ok(value
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default))
    }
}
