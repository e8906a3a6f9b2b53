//! Policy setting model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Named setting from the key/value settings table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Setting key for the maximum number of concurrent loans per member
pub const LOAN_LIMIT_KEY: &str = "loan_limit";
/// Setting key for the default loan period in calendar days
pub const DEFAULT_LOAN_DAYS_KEY: &str = "default_loan_days";

/// Fallback when `loan_limit` is missing or unparsable
pub const DEFAULT_LOAN_LIMIT: i64 = 3;
/// Fallback when `default_loan_days` is missing or unparsable
pub const DEFAULT_LOAN_DAYS: i64 = 15;
