//! Settings repository: the durable key/value policy store

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{error::AppResult, models::Setting};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Sqlite>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get a setting value by key
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Upsert a setting; the new value is visible to all subsequent reads
    pub async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List all settings
    pub async fn list(&self) -> AppResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(settings)
    }
}

/// Read an integer setting on an open connection, substituting `default`
/// when the row is missing or unparsable. Never fails on bad values.
///
/// The loan transaction uses this so policy reads happen inside the same
/// transaction as the decision they govern.
pub(crate) async fn read_int_on(
    conn: &mut SqliteConnection,
    key: &str,
    default: i64,
) -> AppResult<i64> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default))
}
