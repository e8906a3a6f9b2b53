//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Book model from database
///
/// `copies_available` counts lendable copies on the shelf; it moves only
/// through catalog edits and the inventory reserve/release operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub barcode: String,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i64>,
    pub pages: Option<i64>,
    pub category: Option<String>,
    pub asset_no: Option<String>,
    pub shelf: Option<String>,
    pub cabinet: Option<String>,
    pub copies_available: i64,
    pub note: Option<String>,
}

/// Payload for catalog inserts and updates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBook {
    pub barcode: String,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i64>,
    pub pages: Option<i64>,
    pub category: Option<String>,
    pub asset_no: Option<String>,
    pub shelf: Option<String>,
    pub cabinet: Option<String>,
    pub copies_available: i64,
    pub note: Option<String>,
}

impl NewBook {
    /// Minimal catalog entry with a single copy
    pub fn new(barcode: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            title: title.into(),
            copies_available: 1,
            ..Default::default()
        }
    }
}
