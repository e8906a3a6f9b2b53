//! Member (borrower) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Member model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i64,
    pub member_no: String,
    pub name: String,
    pub surname: String,
    pub class_name: Option<String>,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub register_date: Option<NaiveDate>,
}

impl Member {
    /// Display name used by loan listings
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Payload for enrollment inserts and profile updates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMember {
    pub member_no: String,
    pub name: String,
    pub surname: String,
    pub class_name: Option<String>,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub register_date: Option<NaiveDate>,
}

impl NewMember {
    pub fn new(
        member_no: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            member_no: member_no.into(),
            name: name.into(),
            surname: surname.into(),
            ..Default::default()
        }
    }
}
