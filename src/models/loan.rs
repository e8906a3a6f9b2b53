//! Loan model and the display rows the listing queries return

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Loan record from database
///
/// A loan is Active while `return_date` is NULL and Closed once it is set;
/// closed records are immutable and kept as the audit trail. Book and member
/// are referenced by id only; display fields are resolved at read time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Active loan joined with member and book display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveLoanRow {
    pub id: i64,
    pub member_no: String,
    pub member_name: String,
    pub class_name: Option<String>,
    pub branch: Option<String>,
    pub title: String,
    pub barcode: String,
    pub shelf: Option<String>,
    pub cabinet: Option<String>,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Recently closed loan for the history listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClosedLoanRow {
    pub id: i64,
    pub member_no: String,
    pub member_name: String,
    pub class_name: Option<String>,
    pub branch: Option<String>,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// One line of a member's full borrowing history; active rows have no
/// return date yet
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberHistoryRow {
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}
