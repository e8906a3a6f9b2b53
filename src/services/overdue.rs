//! Overdue evaluation: pure date arithmetic over active loans
//!
//! No hidden state; the same inputs always produce the same report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ActiveLoanRow;

/// An active loan past its due date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdueLoan {
    pub loan_id: i64,
    pub member_no: String,
    pub member_name: String,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
}

/// Strict date-only comparison: a loan due today is not overdue
pub fn is_overdue(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date < today
}

/// Whole days past due; non-negative for overdue loans by construction
pub fn days_overdue(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days()
}

/// Filter active loans down to the overdue ones, preserving input order
/// (the active listing is already sorted by due date ascending)
pub fn evaluate(active: &[ActiveLoanRow], today: NaiveDate) -> Vec<OverdueLoan> {
    active
        .iter()
        .filter(|row| is_overdue(row.due_date, today))
        .map(|row| OverdueLoan {
            loan_id: row.id,
            member_no: row.member_no.clone(),
            member_name: row.member_name.clone(),
            title: row.title.clone(),
            loan_date: row.loan_date,
            due_date: row.due_date,
            days_overdue: days_overdue(row.due_date, today),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn strict_comparison() {
        // Due 2024-01-10 against today 2024-01-15: five days late.
        assert!(is_overdue(date(2024, 1, 10), date(2024, 1, 15)));
        assert_eq!(days_overdue(date(2024, 1, 10), date(2024, 1, 15)), 5);

        // Due today is not overdue.
        assert!(!is_overdue(date(2024, 1, 10), date(2024, 1, 10)));
        assert!(!is_overdue(date(2024, 1, 10), date(2024, 1, 5)));
    }

    #[test]
    fn evaluate_filters_and_is_stable() {
        let rows = vec![
            ActiveLoanRow {
                id: 1,
                member_no: "101".into(),
                member_name: "Ayşe Yılmaz".into(),
                class_name: None,
                branch: None,
                title: "Çalıkuşu".into(),
                barcode: "B1".into(),
                shelf: None,
                cabinet: None,
                loan_date: date(2024, 1, 1),
                due_date: date(2024, 1, 10),
            },
            ActiveLoanRow {
                id: 2,
                member_no: "102".into(),
                member_name: "Ali Demir".into(),
                class_name: None,
                branch: None,
                title: "Serenad".into(),
                barcode: "B2".into(),
                shelf: None,
                cabinet: None,
                loan_date: date(2024, 1, 5),
                due_date: date(2024, 1, 20),
            },
        ];

        let today = date(2024, 1, 15);
        let report = evaluate(&rows, today);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].loan_id, 1);
        assert_eq!(report[0].days_overdue, 5);

        // Same inputs, same output.
        let again = evaluate(&rows, today);
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].days_overdue, 5);
    }
}
