//! Statistics service: read-only aggregates for the reporting collaborator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::{
    error::AppResult,
    models::Member,
    repository::Repository,
    services::overdue::{self, OverdueLoan},
};

/// How many titles the most-borrowed report returns
pub const TOP_BOOKS_LIMIT: i64 = 20;

/// Headline counters for the reports screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_books: i64,
    pub total_members: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
}

/// One row of the most-borrowed-books report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLoanCount {
    pub title: String,
    pub author: Option<String>,
    pub loan_count: i64,
}

/// One row of the per-member loan-count report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLoanCount {
    pub member_no: String,
    pub member_name: String,
    pub loan_count: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Headline counters, with overdue evaluated against `today`
    pub async fn get_stats(&self, today: NaiveDate) -> AppResult<Stats> {
        Ok(Stats {
            total_books: self.repository.books.count().await?,
            total_members: self.repository.members.count().await?,
            active_loans: self.repository.loans.count_active().await?,
            overdue_loans: self.repository.loans.count_overdue(today).await?,
        })
    }

    /// Active loans past their due date, oldest due date first
    pub async fn overdue_report(&self, today: NaiveDate) -> AppResult<Vec<OverdueLoan>> {
        let active = self.repository.loans.list_active(None).await?;
        Ok(overdue::evaluate(&active, today))
    }

    /// Most-borrowed books over a loan-date range, busiest first.
    /// Counts both active and closed loans.
    pub async fn top_books(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<BookLoanCount>> {
        let rows = sqlx::query(
            r#"
            SELECT b.title, b.author, COUNT(l.id) AS loan_count
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.loan_date BETWEEN ? AND ?
            GROUP BY b.id
            ORDER BY COUNT(l.id) DESC
            LIMIT ?
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TOP_BOOKS_LIMIT)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| BookLoanCount {
                title: row.get("title"),
                author: row.get("author"),
                loan_count: row.get("loan_count"),
            })
            .collect())
    }

    /// Loans per member over a loan-date range, busiest first
    pub async fn member_loan_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<MemberLoanCount>> {
        let rows = sqlx::query(
            r#"
            SELECT m.member_no, m.name || ' ' || m.surname AS member_name, COUNT(l.id) AS loan_count
            FROM loans l
            JOIN members m ON l.member_id = m.id
            WHERE l.loan_date BETWEEN ? AND ?
            GROUP BY m.id
            ORDER BY COUNT(l.id) DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MemberLoanCount {
                member_no: row.get("member_no"),
                member_name: row.get("member_name"),
                loan_count: row.get("loan_count"),
            })
            .collect())
    }

    /// Member roster ordered by class, branch and name, for the class list
    /// report
    pub async fn member_roster(&self) -> AppResult<Vec<Member>> {
        self.repository.members.roster().await
    }
}
