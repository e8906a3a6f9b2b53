//! Loan management service

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{ActiveLoanRow, ClosedLoanRow, Loan, MemberHistoryRow},
    repository::Repository,
};

/// Live-suggestion cap for member lookups on the loan form
pub const MEMBER_SUGGEST_LIMIT: usize = 50;
/// Live-suggestion cap for book lookups on the loan form
pub const BOOK_SUGGEST_LIMIT: usize = 80;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend a copy of a book to a member.
    ///
    /// Fails with `MemberLimitExceeded` when the member is at the loan
    /// limit, or `BookUnavailable` when no copy is on the shelf; either way
    /// nothing changes. On success the due date is derived from the current
    /// `default_loan_days` policy.
    pub async fn create_loan(
        &self,
        member_id: i64,
        book_id: i64,
        loan_date: NaiveDate,
    ) -> AppResult<Loan> {
        let loan = self
            .repository
            .loans
            .create(member_id, book_id, loan_date)
            .await?;
        tracing::info!(
            loan_id = loan.id,
            member_id,
            book_id,
            due_date = %loan.due_date,
            "loan created"
        );
        Ok(loan)
    }

    /// Take a lent copy back.
    ///
    /// Idempotency guard: a second return of the same loan fails with
    /// `AlreadyReturned` and does not release another copy.
    pub async fn return_loan(&self, loan_id: i64, return_date: NaiveDate) -> AppResult<Loan> {
        let loan = self.repository.loans.return_loan(loan_id, return_date).await?;
        tracing::info!(loan_id, return_date = %return_date, "loan returned");
        Ok(loan)
    }

    /// Get a loan by ID
    pub async fn get_loan(&self, loan_id: i64) -> AppResult<Loan> {
        self.repository.loans.get_by_id(loan_id).await
    }

    /// Active loans with display fields, optionally filtered by a folded
    /// substring across member and book columns
    pub async fn list_active(&self, filter: Option<&str>) -> AppResult<Vec<ActiveLoanRow>> {
        self.repository.loans.list_active(filter).await
    }

    /// The most recently closed loans (bounded listing)
    pub async fn list_recent_closed(&self) -> AppResult<Vec<ClosedLoanRow>> {
        self.repository.loans.list_recent_closed().await
    }

    /// A member's full borrowing history
    pub async fn member_history(&self, member_id: i64) -> AppResult<Vec<MemberHistoryRow>> {
        // Verify the member exists so a stale id reports NotFound rather
        // than an empty history.
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.member_history(member_id).await
    }

    /// Member suggestions for the loan form (number/name/surname match)
    pub async fn suggest_members(
        &self,
        query: &str,
    ) -> AppResult<Vec<crate::models::Member>> {
        self.repository
            .members
            .suggest(query, MEMBER_SUGGEST_LIMIT)
            .await
    }

    /// Book suggestions for the loan form (title match)
    pub async fn suggest_books(&self, query: &str) -> AppResult<Vec<crate::models::Book>> {
        self.repository.books.suggest(query, BOOK_SUGGEST_LIMIT).await
    }
}
