//! Loans repository: the transactional loan ledger
//!
//! Every mutating operation here runs as a single database transaction, so
//! the copy counter and the active-loan count can never be observed out of
//! step. Two concurrent creates against the last copy of a book, or against
//! a member sitting at the loan limit, cannot both succeed.

use chrono::{Duration, NaiveDate};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        setting::{DEFAULT_LOAN_DAYS, DEFAULT_LOAN_DAYS_KEY, DEFAULT_LOAN_LIMIT, LOAN_LIMIT_KEY},
        ActiveLoanRow, ClosedLoanRow, Loan, MemberHistoryRow,
    },
    normalize,
    repository::{books, settings},
};

/// How many closed loans the history listing returns
pub const CLOSED_HISTORY_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("loan with id {} not found", id)))
    }

    /// Create a new loan.
    ///
    /// One transaction covering: the loan-limit check against the member's
    /// active loans, the copy reservation, the due-date derivation from the
    /// current policy, and the insert. Any failure rolls everything back and
    /// leaves no side effects.
    pub async fn create(
        &self,
        member_id: i64,
        book_id: i64,
        loan_date: NaiveDate,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let member_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?)")
                .bind(member_id)
                .fetch_one(&mut *tx)
                .await?;
        if !member_exists {
            return Err(AppError::NotFound(format!(
                "member with id {} not found",
                member_id
            )));
        }

        // Policy is read inside the transaction so a settings change takes
        // effect for subsequent loans only, never retroactively.
        let loan_limit =
            settings::read_int_on(&mut tx, LOAN_LIMIT_KEY, DEFAULT_LOAN_LIMIT).await?;

        let active_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE member_id = ? AND return_date IS NULL",
        )
        .bind(member_id)
        .fetch_one(&mut *tx)
        .await?;

        if active_count >= loan_limit {
            return Err(AppError::MemberLimitExceeded {
                current: active_count,
                limit: loan_limit,
            });
        }

        books::reserve_copy_on(&mut tx, book_id).await?;

        let loan_days =
            settings::read_int_on(&mut tx, DEFAULT_LOAN_DAYS_KEY, DEFAULT_LOAN_DAYS).await?;
        let due_date = loan_date + Duration::days(loan_days);

        let result = sqlx::query(
            r#"
            INSERT INTO loans (book_id, member_id, loan_date, due_date, return_date)
            VALUES (?, ?, ?, ?, NULL)
            "#,
        )
        .bind(book_id)
        .bind(member_id)
        .bind(loan_date)
        .bind(due_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Loan {
            id: result.last_insert_rowid(),
            book_id,
            member_id,
            loan_date,
            due_date,
            return_date: None,
        })
    }

    /// Close a loan.
    ///
    /// Setting the return date and putting the copy back on the shelf happen
    /// in one transaction. Returning an already-closed loan fails with
    /// `AlreadyReturned` and changes nothing, so a double-click releases the
    /// copy exactly once.
    pub async fn return_loan(&self, loan_id: i64, return_date: NaiveDate) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let mut loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("loan with id {} not found", loan_id)))?;

        if loan.return_date.is_some() {
            return Err(AppError::AlreadyReturned(loan_id));
        }
        if return_date < loan.loan_date {
            return Err(AppError::Validation(format!(
                "return date {} is before loan date {}",
                return_date, loan.loan_date
            )));
        }

        sqlx::query("UPDATE loans SET return_date = ? WHERE id = ?")
            .bind(return_date)
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        books::release_copy_on(&mut tx, loan.book_id).await?;

        tx.commit().await?;

        loan.return_date = Some(return_date);
        Ok(loan)
    }

    /// List active loans joined with member and book display fields, ordered
    /// by due date. An optional filter matches a folded substring anywhere in
    /// the member number/name/class/branch or book title/barcode/location.
    pub async fn list_active(&self, filter: Option<&str>) -> AppResult<Vec<ActiveLoanRow>> {
        let rows = sqlx::query_as::<_, ActiveLoanRow>(
            r#"
            SELECT l.id, m.member_no, m.name || ' ' || m.surname AS member_name,
                   m.class_name, m.branch,
                   b.title, b.barcode, b.shelf, b.cabinet,
                   l.loan_date, l.due_date
            FROM loans l
            JOIN members m ON l.member_id = m.id
            JOIN books b ON l.book_id = b.id
            WHERE l.return_date IS NULL
            ORDER BY l.due_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        match filter.map(normalize::fold).filter(|q| !q.is_empty()) {
            None => Ok(rows),
            Some(q) => Ok(rows
                .into_iter()
                .filter(|r| {
                    normalize::matches(&r.member_no, &q)
                        || normalize::matches(&r.member_name, &q)
                        || r.class_name.as_deref().is_some_and(|v| normalize::matches(v, &q))
                        || r.branch.as_deref().is_some_and(|v| normalize::matches(v, &q))
                        || normalize::matches(&r.title, &q)
                        || normalize::matches(&r.barcode, &q)
                        || r.shelf.as_deref().is_some_and(|v| normalize::matches(v, &q))
                        || r.cabinet.as_deref().is_some_and(|v| normalize::matches(v, &q))
                })
                .collect()),
        }
    }

    /// Most recently closed loans, newest return first, capped at
    /// [`CLOSED_HISTORY_LIMIT`]
    pub async fn list_recent_closed(&self) -> AppResult<Vec<ClosedLoanRow>> {
        let rows = sqlx::query_as::<_, ClosedLoanRow>(
            r#"
            SELECT l.id, m.member_no, m.name || ' ' || m.surname AS member_name,
                   m.class_name, m.branch, b.title,
                   l.loan_date, l.due_date, l.return_date
            FROM loans l
            JOIN members m ON l.member_id = m.id
            JOIN books b ON l.book_id = b.id
            WHERE l.return_date IS NOT NULL
            ORDER BY l.return_date DESC
            LIMIT ?
            "#,
        )
        .bind(CLOSED_HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A member's full borrowing history, most recent closure first; active
    /// rows carry no return date
    pub async fn member_history(&self, member_id: i64) -> AppResult<Vec<MemberHistoryRow>> {
        let rows = sqlx::query_as::<_, MemberHistoryRow>(
            r#"
            SELECT b.title, l.loan_date, l.due_date, l.return_date
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.member_id = ?
            ORDER BY l.return_date DESC, l.loan_date DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count a member's active loans
    pub async fn count_active_for_member(&self, member_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE member_id = ? AND return_date IS NULL",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count a book's active loans
    pub async fn count_active_for_book(&self, book_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE book_id = ? AND return_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count all active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count active loans whose due date is strictly before `today`
    pub async fn count_overdue(&self, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE return_date IS NULL AND due_date < ?",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
