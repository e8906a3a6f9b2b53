//! Books repository: catalog rows and the available-copy counter

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook},
    normalize,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book with id {} not found", id)))
    }

    /// Get book by its unique barcode
    pub async fn get_by_barcode(&self, barcode: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE barcode = ?")
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Insert a new catalog entry; a duplicate barcode is a storage error
    pub async fn insert(&self, book: &NewBook) -> AppResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (barcode, title, author, publisher, year, pages,
                               category, asset_no, shelf, cabinet, copies_available, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.barcode)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.year)
        .bind(book.pages)
        .bind(&book.category)
        .bind(&book.asset_no)
        .bind(&book.shelf)
        .bind(&book.cabinet)
        .bind(book.copies_available)
        .bind(&book.note)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Insert-or-ignore path used by the spreadsheet importer: a row whose
    /// barcode already exists is silently skipped. Returns whether a row
    /// was added.
    pub async fn import(&self, book: &NewBook) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO books (barcode, title, author, publisher, year, pages,
                                         category, asset_no, shelf, cabinet, copies_available, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.barcode)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.year)
        .bind(book.pages)
        .bind(&book.category)
        .bind(&book.asset_no)
        .bind(&book.shelf)
        .bind(&book.cabinet)
        .bind(book.copies_available)
        .bind(&book.note)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a catalog entry
    pub async fn update(&self, id: i64, book: &NewBook) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET barcode = ?, title = ?, author = ?, publisher = ?, year = ?, pages = ?,
                category = ?, asset_no = ?, shelf = ?, cabinet = ?, copies_available = ?, note = ?
            WHERE id = ?
            "#,
        )
        .bind(&book.barcode)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.year)
        .bind(book.pages)
        .bind(&book.category)
        .bind(&book.asset_no)
        .bind(&book.shelf)
        .bind(&book.cabinet)
        .bind(book.copies_available)
        .bind(&book.note)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("book with id {} not found", id)));
        }
        Ok(())
    }

    /// Delete a catalog entry. The foreign key constraint rejects deleting
    /// a book that still has loan records; callers must archive or close
    /// those first.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("book with id {} not found", id)));
        }
        Ok(())
    }

    /// List the catalog, optionally filtered by a folded-substring match on
    /// title, author or barcode
    pub async fn search(&self, query: Option<&str>) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;

        match query.map(normalize::fold).filter(|q| !q.is_empty()) {
            None => Ok(books),
            Some(q) => Ok(books
                .into_iter()
                .filter(|b| {
                    normalize::matches(&b.title, &q)
                        || b.author.as_deref().is_some_and(|a| normalize::matches(a, &q))
                        || normalize::matches(&b.barcode, &q)
                })
                .collect()),
        }
    }

    /// Bounded title lookup for the loan form's live suggestions
    pub async fn suggest(&self, query: &str, limit: usize) -> AppResult<Vec<Book>> {
        let q = normalize::fold(query);
        if q.is_empty() {
            return Ok(Vec::new());
        }
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(books
            .into_iter()
            .filter(|b| normalize::matches(&b.title, &q))
            .take(limit)
            .collect())
    }

    /// Atomically take one copy off the shelf; fails with `BookUnavailable`
    /// when none are left, with no change
    pub async fn reserve_copy(&self, book_id: i64) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;
        reserve_copy_on(&mut conn, book_id).await
    }

    /// Atomically put one copy back on the shelf. The caller guarantees it
    /// only releases copies it previously reserved; no upper bound is
    /// enforced here.
    pub async fn release_copy(&self, book_id: i64) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;
        release_copy_on(&mut conn, book_id).await
    }

    /// Total number of catalog entries
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Conditional decrement on an open connection, shared with the loan
/// transaction. Zero rows affected means no copy was available (or no such
/// book); nothing changes in that case.
pub(crate) async fn reserve_copy_on(conn: &mut SqliteConnection, book_id: i64) -> AppResult<()> {
    let affected = sqlx::query(
        "UPDATE books SET copies_available = copies_available - 1 WHERE id = ? AND copies_available > 0",
    )
    .bind(book_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 0 {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
            .bind(book_id)
            .fetch_one(&mut *conn)
            .await?;
        if exists {
            return Err(AppError::BookUnavailable(book_id));
        }
        return Err(AppError::NotFound(format!(
            "book with id {} not found",
            book_id
        )));
    }
    Ok(())
}

/// Increment counterpart of [`reserve_copy_on`]
pub(crate) async fn release_copy_on(conn: &mut SqliteConnection, book_id: i64) -> AppResult<()> {
    let affected =
        sqlx::query("UPDATE books SET copies_available = copies_available + 1 WHERE id = ?")
            .bind(book_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound(format!(
            "book with id {} not found",
            book_id
        )));
    }
    Ok(())
}
