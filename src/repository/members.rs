//! Members repository: enrollment rows and lookups

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{Member, NewMember},
    normalize,
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("member with id {} not found", id)))
    }

    /// Get member by the unique membership number
    pub async fn get_by_no(&self, member_no: &str) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE member_no = ?")
            .bind(member_no)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    /// Insert a new member; a duplicate membership number is a storage error
    pub async fn insert(&self, member: &NewMember) -> AppResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO members (member_no, name, surname, class_name, branch,
                                 gender, phone, register_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.member_no)
        .bind(&member.name)
        .bind(&member.surname)
        .bind(&member.class_name)
        .bind(&member.branch)
        .bind(&member.gender)
        .bind(&member.phone)
        .bind(member.register_date)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Insert-or-ignore path used by the spreadsheet importer; returns
    /// whether a row was added
    pub async fn import(&self, member: &NewMember) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO members (member_no, name, surname, class_name, branch,
                                           gender, phone, register_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.member_no)
        .bind(&member.name)
        .bind(&member.surname)
        .bind(&member.class_name)
        .bind(&member.branch)
        .bind(&member.gender)
        .bind(&member.phone)
        .bind(member.register_date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a member's profile
    pub async fn update(&self, id: i64, member: &NewMember) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET member_no = ?, name = ?, surname = ?, class_name = ?, branch = ?,
                gender = ?, phone = ?, register_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.member_no)
        .bind(&member.name)
        .bind(&member.surname)
        .bind(&member.class_name)
        .bind(&member.branch)
        .bind(&member.gender)
        .bind(&member.phone)
        .bind(member.register_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "member with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Delete a member. The foreign key constraint rejects deleting a member
    /// that still has loan records.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "member with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// List members, optionally filtered by a folded-substring match on
    /// membership number, name or surname
    pub async fn search(&self, query: Option<&str>) -> AppResult<Vec<Member>> {
        let members =
            sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY member_no")
                .fetch_all(&self.pool)
                .await?;

        match query.map(normalize::fold).filter(|q| !q.is_empty()) {
            None => Ok(members),
            Some(q) => Ok(members
                .into_iter()
                .filter(|m| {
                    normalize::matches(&m.member_no, &q)
                        || normalize::matches(&m.name, &q)
                        || normalize::matches(&m.surname, &q)
                })
                .collect()),
        }
    }

    /// Bounded lookup for the loan form's live suggestions
    pub async fn suggest(&self, query: &str, limit: usize) -> AppResult<Vec<Member>> {
        let q = normalize::fold(query);
        if q.is_empty() {
            return Ok(Vec::new());
        }
        let members =
            sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY member_no")
                .fetch_all(&self.pool)
                .await?;
        Ok(members
            .into_iter()
            .filter(|m| {
                normalize::matches(&m.member_no, &q)
                    || normalize::matches(&m.name, &q)
                    || normalize::matches(&m.surname, &q)
            })
            .take(limit)
            .collect())
    }

    /// Full roster ordered for the class list report
    pub async fn roster(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT * FROM members ORDER BY class_name, branch, surname, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Total number of members
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
