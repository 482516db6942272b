use sqlx::{Executor, Sqlite};

use crate::{auth::repo_types::User, db::StoreError};

impl User {
    /// Find a user by exact email.
    pub async fn find_by_email<'e, E>(exec: E, email: &str) -> Result<Option<User>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(exec)
        .await?;
        Ok(user)
    }

    /// Insert a user. A taken email fails with `StoreError::ConstraintViolation`.
    pub async fn insert<'e, E>(
        exec: E,
        id: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(), StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .execute(exec)
        .await?;
        Ok(())
    }

    /// Insert a user unless the id or email already exists.
    /// Returns whether a row was written.
    pub async fn insert_or_ignore<'e, E>(
        exec: E,
        id: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, email, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    #[cfg(test)]
    pub(crate) async fn count_by_email<'e, E>(exec: E, email: &str) -> Result<i64, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(exec)
            .await?;
        Ok(count)
    }
}
