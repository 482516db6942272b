use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};

use crate::db::StoreError;

/// Display profile, one per user by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub user_id: String, // users.id, not enforced
    pub name: String,
}

impl Profile {
    pub async fn insert<'e, E>(exec: E, id: &str, user_id: &str, name: &str) -> Result<(), StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, user_id, name)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .execute(exec)
        .await?;
        Ok(())
    }

    /// First profile stored for `user_id`, if any.
    pub async fn find_by_user_id<'e, E>(exec: E, user_id: &str) -> Result<Option<Profile>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, name
            FROM user_profiles
            WHERE user_id = ?
            ORDER BY rowid
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(exec)
        .await?;
        Ok(profile)
    }
}
