use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::storage::records::UserRecord;
use sqlx::{Executor, Postgres};

#[derive(Clone, Debug, Default)]
pub struct UserRepository {}

impl UserRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Inserts a new user row.
    ///
    /// A duplicate username surfaces as a unique-constraint violation inside
    /// `AppError::Database`; mapping that to a conflict is the caller's job.
    pub async fn create<'e, E>(&self, executor: E, username: &str, password_hash: &str) -> Result<User>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(AppError::Database)?;

        Ok(record.into())
    }

    pub async fn find_by_username<'e, E>(&self, executor: E, username: &str) -> Result<Option<User>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await
        .map_err(AppError::Database)?;

        Ok(record.map(Into::into))
    }
}
