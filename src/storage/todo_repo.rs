use crate::domain::todo::{NewTodo, SortOrder, Todo, TodoChanges, TodoFilter};
use crate::error::{AppError, Result};
use crate::storage::records::TodoRecord;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

const LIST_DESC: &str = r#"
    SELECT id, user_id, title, done, description, priority, due_date, created_at
    FROM todos
    WHERE user_id = $1
      AND ($2 IS NULL OR done = $2)
      AND ($3 IS NULL OR priority = $3)
    ORDER BY id DESC
"#;

const LIST_ASC: &str = r#"
    SELECT id, user_id, title, done, description, priority, due_date, created_at
    FROM todos
    WHERE user_id = $1
      AND ($2 IS NULL OR done = $2)
      AND ($3 IS NULL OR priority = $3)
    ORDER BY id ASC
"#;

#[derive(Clone, Debug, Default)]
pub struct TodoRepository {}

impl TodoRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Inserts a new todo for `user_id` and returns the stored row.
    ///
    /// Ids are UUIDv7, so creation order and id order agree.
    pub async fn create<'e, E>(&self, executor: E, user_id: Uuid, todo: &NewTodo) -> Result<Todo>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TodoRecord>(
            r#"
            INSERT INTO todos (id, user_id, title, description, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, done, description, priority, due_date, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.priority)
        .bind(todo.due_date)
        .fetch_one(executor)
        .await
        .map_err(AppError::Database)?;

        Ok(record.into())
    }

    pub async fn list_owned<'e, E>(&self, executor: E, user_id: Uuid, filter: &TodoFilter) -> Result<Vec<Todo>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = match filter.order {
            SortOrder::Asc => LIST_ASC,
            SortOrder::Desc => LIST_DESC,
        };

        let records = sqlx::query_as::<_, TodoRecord>(query)
            .bind(user_id)
            .bind(filter.done)
            .bind(filter.priority)
            .fetch_all(executor)
            .await
            .map_err(AppError::Database)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Applies `changes` to the todo, but only if it is owned by `user_id`.
    /// The ownership check lives in the WHERE clause, so a foreign id and a
    /// nonexistent id both come back as `None`.
    pub async fn update_owned<'e, E>(
        &self,
        executor: E,
        todo_id: Uuid,
        user_id: Uuid,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TodoRecord>(
            r#"
            UPDATE todos SET
                title = COALESCE($3, title),
                done = COALESCE($4, done),
                priority = COALESCE($5, priority),
                description = CASE WHEN $6 THEN $7 ELSE description END,
                due_date = CASE WHEN $8 THEN $9 ELSE due_date END
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, done, description, priority, due_date, created_at
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .bind(&changes.title)
        .bind(changes.done)
        .bind(changes.priority)
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.due_date.is_some())
        .bind(changes.due_date.flatten())
        .fetch_optional(executor)
        .await
        .map_err(AppError::Database)?;

        Ok(record.map(Into::into))
    }

    /// Deletes the todo if it is owned by `user_id`. Returns whether a row
    /// was actually removed.
    pub async fn delete_owned<'e, E>(&self, executor: E, todo_id: Uuid, user_id: Uuid) -> Result<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(todo_id)
            .bind(user_id)
            .execute(executor)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
