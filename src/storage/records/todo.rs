use crate::domain::todo::{Priority, Todo};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct TodoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub done: bool,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<Date>,
    pub created_at: OffsetDateTime,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            done: record.done,
            created_at: record.created_at,
            user_id: record.user_id,
            description: record.description,
            priority: record.priority,
            due_date: record.due_date,
        }
    }
}
