use crate::domain::todo::{Priority, SortOrder, TodoFilter};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

/// Partial-update body. Every field is wrapped twice so that an absent key
/// and an explicit `null` survive deserialization as distinct values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub done: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<Priority>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoQuery {
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub order: Option<SortOrder>,
}

impl From<TodoQuery> for TodoFilter {
    fn from(query: TodoQuery) -> Self {
        Self { done: query.done, priority: query.priority, order: query.order.unwrap_or_default() }
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
