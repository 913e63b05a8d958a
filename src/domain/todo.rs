use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Calendar-date wire format (`YYYY-MM-DD`) used for due dates.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "todo_priority", rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_id: Uuid,
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(with = "iso_date::option")]
    pub due_date: Option<Date>,
}

/// Validated fields for a new todo. `done` always starts false.
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<Date>,
}

/// Partial update. Outer `None` leaves a field untouched; for the nullable
/// fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TodoFilter {
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub order: SortOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn sample() -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: "water the plants".to_owned(),
            done: false,
            created_at: datetime!(2025-08-02 10:15:00 UTC),
            user_id: Uuid::new_v4(),
            description: None,
            priority: Priority::default(),
            due_date: Some(date!(2025 - 08 - 09)),
        }
    }

    #[test]
    fn test_todo_serializes_dates_as_wire_formats() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["due_date"], "2025-08-09");
        assert_eq!(json["created_at"], "2025-08-02T10:15:00Z");
        assert_eq!(json["priority"], "normal");
        assert_eq!(json["description"], serde_json::Value::Null);
    }

    #[test]
    fn test_missing_due_date_serializes_as_null() {
        let todo = Todo { due_date: None, ..sample() };
        let json = serde_json::to_value(todo).unwrap();

        assert_eq!(json["due_date"], serde_json::Value::Null);
    }

    #[test]
    fn test_date_format_round_trip() {
        let parsed = Date::parse("2025-12-31", DATE_FORMAT).unwrap();
        assert_eq!(parsed, date!(2025 - 12 - 31));
        assert!(Date::parse("31-12-2025", DATE_FORMAT).is_err());
        assert!(Date::parse("2025-13-01", DATE_FORMAT).is_err());
    }
}
