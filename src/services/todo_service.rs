use crate::domain::todo::{DATE_FORMAT, NewTodo, Priority, Todo, TodoChanges, TodoFilter};
use crate::error::{AppError, Result};
use crate::storage::DbPool;
use crate::storage::todo_repo::TodoRepository;
use opentelemetry::{global, metrics::Counter};
use time::Date;
use uuid::Uuid;

/// Unvalidated create input as it arrives off the wire.
#[derive(Debug, Default)]
pub struct CreateTodoParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

/// Unvalidated update input. Outer `None` means the field was absent from
/// the request body; inner `None` means it was an explicit JSON null.
#[derive(Debug, Default)]
pub struct UpdateTodoParams {
    pub title: Option<Option<String>>,
    pub done: Option<Option<bool>>,
    pub priority: Option<Option<Priority>>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
}

#[derive(Clone, Debug)]
struct Metrics {
    created_total: Counter<u64>,
    updated_total: Counter<u64>,
    deleted_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ticklist-server");
        Self {
            created_total: meter
                .u64_counter("todos_created_total")
                .with_description("Total number of todos created")
                .build(),
            updated_total: meter
                .u64_counter("todos_updated_total")
                .with_description("Total number of todos updated")
                .build(),
            deleted_total: meter
                .u64_counter("todos_deleted_total")
                .with_description("Total number of todos deleted")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TodoService {
    pool: DbPool,
    todo_repo: TodoRepository,
    metrics: Metrics,
}

impl TodoService {
    #[must_use]
    pub fn new(pool: DbPool, todo_repo: TodoRepository) -> Self {
        Self { pool, todo_repo, metrics: Metrics::new() }
    }

    #[tracing::instrument(skip(self, filter), fields(user_id = %user_id), err(level = "warn"))]
    pub async fn list(&self, user_id: Uuid, filter: TodoFilter) -> Result<Vec<Todo>> {
        let todos = self.todo_repo.list_owned(&self.pool, user_id, &filter).await?;
        tracing::info!(count = todos.len(), "Todos fetched");
        Ok(todos)
    }

    #[tracing::instrument(
        skip(self, params),
        fields(user_id = %user_id, todo_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn create(&self, user_id: Uuid, params: CreateTodoParams) -> Result<Todo> {
        let new_todo = validate_new_todo(params)?;

        let todo = self.todo_repo.create(&self.pool, user_id, &new_todo).await?;

        tracing::Span::current().record("todo_id", tracing::field::display(todo.id));
        tracing::info!("Todo created");
        self.metrics.created_total.add(1, &[]);
        Ok(todo)
    }

    /// Applies a partial update. A todo owned by someone else reports the
    /// same not-found error as a todo that does not exist.
    #[tracing::instrument(
        skip(self, params),
        fields(user_id = %user_id, todo_id = %todo_id),
        err(level = "warn")
    )]
    pub async fn update(&self, user_id: Uuid, todo_id: Uuid, params: UpdateTodoParams) -> Result<Todo> {
        let changes = validate_changes(params)?;

        let todo = self
            .todo_repo
            .update_owned(&self.pool, todo_id, user_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("todo not found".into()))?;

        tracing::info!("Todo updated");
        self.metrics.updated_total.add(1, &[]);
        Ok(todo)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, todo_id = %todo_id), err(level = "warn"))]
    pub async fn delete(&self, user_id: Uuid, todo_id: Uuid) -> Result<()> {
        let deleted = self.todo_repo.delete_owned(&self.pool, todo_id, user_id).await?;

        if !deleted {
            return Err(AppError::NotFound("todo not found".into()));
        }

        tracing::info!("Todo deleted");
        self.metrics.deleted_total.add(1, &[]);
        Ok(())
    }
}

fn validate_new_todo(params: CreateTodoParams) -> Result<NewTodo> {
    let title = match params.title {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AppError::BadRequest("title is required and must be a string".into())),
    };

    Ok(NewTodo {
        title,
        description: params.description,
        priority: params.priority.unwrap_or_default(),
        due_date: params.due_date.as_deref().map(parse_due_date).transpose()?,
    })
}

fn validate_changes(params: UpdateTodoParams) -> Result<TodoChanges> {
    let mut changes = TodoChanges::default();

    if let Some(title) = params.title {
        match title {
            Some(t) if !t.is_empty() => changes.title = Some(t),
            Some(_) => return Err(AppError::BadRequest("title must be a non-empty string".into())),
            None => return Err(AppError::BadRequest("title must be a string".into())),
        }
    }

    if let Some(done) = params.done {
        match done {
            Some(d) => changes.done = Some(d),
            None => return Err(AppError::BadRequest("done must be a boolean".into())),
        }
    }

    if let Some(priority) = params.priority {
        match priority {
            Some(p) => changes.priority = Some(p),
            None => return Err(AppError::BadRequest("priority must be one of low, normal, high".into())),
        }
    }

    // Explicit null clears these two; absent leaves them alone.
    if let Some(description) = params.description {
        changes.description = Some(description);
    }

    if let Some(due_date) = params.due_date {
        changes.due_date = Some(due_date.as_deref().map(parse_due_date).transpose()?);
    }

    Ok(changes)
}

fn parse_due_date(raw: &str) -> Result<Date> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|_| AppError::BadRequest("due_date must be a valid YYYY-MM-DD date".into()))
}
