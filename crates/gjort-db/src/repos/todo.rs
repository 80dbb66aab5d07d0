use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gjort_common::models::todo::Todo;
use sqlx::PgPool;
use uuid::Uuid;

const TODO_COLUMNS: &str = "todo_id, user_id, title, description, completed, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRow {
    pub todo_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRow {
    pub fn to_todo(&self) -> Todo {
        Todo {
            id: self.todo_id,
            user_id: self.user_id,
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Completion filter for listing and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<StatusFilter> {
        match s {
            "all" => Some(StatusFilter::All),
            "completed" => Some(StatusFilter::Completed),
            "pending" => Some(StatusFilter::Pending),
            _ => None,
        }
    }

    /// Value for the `completed` column; `None` means no filter.
    fn as_completed(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Completed => Some(true),
            StatusFilter::Pending => Some(false),
        }
    }
}

/// Repository for todo records.
///
/// Ownership is deliberately NOT enforced here: `get` returns any row so
/// the web layer can tell "does not exist" (404) apart from "exists but
/// is not yours" (403).
pub struct TodoRepo;

impl TodoRepo {
    /// Create a todo for the given owner, completed = false.
    pub async fn create(
        pool: &PgPool,
        todo_id: Uuid,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<TodoRow> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "INSERT INTO todos (todo_id, user_id, title, description) \
             VALUES ($1, $2, $3, $4) RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo_id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_one(pool)
        .await
        .context("Failed to create todo")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, todo_id: Uuid) -> Result<Option<TodoRow>> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE todo_id = $1"
        ))
        .bind(todo_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get todo by id")?;
        Ok(row)
    }

    /// List an owner's todos, newest-created first, with pagination.
    pub async fn list_by_owner(
        pool: &PgPool,
        user_id: Uuid,
        status: StatusFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TodoRow>> {
        let rows = if let Some(completed) = status.as_completed() {
            sqlx::query_as::<_, TodoRow>(&format!(
                "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 AND completed = $2 \
                 ORDER BY created_at DESC, todo_id LIMIT $3 OFFSET $4"
            ))
            .bind(user_id)
            .bind(completed)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        } else {
            sqlx::query_as::<_, TodoRow>(&format!(
                "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 \
                 ORDER BY created_at DESC, todo_id LIMIT $2 OFFSET $3"
            ))
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        .context("Failed to list todos")?;
        Ok(rows)
    }

    /// Count an owner's todos for the same filter as `list_by_owner`,
    /// independent of limit/offset.
    pub async fn count_by_owner(
        pool: &PgPool,
        user_id: Uuid,
        status: StatusFilter,
    ) -> Result<i64> {
        let row: (i64,) = if let Some(completed) = status.as_completed() {
            sqlx::query_as("SELECT COUNT(*) FROM todos WHERE user_id = $1 AND completed = $2")
                .bind(user_id)
                .bind(completed)
                .fetch_one(pool)
                .await
        } else {
            sqlx::query_as("SELECT COUNT(*) FROM todos WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await
        }
        .context("Failed to count todos")?;
        Ok(row.0)
    }

    /// Partial update: unsupplied fields are left untouched, updated_at
    /// is refreshed. Single atomic statement, so concurrent updates are
    /// last-write-wins per field. Returns None when the row is gone.
    pub async fn update(
        pool: &PgPool,
        todo_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<TodoRow>> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "UPDATE todos SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 completed = COALESCE($4, completed), \
                 updated_at = NOW() \
             WHERE todo_id = $1 RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo_id)
        .bind(title)
        .bind(description)
        .bind(completed)
        .fetch_optional(pool)
        .await
        .context("Failed to update todo")?;
        Ok(row)
    }

    /// Delete a todo. Returns the number of rows removed; the caller
    /// decides whether 0 is a not-found.
    pub async fn delete(pool: &PgPool, todo_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE todo_id = $1")
            .bind(todo_id)
            .execute(pool)
            .await
            .context("Failed to delete todo")?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("completed"),
            Some(StatusFilter::Completed)
        );
        assert_eq!(StatusFilter::parse("pending"), Some(StatusFilter::Pending));
        assert_eq!(StatusFilter::parse("done"), None);
        assert_eq!(StatusFilter::parse(""), None);
        assert_eq!(StatusFilter::parse("Completed"), None);
    }

    #[test]
    fn test_status_filter_column_value() {
        assert_eq!(StatusFilter::All.as_completed(), None);
        assert_eq!(StatusFilter::Completed.as_completed(), Some(true));
        assert_eq!(StatusFilter::Pending.as_completed(), Some(false));
    }
}
