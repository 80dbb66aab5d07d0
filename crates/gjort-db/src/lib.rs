pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use repos::todo::{StatusFilter, TodoRepo, TodoRow};
pub use repos::user::{UserRepo, UserRow};

/// True when any cause in the chain is a Postgres unique-constraint
/// violation (SQLSTATE 23505). Lets callers turn an insert race into a
/// CONFLICT instead of an internal error.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .and_then(|db| db.code())
            .is_some_and(|code| code == "23505")
    })
}
