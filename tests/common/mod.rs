//! Shared test infrastructure for taskdb integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use taskdb::{Catalog, CatCollection, Database, NewTask, Task, User};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub db: Database,
}

impl TestEnv {
    /// Create a new test environment with an initialized database file.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::init(&temp_dir.path().join("tasks.db")).expect("Failed to init database");
        Self { temp_dir, db }
    }

    pub fn catalog(&self) -> Catalog<'_> {
        self.db.catalog()
    }

    pub fn cats(&self) -> CatCollection<'_> {
        self.db.cats()
    }

    /// Create a user.
    pub fn create_user(&self, fullname: &str, email: &str) -> User {
        self.catalog()
            .create_user(fullname, email)
            .expect("Failed to create user")
    }

    /// Create a task without a description.
    pub fn create_task(&self, title: &str, status_id: i64, user: &User) -> Task {
        self.catalog()
            .create_task(&NewTask::new(title, status_id, user.id))
            .expect("Failed to create task")
    }

    /// Create a task with a description.
    pub fn create_task_with_desc(&self, title: &str, description: &str, status_id: i64, user: &User) -> Task {
        self.catalog()
            .create_task(&NewTask::new(title, status_id, user.id).with_description(description))
            .expect("Failed to create task")
    }

    /// Total rows in `tasks`, counted directly.
    pub fn task_count(&self) -> i64 {
        self.db
            .connection()
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .expect("Failed to count tasks")
    }

    /// Assert that a task is among the not-completed tasks.
    pub fn assert_open(&self, task: &Task) {
        let open = self.catalog().not_completed_tasks().expect("Failed to read open tasks");
        assert!(
            open.iter().any(|t| t.id == task.id),
            "Expected task {} to be open, open tasks: {:?}",
            task.id,
            open.iter().map(|t| t.id).collect::<Vec<_>>()
        );
    }

    /// Assert that a task is NOT among the not-completed tasks.
    pub fn assert_not_open(&self, task: &Task) {
        let open = self.catalog().not_completed_tasks().expect("Failed to read open tasks");
        assert!(
            !open.iter().any(|t| t.id == task.id),
            "Expected task {} to NOT be open, but it was",
            task.id
        );
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
