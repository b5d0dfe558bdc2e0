//! Query catalog: named task and user operations over the primitive executor.
//!
//! Every operation binds its inputs as statement parameters. Operations that
//! modify a row re-read it by id afterwards, so the returned value is what
//! the database holds, not what the caller sent. The write and the re-read
//! are separate transactions.

use crate::executor::{delete, insert, read, update};
use crate::types::{
    Deletion, Entity, NewTask, StatusCount, StatusRow, Task, TaskStatus, TaskWithOwner, User, UserTask,
    UserTaskCount,
};
use log::debug;
use rusqlite::{Connection, Row, params};

/// Task and user queries bound to one connection.
///
/// Email matching relies on `PRAGMA case_sensitive_like = ON`, which
/// [`Database`](crate::Database) sets on every connection it opens.
pub struct Catalog<'c> {
    conn: &'c Connection,
}

impl<'c> Catalog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ---------------------------------------------------------------------
    // Tasks
    // ---------------------------------------------------------------------

    /// All tasks owned by a user.
    pub fn tasks_by_user(&self, user_id: i64) -> Option<Vec<Task>> {
        read(
            self.conn,
            "SELECT id, title, description, status_id, user_id FROM tasks WHERE user_id = ? ORDER BY id",
            params![user_id],
            row_to_task,
        )
    }

    /// A single task, `None` when it does not exist or the read failed.
    pub fn task_by_id(&self, task_id: i64) -> Option<Task> {
        single(read(
            self.conn,
            "SELECT id, title, description, status_id, user_id FROM tasks WHERE id = ?",
            params![task_id],
            row_to_task,
        ))
    }

    /// Every task.
    pub fn all_tasks(&self) -> Option<Vec<Task>> {
        read(
            self.conn,
            "SELECT id, title, description, status_id, user_id FROM tasks ORDER BY id",
            [],
            row_to_task,
        )
    }

    /// Tasks whose status has the given name.
    pub fn tasks_by_status(&self, status: TaskStatus) -> Option<Vec<Task>> {
        read(
            self.conn,
            r#"
            SELECT id, title, description, status_id, user_id FROM tasks
            WHERE status_id IN (SELECT id FROM status WHERE name = ?)
            ORDER BY id
            "#,
            params![status.as_str()],
            row_to_task,
        )
    }

    /// Move a task to another status and return the task as stored.
    ///
    /// Any status may follow any other.
    pub fn change_task_status(&self, task_id: i64, new_status_id: i64) -> Option<Task> {
        update(
            self.conn,
            "UPDATE tasks SET status_id = ? WHERE id = ?",
            params![new_status_id, task_id],
        );
        self.task_by_id(task_id)
    }

    /// Insert a task and return it as stored.
    pub fn create_task(&self, task: &NewTask) -> Option<Task> {
        let id: i64 = insert(
            self.conn,
            r#"
            INSERT INTO tasks (title, description, status_id, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
            params![task.title, task.description, task.status_id, task.user_id],
        )?;
        debug!("Created task {}", id);
        self.task_by_id(id)
    }

    /// Tasks whose status is anything but `completed`.
    pub fn not_completed_tasks(&self) -> Option<Vec<Task>> {
        read(
            self.conn,
            r#"
            SELECT id, title, description, status_id, user_id FROM tasks
            WHERE status_id NOT IN (SELECT id FROM status WHERE name = ?)
            ORDER BY id
            "#,
            params![TaskStatus::Completed.as_str()],
            row_to_task,
        )
    }

    /// Delete a task. The returned [`Deletion`] renders as a confirmation message.
    pub fn delete_task_by_id(&self, task_id: i64) -> Deletion {
        let outcome = delete(self.conn, "DELETE FROM tasks WHERE id = ?", params![task_id]);
        Deletion {
            entity: Entity::Task,
            id: task_id,
            outcome,
        }
    }

    /// Tasks with no description.
    pub fn tasks_without_description(&self) -> Option<Vec<Task>> {
        read(
            self.conn,
            "SELECT id, title, description, status_id, user_id FROM tasks WHERE description IS NULL ORDER BY id",
            [],
            row_to_task,
        )
    }

    /// Tasks whose owner's email ends with `domain`, with owner details.
    pub fn tasks_by_email_domain(&self, domain: &str) -> Option<Vec<TaskWithOwner>> {
        read(
            self.conn,
            r#"
            SELECT t.id, t.title, t.description, t.status_id, t.user_id,
                   u.fullname AS user_fullname, u.email AS user_email
            FROM tasks t
            INNER JOIN users u ON t.user_id = u.id
            WHERE u.email LIKE ?
            ORDER BY t.id
            "#,
            params![format!("%{}", domain)],
            |row| {
                Ok(TaskWithOwner {
                    task: row_to_task(row)?,
                    user_fullname: row.get(5)?,
                    user_email: row.get(6)?,
                })
            },
        )
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    /// A single user, `None` when it does not exist or the read failed.
    pub fn user_by_id(&self, user_id: i64) -> Option<User> {
        single(read(
            self.conn,
            "SELECT id, fullname, email FROM users WHERE id = ?",
            params![user_id],
            row_to_user,
        ))
    }

    /// Insert a user and return it as stored.
    pub fn create_user(&self, fullname: &str, email: &str) -> Option<User> {
        let id: i64 = insert(
            self.conn,
            "INSERT INTO users (fullname, email) VALUES (?, ?) RETURNING id",
            params![fullname, email],
        )?;
        debug!("Created user {}", id);
        self.user_by_id(id)
    }

    /// Rename a user and return the user as stored.
    pub fn change_user_name(&self, user_id: i64, new_name: &str) -> Option<User> {
        update(
            self.conn,
            "UPDATE users SET fullname = ? WHERE id = ?",
            params![new_name, user_id],
        );
        self.user_by_id(user_id)
    }

    /// Delete a user together with every task they own.
    pub fn delete_user_by_id(&self, user_id: i64) -> Deletion {
        let outcome = delete(self.conn, "DELETE FROM users WHERE id = ?", params![user_id]);
        Deletion {
            entity: Entity::User,
            id: user_id,
            outcome,
        }
    }

    /// Users owning no task.
    pub fn users_without_tasks(&self) -> Option<Vec<User>> {
        read(
            self.conn,
            r#"
            SELECT u.id, u.fullname, u.email FROM users u
            WHERE NOT EXISTS (SELECT 1 FROM tasks t WHERE t.user_id = u.id)
            ORDER BY u.id
            "#,
            [],
            row_to_user,
        )
    }

    /// Users whose email contains `fragment` (case-sensitive).
    pub fn users_by_email(&self, fragment: &str) -> Option<Vec<User>> {
        read(
            self.conn,
            "SELECT id, fullname, email FROM users WHERE email LIKE ? ORDER BY id",
            params![format!("%{}%", fragment)],
            row_to_user,
        )
    }

    /// Users joined with their tasks in the given status.
    pub fn users_and_tasks_by_status(&self, status: TaskStatus) -> Option<Vec<UserTask>> {
        read(
            self.conn,
            r#"
            SELECT u.id, u.fullname, u.email,
                   t.id AS task_id, t.title, t.description, t.status_id
            FROM users u
            INNER JOIN tasks t ON t.user_id = u.id
                AND t.status_id IN (SELECT id FROM status WHERE name = ?)
            ORDER BY u.id, t.id
            "#,
            params![status.as_str()],
            |row| {
                Ok(UserTask {
                    user: row_to_user(row)?,
                    task_id: row.get(3)?,
                    title: row.get(4)?,
                    description: row.get(5)?,
                    status_id: row.get(6)?,
                })
            },
        )
    }

    // ---------------------------------------------------------------------
    // Reports
    // ---------------------------------------------------------------------

    /// Task count per status, including statuses no task uses.
    pub fn count_tasks_by_status(&self) -> Option<Vec<StatusCount>> {
        read(
            self.conn,
            r#"
            SELECT s.id, s.name, COUNT(t.id) AS task_count
            FROM status s
            LEFT JOIN tasks t ON t.status_id = s.id
            GROUP BY s.id, s.name
            ORDER BY s.id
            "#,
            [],
            |row| {
                Ok(StatusCount {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    task_count: row.get(2)?,
                })
            },
        )
    }

    /// Task count per user, 0 for users without tasks.
    pub fn count_tasks_by_user(&self) -> Option<Vec<UserTaskCount>> {
        read(
            self.conn,
            r#"
            SELECT u.id, u.fullname, u.email, COUNT(t.id) AS task_count
            FROM users u
            LEFT JOIN tasks t ON t.user_id = u.id
            GROUP BY u.id, u.fullname, u.email
            ORDER BY u.id
            "#,
            [],
            |row| {
                Ok(UserTaskCount {
                    user: row_to_user(row)?,
                    task_count: row.get(3)?,
                })
            },
        )
    }

    // ---------------------------------------------------------------------
    // Status lookup
    // ---------------------------------------------------------------------

    /// The status lookup table in id order.
    pub fn statuses(&self) -> Option<Vec<StatusRow>> {
        read(self.conn, "SELECT id, name FROM status ORDER BY id", [], |row| {
            Ok(StatusRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
    }

    /// Resolve a status name to its id.
    pub fn status_id(&self, status: TaskStatus) -> Option<i64> {
        single(read(
            self.conn,
            "SELECT id FROM status WHERE name = ?",
            params![status.as_str()],
            |row| row.get(0),
        ))
    }
}

fn single<T>(rows: Option<Vec<T>>) -> Option<T> {
    rows.and_then(|rows| rows.into_iter().next())
}

/// Columns: id, title, description, status_id, user_id
fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status_id: row.get(3)?,
        user_id: row.get(4)?,
    })
}

/// Columns: id, fullname, email
fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        fullname: row.get(1)?,
        email: row.get(2)?,
    })
}
