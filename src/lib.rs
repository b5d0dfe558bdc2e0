//! taskdb: a task and user tracking data layer over SQLite.
//!
//! Four primitives ([`executor::read`], [`executor::insert`],
//! [`executor::update`], [`executor::delete`]) own transactions and contain
//! database errors. The [`Catalog`] builds every task and user operation on
//! top of them, and [`CatCollection`] does the same for a small document
//! collection.
//!
//! # Example
//!
//! ```no_run
//! use taskdb::{Database, NewTask, TaskStatus};
//! use std::path::Path;
//!
//! let db = Database::init(Path::new("tasks.db")).unwrap();
//! let catalog = db.catalog();
//!
//! let alice = catalog.create_user("Alice", "a@x.com").unwrap();
//! let task = catalog
//!     .create_task(&NewTask::new("Fix bug", 1, alice.id).with_description("desc"))
//!     .unwrap();
//!
//! let done = catalog.status_id(TaskStatus::Completed).unwrap();
//! let task = catalog.change_task_status(task.id, done).unwrap();
//! assert_eq!(task.status_id, done);
//!
//! println!("{}", catalog.delete_task_by_id(task.id));
//! db.close().unwrap();
//! ```

mod id;

pub mod catalog;
pub mod cats;
pub mod config;
pub mod db;
pub mod executor;
pub mod schema;
pub mod seed;
pub mod types;

// Re-export public API
pub use catalog::Catalog;
pub use cats::CatCollection;
pub use config::Config;
pub use db::Database;
pub use seed::{SeedReport, Seeder};
pub use types::{
    Cat, DeleteOutcome, Deletion, Entity, NewCat, NewTask, StatusCount, StatusRow, Task, TaskStatus,
    TaskWithOwner, User, UserTask, UserTaskCount, ValidationError,
};
