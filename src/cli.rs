//! CLI argument parsing for taskdb.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taskdb",
    about = "Task and user tracking over SQLite",
    version,
    after_help = "Logs are written to: ~/.local/share/taskdb/logs/taskdb.log (override with TASKDB_LOG_DIR)"
)]
pub struct Cli {
    /// Path to the database file (default: $TASKDB_DATABASE or ~/.local/share/taskdb/taskdb.db)
    #[arg(short = 'd', long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the schema and seed the status table
    Init {
        /// Drop all tables first
        #[arg(long)]
        reset: bool,
    },

    /// Fill the database with random users and tasks
    Seed {
        /// Number of users to create
        #[arg(short, long, default_value = "10")]
        users: usize,

        /// Number of tasks to create
        #[arg(short, long, default_value = "30")]
        tasks: usize,
    },

    /// List tasks owned by a user
    UserTasks {
        /// User ID
        user_id: i64,
    },

    /// Get a task by ID
    Get {
        /// Task ID
        id: i64,
    },

    /// List tasks in a status (new, "in progress", completed)
    ByStatus {
        status: String,
    },

    /// Change a task's status
    SetStatus {
        /// Task ID
        id: i64,

        /// Status id or name
        status: String,
    },

    /// List users without tasks
    IdleUsers,

    /// Create a new task
    Create {
        /// Task title
        title: String,

        /// Owner user ID
        #[arg(short, long)]
        user: i64,

        /// Status id or name
        #[arg(short, long, default_value = "new")]
        status: String,

        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// List tasks that are not completed
    Open,

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },

    /// Find users whose email contains a fragment (case-sensitive)
    FindUsers {
        fragment: String,
    },

    /// Rename a user
    Rename {
        /// User ID
        user_id: i64,

        /// New full name
        name: String,
    },

    /// Count tasks per status
    StatusCounts,

    /// List tasks whose owner's email ends with a domain
    ByDomain {
        domain: String,
    },

    /// List tasks without a description
    NoDescription,

    /// List users with their tasks in a status
    UsersByStatus {
        status: String,
    },

    /// Count tasks per user
    UserCounts,

    /// Create a new user
    AddUser {
        fullname: String,
        email: String,
    },

    /// Get a user by ID
    GetUser {
        /// User ID
        id: i64,
    },

    /// Delete a user and all their tasks
    DeleteUser {
        /// User ID
        id: i64,
    },

    /// Work with the cat collection
    #[command(subcommand)]
    Cat(CatCommand),
}

#[derive(Subcommand)]
pub enum CatCommand {
    /// List cats, optionally those whose name contains a fragment
    List {
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Get a cat by document ID
    Get {
        id: String,
    },

    /// Add a cat
    Add {
        name: String,

        age: u32,

        /// Features (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        features: Option<Vec<String>>,
    },

    /// Set a cat's age
    SetAge {
        name: String,
        age: u32,
    },

    /// Rename a cat
    Rename {
        name: String,
        new_name: String,
    },

    /// Add features to a cat (comma-separated)
    AddFeatures {
        name: String,

        #[arg(value_delimiter = ',', required = true)]
        features: Vec<String>,
    },

    /// Delete a cat by name
    Delete {
        name: String,
    },

    /// Delete every cat
    Clear,
}
