//! taskdb CLI - task and user tracking over SQLite.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use taskdb::{
    Cat, Catalog, Config, Database, DeleteOutcome, Deletion, NewCat, NewTask, Seeder, Task, TaskStatus, User,
};

mod cli;

use cli::{CatCommand, Cli, Command};

fn setup_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskdb.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Status names from the lookup table, for display.
struct StatusNames(HashMap<i64, String>);

impl StatusNames {
    fn load(catalog: &Catalog<'_>) -> Self {
        let names = catalog
            .statuses()
            .unwrap_or_default()
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        Self(names)
    }

    fn format(&self, status_id: i64) -> ColoredString {
        let Some(name) = self.0.get(&status_id) else {
            return format!("status:{}", status_id).normal();
        };
        match name.parse::<TaskStatus>() {
            Ok(TaskStatus::New) => name.green(),
            Ok(TaskStatus::InProgress) => name.yellow(),
            Ok(TaskStatus::Completed) => name.blue(),
            Err(_) => name.normal(),
        }
    }
}

fn print_task(task: &Task, names: &StatusNames) {
    println!(
        "{} {} {} {}{}",
        format!("#{}", task.id).cyan(),
        names.format(task.status_id),
        format!("u{}", task.user_id).dimmed(),
        task.title,
        task.description
            .as_ref()
            .map(|d| format!("\n    {}", d.dimmed()))
            .unwrap_or_default()
    );
}

fn print_user(user: &User) {
    println!("{} {} {}", format!("#{}", user.id).cyan(), user.fullname, user.email.dimmed());
}

fn print_cat(cat: &Cat) {
    let features = if cat.features.is_empty() {
        String::new()
    } else {
        format!(" [{}]", cat.features.join(", "))
    };
    println!("{} {} age {}{}", cat.id.cyan(), cat.name, cat.age, features.dimmed());
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

/// Print a list of rows, or a dimmed placeholder when there are none.
fn print_rows<T: Serialize>(json: bool, rows: Option<Vec<T>>, empty: &str, print: impl Fn(&T)) -> Result<Outcome> {
    let rows = rows.ok_or_else(|| eyre::eyre!("Query failed; see the log for details"))?;

    if json {
        print_json(&rows)?;
    } else if rows.is_empty() {
        println!("{}", empty.dimmed());
    } else {
        rows.iter().for_each(print);
    }
    Ok(Outcome::Success)
}

/// Accept a numeric status id or a status name.
fn resolve_status(catalog: &Catalog<'_>, value: &str) -> Result<i64> {
    if let Ok(id) = value.trim().parse::<i64>() {
        return Ok(id);
    }
    let status: TaskStatus = value.parse()?;
    catalog
        .status_id(status)
        .ok_or_else(|| eyre::eyre!("Status '{}' is not in the status table", status))
}

/// How a command finished once its output has been printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    fn of_deletion(deletion: &Deletion) -> Self {
        match deletion.outcome {
            DeleteOutcome::Failed => Outcome::Failure,
            DeleteOutcome::Deleted | DeleteOutcome::NotFound => Outcome::Success,
        }
    }

    fn of_status_change(task: &Task, status_id: i64) -> Self {
        if task.status_id == status_id {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

fn not_found(what: &str, key: impl std::fmt::Display) -> Outcome {
    eprintln!("{} {} not found: {}", "✗".red(), what, key);
    Outcome::Failure
}

fn run(cli: Cli, config: Config) -> Result<Outcome> {
    let db = Database::init(&config.database_path).context("Failed to open database")?;
    let catalog = db.catalog();
    let names = StatusNames::load(&catalog);
    let show_task = |task: &Task| print_task(task, &names);
    let json = cli.json;

    let outcome = match cli.command {
        Command::Init { reset } => {
            if reset {
                db.reset().context("Failed to reset schema")?;
                println!("{} Reset database at {}", "✓".green(), config.database_path.display());
            } else {
                println!("{} Initialized database at {}", "✓".green(), config.database_path.display());
            }
            Outcome::Success
        }

        Command::Seed { users, tasks } => {
            let report = Seeder::new(users, tasks)
                .run(&catalog)
                .context("Failed to seed database")?;
            println!(
                "{} Seeded {} user(s) and {} task(s)",
                "✓".green(),
                report.users.len(),
                report.tasks.len()
            );
            Outcome::Success
        }

        Command::UserTasks { user_id } => {
            print_rows(json, catalog.tasks_by_user(user_id), "No tasks found", show_task)?
        }

        Command::Get { id } => match catalog.task_by_id(id) {
            Some(task) => {
                if json {
                    print_json(&task)?;
                } else {
                    show_task(&task);
                }
                Outcome::Success
            }
            None => not_found("Task", id),
        },

        Command::ByStatus { status } => {
            let status: TaskStatus = status.parse()?;
            print_rows(json, catalog.tasks_by_status(status), "No tasks found", show_task)?
        }

        Command::SetStatus { id, status } => {
            let status_id = resolve_status(&catalog, &status)?;
            match catalog.change_task_status(id, status_id) {
                Some(task) => {
                    let outcome = Outcome::of_status_change(&task, status_id);
                    if json {
                        print_json(&task)?;
                    } else if outcome == Outcome::Success {
                        println!("{} Task {} is now {}", "✓".green(), id.to_string().cyan(), names.format(status_id));
                    } else {
                        eprintln!("{} Task {} kept status {}", "✗".red(), id, names.format(task.status_id));
                    }
                    outcome
                }
                None => not_found("Task", id),
            }
        }

        Command::IdleUsers => {
            print_rows(json, catalog.users_without_tasks(), "Every user has a task", print_user)?
        }

        Command::Create {
            title,
            user,
            status,
            description,
        } => {
            let status_id = resolve_status(&catalog, &status)?;
            let mut new_task = NewTask::new(title, status_id, user);
            if let Some(description) = description {
                new_task = new_task.with_description(description);
            }

            let task = catalog
                .create_task(&new_task)
                .ok_or_else(|| eyre::eyre!("Failed to create task; see the log for details"))?;
            if json {
                print_json(&task)?;
            } else {
                println!("{} Created: {} {}", "✓".green(), task.id.to_string().cyan(), task.title);
            }
            Outcome::Success
        }

        Command::Open => {
            print_rows(json, catalog.not_completed_tasks(), "No open tasks", show_task)?
        }

        Command::Delete { id } => {
            let deletion = catalog.delete_task_by_id(id);
            if json {
                print_json(&deletion)?;
            } else {
                match deletion.outcome {
                    DeleteOutcome::Deleted => println!("{} {}", "✓".green(), deletion),
                    DeleteOutcome::NotFound => println!("{} {}", "✗".yellow(), deletion),
                    DeleteOutcome::Failed => eprintln!("{} {}", "✗".red(), deletion),
                }
            }
            Outcome::of_deletion(&deletion)
        }

        Command::FindUsers { fragment } => {
            print_rows(json, catalog.users_by_email(&fragment), "No users found", print_user)?
        }

        Command::Rename { user_id, name } => match catalog.change_user_name(user_id, &name) {
            Some(user) => {
                if json {
                    print_json(&user)?;
                } else {
                    print_user(&user);
                }
                Outcome::Success
            }
            None => not_found("User", user_id),
        },

        Command::StatusCounts => print_rows(json, catalog.count_tasks_by_status(), "No statuses", |c| {
            println!("{:>4} {}", c.task_count, names.format(c.id));
        })?,

        Command::ByDomain { domain } => {
            print_rows(json, catalog.tasks_by_email_domain(&domain), "No tasks found", |row| {
                show_task(&row.task);
                println!("    {} {}", row.user_fullname, row.user_email.dimmed());
            })?
        }

        Command::NoDescription => {
            print_rows(json, catalog.tasks_without_description(), "No tasks found", show_task)?
        }

        Command::UsersByStatus { status } => {
            let status: TaskStatus = status.parse()?;
            print_rows(json, catalog.users_and_tasks_by_status(status), "No tasks found", |row| {
                println!(
                    "{} {} {} {}",
                    format!("#{}", row.user.id).cyan(),
                    row.user.fullname,
                    format!("task #{}", row.task_id).cyan(),
                    row.title
                );
            })?
        }

        Command::UserCounts => print_rows(json, catalog.count_tasks_by_user(), "No users", |c| {
            println!("{:>4} {} {}", c.task_count, format!("#{}", c.user.id).cyan(), c.user.fullname);
        })?,

        Command::AddUser { fullname, email } => {
            let user = catalog
                .create_user(&fullname, &email)
                .ok_or_else(|| eyre::eyre!("Failed to create user; see the log for details"))?;
            if json {
                print_json(&user)?;
            } else {
                println!("{} Created: {} {}", "✓".green(), user.id.to_string().cyan(), user.fullname);
            }
            Outcome::Success
        }

        Command::GetUser { id } => match catalog.user_by_id(id) {
            Some(user) => {
                if json {
                    print_json(&user)?;
                } else {
                    print_user(&user);
                }
                Outcome::Success
            }
            None => not_found("User", id),
        },

        Command::DeleteUser { id } => {
            let deletion = catalog.delete_user_by_id(id);
            if json {
                print_json(&deletion)?;
            } else if deletion.outcome == DeleteOutcome::Failed {
                eprintln!("{} {}", "✗".red(), deletion);
            } else {
                println!("{} {}", "→".blue(), deletion);
            }
            Outcome::of_deletion(&deletion)
        }

        Command::Cat(command) => run_cat(&db, command, json)?,
    };

    db.close()?;
    Ok(outcome)
}

fn run_cat(db: &Database, command: CatCommand, json: bool) -> Result<Outcome> {
    let cats = db.cats();

    let updated = |cat: Option<Cat>, name: &str| -> Result<Outcome> {
        match cat {
            Some(cat) => {
                if json {
                    print_json(&cat)?;
                } else {
                    print_cat(&cat);
                }
                Ok(Outcome::Success)
            }
            None => {
                eprintln!("{} No cat named {}", "✗".red(), name);
                Ok(Outcome::Failure)
            }
        }
    };

    let outcome = match command {
        CatCommand::List { name } => {
            let found = match &name {
                Some(fragment) => cats.find_by_name(fragment),
                None => cats.all(),
            };
            let empty = match &name {
                Some(fragment) => format!("No cat named like {}", fragment),
                None => "No cats".to_string(),
            };
            print_rows(json, found, &empty, print_cat)?
        }

        CatCommand::Get { id } => match cats.by_id(&id) {
            Some(cat) => {
                if json {
                    print_json(&cat)?;
                } else {
                    print_cat(&cat);
                }
                Outcome::Success
            }
            None => not_found("Cat", &id),
        },

        CatCommand::Add { name, age, features } => {
            let cat = NewCat::new(name, age).with_features(features.unwrap_or_default());
            let cat = cats
                .create(&cat)?
                .ok_or_else(|| eyre::eyre!("Failed to create cat; see the log for details"))?;
            if json {
                print_json(&cat)?;
            } else {
                println!("{} Created: {} {}", "✓".green(), cat.id.cyan(), cat.name);
            }
            Outcome::Success
        }

        CatCommand::SetAge { name, age } => updated(cats.update_age(&name, age), &name)?,

        CatCommand::Rename { name, new_name } => updated(cats.rename(&name, &new_name)?, &name)?,

        CatCommand::AddFeatures { name, features } => updated(cats.add_features(&name, &features), &name)?,

        CatCommand::Delete { name } => match cats.delete_by_name(&name) {
            DeleteOutcome::Deleted => {
                println!("{} Deleted {}", "✓".green(), name);
                Outcome::Success
            }
            DeleteOutcome::NotFound => {
                println!("{} No cat named {}", "✗".yellow(), name);
                Outcome::Success
            }
            DeleteOutcome::Failed => eyre::bail!("Failed to delete cat {}; see the log for details", name),
        },

        CatCommand::Clear => match cats.delete_all() {
            DeleteOutcome::Failed => eyre::bail!("Failed to delete cats; see the log for details"),
            _ => {
                println!("{} Cat collection is empty", "✓".green());
                Outcome::Success
            }
        },
    };

    Ok(outcome)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(path) = &cli.db {
        config = config.with_database_path(path);
    }

    setup_logging(&config.log_dir).context("Failed to setup logging")?;
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    match run(cli, config) {
        Ok(Outcome::Success) => Ok(()),
        Ok(Outcome::Failure) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
