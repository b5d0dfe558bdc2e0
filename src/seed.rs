//! Random sample data for a fresh database.

use crate::catalog::Catalog;
use crate::types::{NewTask, Task, User};
use eyre::Result;
use log::{info, warn};
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dmytro", "Erin", "Frank", "Grace", "Hanna", "Ivan", "Julia", "Kyle", "Lena",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Kovalenko", "Garcia", "Muller", "Novak", "Brown", "Schmidt", "Petrenko", "Wilson", "Moreau",
];

const DOMAINS: &[&str] = &["example.com", "example.net", "example.org", "mail.test"];

const VERBS: &[&str] = &["Fix", "Review", "Write", "Refactor", "Deploy", "Document", "Test", "Plan"];

const NOUNS: &[&str] = &[
    "login flow",
    "billing report",
    "search index",
    "release notes",
    "user settings",
    "error pages",
    "backup job",
    "api client",
];

const SENTENCES: &[&str] = &[
    "Check the edge cases first.",
    "Coordinate with the team before merging.",
    "Keep the change small.",
    "Numbers in the dashboard look off.",
    "Customer reported this twice.",
    "Blocked on nothing, just needs time.",
];

/// How much sample data to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seeder {
    pub users: usize,
    pub tasks: usize,
}

impl Default for Seeder {
    fn default() -> Self {
        Self { users: 10, tasks: 30 }
    }
}

/// Rows created by a seeding run.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
}

impl Seeder {
    pub fn new(users: usize, tasks: usize) -> Self {
        Self { users, tasks }
    }

    /// Create random users, then random tasks owned by them.
    pub fn run(&self, catalog: &Catalog<'_>) -> Result<SeedReport> {
        let statuses = catalog
            .statuses()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| eyre::eyre!("Status table is empty or unreadable; initialize the schema first"))?;

        let mut rng = rand::rng();
        let mut report = SeedReport::default();

        // Offset keeps generated emails unique across repeated runs
        let offset = catalog
            .count_tasks_by_user()
            .and_then(|users| users.iter().map(|u| u.user.id).max())
            .unwrap_or(0) as usize;

        for n in 0..self.users {
            let first = pick(&mut rng, FIRST_NAMES);
            let last = pick(&mut rng, LAST_NAMES);
            let fullname = format!("{} {}", first, last);
            let email = format!(
                "{}.{}{}@{}",
                first.to_lowercase(),
                last.to_lowercase(),
                offset + n + 1,
                pick(&mut rng, DOMAINS)
            );

            match catalog.create_user(&fullname, &email) {
                Some(user) => report.users.push(user),
                None => warn!("Skipped user {}", email),
            }
        }

        if report.users.is_empty() {
            if self.tasks > 0 {
                warn!("No users created; skipping tasks");
            }
            return Ok(report);
        }

        for _ in 0..self.tasks {
            let title = format!("{} {}", pick(&mut rng, VERBS), pick(&mut rng, NOUNS));
            let status_id = statuses[rng.random_range(0..statuses.len())].id;
            let user_id = report.users[rng.random_range(0..report.users.len())].id;

            let mut task = NewTask::new(title, status_id, user_id);
            if rng.random_range(0..5) != 0 {
                task = task.with_description(pick(&mut rng, SENTENCES));
            }

            match catalog.create_task(&task) {
                Some(task) => report.tasks.push(task),
                None => warn!("Skipped task '{}'", task.title),
            }
        }

        info!(
            "Seeded {} user(s) and {} task(s)",
            report.users.len(),
            report.tasks.len()
        );
        Ok(report)
    }
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}
