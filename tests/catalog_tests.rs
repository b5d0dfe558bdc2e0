//! Integration tests for the query catalog.
//!
//! Covers task/user lifecycle operations and the reporting queries.

mod common;

use common::TestEnv;
use std::collections::BTreeSet;
use taskdb::{DeleteOutcome, NewTask, TaskStatus};

// =============================================================================
// Task Lifecycle
// =============================================================================

#[test]
fn test_alice_and_bob_walkthrough() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "a@x.com");
    let _bob = env.create_user("Bob", "b@y.net");

    let task = env.create_task_with_desc("Fix bug", "desc", 1, &alice);

    let fetched = env.catalog().task_by_id(task.id).unwrap();
    assert_eq!(fetched.title, "Fix bug");
    assert_eq!(fetched.description.as_deref(), Some("desc"));
    assert_eq!(fetched.status_id, 1);
    assert_eq!(fetched.user_id, 1);
    env.assert_open(&fetched);

    env.catalog().change_task_status(task.id, 3).unwrap();
    let fetched = env.catalog().task_by_id(task.id).unwrap();
    assert_eq!(fetched.status_id, 3);
    env.assert_not_open(&fetched);
}

#[test]
fn test_create_task_returns_supplied_fields() {
    let env = TestEnv::new();
    let user = env.create_user("Carol", "carol@example.com");

    let new_task = NewTask::new("Write docs", 2, user.id);
    let created = env.catalog().create_task(&new_task).unwrap();

    assert!(created.id > 0);
    assert_eq!(created.title, new_task.title);
    assert_eq!(created.description, None);
    assert_eq!(created.status_id, new_task.status_id);
    assert_eq!(created.user_id, new_task.user_id);
}

#[test]
fn test_status_change_visible_immediately() {
    let env = TestEnv::new();
    let user = env.create_user("Dmytro", "d@example.com");
    let task = env.create_task("Deploy", 1, &user);

    for status_id in [2, 3, 1, 3] {
        let changed = env.catalog().change_task_status(task.id, status_id).unwrap();
        assert_eq!(changed.status_id, status_id);
        assert_eq!(env.catalog().task_by_id(task.id).unwrap().status_id, status_id);
    }
}

#[test]
fn test_change_status_of_missing_task() {
    let env = TestEnv::new();
    assert!(env.catalog().change_task_status(404, 2).is_none());
}

#[test]
fn test_delete_task_then_read_returns_nothing() {
    let env = TestEnv::new();
    let user = env.create_user("Erin", "erin@example.com");
    let task = env.create_task("Temporary", 1, &user);

    let deletion = env.catalog().delete_task_by_id(task.id);
    assert_eq!(deletion.outcome, DeleteOutcome::Deleted);
    assert_eq!(deletion.to_string(), format!("Task with id {} deleted", task.id));
    assert!(env.catalog().task_by_id(task.id).is_none());
}

#[test]
fn test_delete_missing_task_reports_not_found() {
    let env = TestEnv::new();

    let deletion = env.catalog().delete_task_by_id(12345);
    assert_eq!(deletion.outcome, DeleteOutcome::NotFound);
    assert_eq!(deletion.to_string(), "No task found with id 12345");
}

#[test]
fn test_tasks_by_user() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "a@x.com");
    let bob = env.create_user("Bob", "b@y.net");
    let t1 = env.create_task("One", 1, &alice);
    let t2 = env.create_task("Two", 2, &alice);
    env.create_task("Three", 1, &bob);

    let tasks = env.catalog().tasks_by_user(alice.id).unwrap();
    assert_eq!(tasks, vec![t1, t2]);

    assert_eq!(env.catalog().tasks_by_user(999), Some(vec![]));
}

#[test]
fn test_tasks_by_status_name() {
    let env = TestEnv::new();
    let user = env.create_user("Alice", "a@x.com");
    let new_task = env.create_task("Fresh", 1, &user);
    let wip = env.create_task("Halfway", 2, &user);
    env.create_task("Finished", 3, &user);

    let catalog = env.catalog();
    assert_eq!(catalog.tasks_by_status(TaskStatus::New).unwrap(), vec![new_task]);
    assert_eq!(catalog.tasks_by_status(TaskStatus::InProgress).unwrap(), vec![wip]);
    assert_eq!(catalog.tasks_by_status(TaskStatus::Completed).unwrap().len(), 1);
}

#[test]
fn test_not_completed_tasks() {
    let env = TestEnv::new();
    let user = env.create_user("Alice", "a@x.com");
    let a = env.create_task("A", 1, &user);
    let b = env.create_task("B", 2, &user);
    let c = env.create_task("C", 3, &user);

    let open = env.catalog().not_completed_tasks().unwrap();
    assert_eq!(open, vec![a, b]);
    env.assert_not_open(&c);
}

#[test]
fn test_not_completed_resolves_status_by_name() {
    let env = TestEnv::new();
    let conn = env.db.connection();

    // Reorder the lookup so "completed" no longer has id 3
    conn.execute_batch(
        r#"
        INSERT INTO status (name) VALUES ('archived');
        UPDATE status SET name = 'tmp' WHERE name = 'completed';
        UPDATE status SET name = 'completed' WHERE name = 'archived';
        UPDATE status SET name = 'archived' WHERE name = 'tmp';
        "#,
    )
    .unwrap();

    let user = env.create_user("Alice", "a@x.com");
    let archived = env.create_task("Old", 3, &user);
    let done = env.create_task("Done", 4, &user);

    let open = env.catalog().not_completed_tasks().unwrap();
    assert!(open.iter().any(|t| t.id == archived.id));
    assert!(!open.iter().any(|t| t.id == done.id));
}

#[test]
fn test_tasks_without_description() {
    let env = TestEnv::new();
    let user = env.create_user("Alice", "a@x.com");
    let bare = env.create_task("Bare", 1, &user);
    env.create_task_with_desc("Described", "details", 1, &user);

    assert_eq!(env.catalog().tasks_without_description().unwrap(), vec![bare]);
}

#[test]
fn test_tasks_by_email_domain() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "alice@example.net");
    let bob = env.create_user("Bob", "bob@example.com");
    let task = env.create_task("Net task", 1, &alice);
    env.create_task("Com task", 1, &bob);

    let rows = env.catalog().tasks_by_email_domain("@example.net").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].task, task);
    assert_eq!(rows[0].user_fullname, "Alice");
    assert_eq!(rows[0].user_email, "alice@example.net");

    // Suffix match only
    assert_eq!(env.catalog().tasks_by_email_domain("@example").unwrap(), vec![]);
}

// =============================================================================
// Users
// =============================================================================

#[test]
fn test_change_user_name() {
    let env = TestEnv::new();
    let user = env.create_user("Hans", "hans@example.com");

    let renamed = env.catalog().change_user_name(user.id, "Hans Peter").unwrap();
    assert_eq!(renamed.fullname, "Hans Peter");
    assert_eq!(renamed.email, user.email);
    assert_eq!(env.catalog().user_by_id(user.id), Some(renamed));
}

#[test]
fn test_change_name_of_missing_user() {
    let env = TestEnv::new();
    assert!(env.catalog().change_user_name(77, "Nobody").is_none());
}

#[test]
fn test_users_by_email_substring_is_case_sensitive() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "alice@example.com");
    let bob = env.create_user("Bob", "Bob@Example.net");

    assert_eq!(env.catalog().users_by_email(".com").unwrap(), vec![alice.clone()]);
    assert_eq!(env.catalog().users_by_email("example").unwrap(), vec![alice]);
    assert_eq!(env.catalog().users_by_email("Example").unwrap(), vec![bob]);
}

#[test]
fn test_users_without_tasks_matches_zero_counts() {
    let env = TestEnv::new();
    let busy = env.create_user("Busy", "busy@example.com");
    let idle1 = env.create_user("Idle One", "idle1@example.com");
    let idle2 = env.create_user("Idle Two", "idle2@example.com");
    env.create_task("Work", 1, &busy);
    env.create_task("More work", 2, &busy);

    let catalog = env.catalog();
    let without: BTreeSet<i64> = catalog.users_without_tasks().unwrap().iter().map(|u| u.id).collect();
    let zero: BTreeSet<i64> = catalog
        .count_tasks_by_user()
        .unwrap()
        .iter()
        .filter(|c| c.task_count == 0)
        .map(|c| c.user.id)
        .collect();

    assert_eq!(without, BTreeSet::from([idle1.id, idle2.id]));
    assert_eq!(without, zero);
}

#[test]
fn test_count_tasks_by_user() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "a@x.com");
    let bob = env.create_user("Bob", "b@y.net");
    env.create_task("One", 1, &alice);
    env.create_task("Two", 1, &alice);

    let counts = env.catalog().count_tasks_by_user().unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].user, alice);
    assert_eq!(counts[0].task_count, 2);
    assert_eq!(counts[1].user, bob);
    assert_eq!(counts[1].task_count, 0);
}

#[test]
fn test_users_and_tasks_by_status() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "a@x.com");
    let bob = env.create_user("Bob", "b@y.net");
    let a_new = env.create_task_with_desc("Alice new", "first", 1, &alice);
    env.create_task("Alice done", 3, &alice);
    let b_new = env.create_task("Bob new", 1, &bob);

    let rows = env.catalog().users_and_tasks_by_status(TaskStatus::New).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].user, alice);
    assert_eq!(rows[0].task_id, a_new.id);
    assert_eq!(rows[0].title, "Alice new");
    assert_eq!(rows[0].description.as_deref(), Some("first"));
    assert_eq!(rows[0].status_id, 1);

    assert_eq!(rows[1].user, bob);
    assert_eq!(rows[1].task_id, b_new.id);

    assert_eq!(env.catalog().users_and_tasks_by_status(TaskStatus::InProgress), Some(vec![]));
}

#[test]
fn test_delete_user_cascades_to_tasks() {
    let env = TestEnv::new();
    let alice = env.create_user("Alice", "a@x.com");
    let bob = env.create_user("Bob", "b@y.net");
    env.create_task("A1", 1, &alice);
    env.create_task("A2", 2, &alice);
    let kept = env.create_task("B1", 1, &bob);

    let deletion = env.catalog().delete_user_by_id(alice.id);
    assert_eq!(deletion.outcome, DeleteOutcome::Deleted);
    assert_eq!(deletion.to_string(), format!("User with id {} deleted", alice.id));

    assert_eq!(env.catalog().tasks_by_user(alice.id), Some(vec![]));
    assert_eq!(env.catalog().all_tasks().unwrap(), vec![kept]);
    assert!(env.catalog().user_by_id(alice.id).is_none());
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_count_tasks_by_status_zero_filled() {
    let env = TestEnv::new();
    let user = env.create_user("Alice", "a@x.com");
    env.create_task("A", 1, &user);
    env.create_task("B", 1, &user);
    env.create_task("C", 3, &user);

    let counts = env.catalog().count_tasks_by_status().unwrap();
    let summary: Vec<(i64, &str, i64)> = counts
        .iter()
        .map(|c| (c.id, c.name.as_str(), c.task_count))
        .collect();

    assert_eq!(
        summary,
        vec![(1, "new", 2), (2, "in progress", 0), (3, "completed", 1)]
    );
    assert_eq!(counts.iter().map(|c| c.task_count).sum::<i64>(), env.task_count());
}

#[test]
fn test_count_tasks_by_status_empty_database() {
    let env = TestEnv::new();

    let counts = env.catalog().count_tasks_by_status().unwrap();
    assert_eq!(counts.len(), 3);
    assert!(counts.iter().all(|c| c.task_count == 0));
}

#[test]
fn test_seeded_database_invariants() {
    let env = TestEnv::new();
    taskdb::Seeder::new(6, 25).run(&env.catalog()).unwrap();
    let catalog = env.catalog();

    let by_status: i64 = catalog
        .count_tasks_by_status()
        .unwrap()
        .iter()
        .map(|c| c.task_count)
        .sum();
    assert_eq!(by_status, env.task_count());

    let by_user: i64 = catalog
        .count_tasks_by_user()
        .unwrap()
        .iter()
        .map(|c| c.task_count)
        .sum();
    assert_eq!(by_user, env.task_count());

    let open = catalog.not_completed_tasks().unwrap().len();
    let completed = catalog.tasks_by_status(TaskStatus::Completed).unwrap().len();
    assert_eq!((open + completed) as i64, env.task_count());
}
