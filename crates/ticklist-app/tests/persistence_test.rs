//! Integration tests for TaskStore over a file-backed store.
#![allow(missing_docs)]

use std::fs;

use anyhow::Result;
use tempfile::tempdir;
use ticklist_app::{
    Intent, Mutation, StatusLine, TASKS_KEY, THEME_KEY, TaskStore, ViewState, dispatch,
};
use ticklist_core::{FilterMode, Priority, SortMode, TaskDraft, TaskId};
use ticklist_store_kv::FileKvStore;
use time::macros::date;

fn created(mutation: Option<&Mutation>) -> TaskId {
    match mutation {
        Some(Mutation::Created(id)) => *id,
        other => panic!("expected creation, got {other:?}"),
    }
}

#[test]
fn state_survives_reopen() -> Result<()> {
    let dir = tempdir()?;
    let (kept, done) = {
        let mut store = TaskStore::open(FileKvStore::open(dir.path())?)?;
        let kept = created(
            dispatch(
                &mut store,
                Intent::Add(
                    TaskDraft::new("pay rent")
                        .due(Some(date!(2025 - 03 - 01)))
                        .priority(Priority::High),
                ),
            )?
            .mutation
            .as_ref(),
        );
        let done = created(
            dispatch(&mut store, Intent::Add(TaskDraft::new("buy milk")))?
                .mutation
                .as_ref(),
        );
        dispatch(&mut store, Intent::Toggle(done))?;
        dispatch(&mut store, Intent::SetFilter("pending".into()))?;
        dispatch(&mut store, Intent::SetSort("dueDate".into()))?;
        (kept, done)
    };

    let mut reopened = TaskStore::open(FileKvStore::open(dir.path())?)?;
    assert_eq!(reopened.tasks().len(), 2);
    assert_eq!(reopened.preferences().filter, FilterMode::Pending);
    assert_eq!(reopened.preferences().sort, SortMode::DueDate);

    let task = reopened.get(kept).unwrap_or_else(|| panic!("kept task reloads"));
    assert_eq!(task.text, "pay rent");
    assert_eq!(task.due_date, Some(date!(2025 - 03 - 01)));
    assert_eq!(task.priority, Priority::High);
    assert!(reopened.get(done).is_some_and(|task| task.completed));

    let view = dispatch(&mut reopened, Intent::Refresh)?.projection;
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].id, kept);
    assert_eq!(view.items[0].due_label.as_deref(), Some("Mar 1"));
    assert_eq!(view.status, StatusLine::Remaining(1));
    Ok(())
}

#[test]
fn mirror_uses_browser_layout() -> Result<()> {
    let dir = tempdir()?;
    let mut store = TaskStore::open(FileKvStore::open(dir.path())?)?;
    dispatch(&mut store, Intent::Add(TaskDraft::new("water plants")))?;

    let raw = fs::read_to_string(dir.path().join(TASKS_KEY))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let task = &value[0];
    assert_eq!(task["text"], "water plants");
    assert_eq!(task["completed"], false);
    assert_eq!(task["dueDate"], "");
    assert_eq!(task["priority"], "medium");
    assert!(task["id"].is_u64());
    assert_eq!(fs::read_to_string(dir.path().join("filter"))?, "all");
    assert_eq!(fs::read_to_string(dir.path().join("sort"))?, "default");
    Ok(())
}

#[test]
fn theme_key_is_left_alone() -> Result<()> {
    let dir = tempdir()?;
    let kv = FileKvStore::open(dir.path())?;
    kv.set(THEME_KEY, "dark")?;

    let mut store = TaskStore::open(kv)?;
    let id = created(
        dispatch(&mut store, Intent::Add(TaskDraft::new("a")))?
            .mutation
            .as_ref(),
    );
    dispatch(&mut store, Intent::Toggle(id))?;
    dispatch(&mut store, Intent::ClearCompleted)?;
    dispatch(&mut store, Intent::SetSort("priority".into()))?;

    assert_eq!(store.backing().get(THEME_KEY)?.as_deref(), Some("dark"));
    Ok(())
}

#[test]
fn corrupt_mirror_starts_empty_and_recovers() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join(TASKS_KEY), "{not json")?;
    fs::write(dir.path().join("filter"), "someday")?;

    let mut store = TaskStore::open(FileKvStore::open(dir.path())?)?;
    assert!(store.tasks().is_empty());
    assert_eq!(
        store.preferences().filter,
        FilterMode::Unrecognized("someday".into())
    );

    let view = dispatch(&mut store, Intent::Add(TaskDraft::new("fresh start")))?.projection;
    assert_eq!(view.state, ViewState::Populated);
    assert_eq!(fs::read_to_string(dir.path().join("filter"))?, "someday");

    let reopened = TaskStore::open(FileKvStore::open(dir.path())?)?;
    assert_eq!(reopened.tasks().len(), 1);
    Ok(())
}

#[test]
fn non_utf8_mirror_starts_empty() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join(TASKS_KEY), [0xff, 0xfe, b'['])?;
    fs::write(dir.path().join("sort"), "priority")?;

    let mut store = TaskStore::open(FileKvStore::open(dir.path())?)?;
    assert!(store.tasks().is_empty());
    assert_eq!(store.preferences().sort, SortMode::Priority);

    dispatch(&mut store, Intent::Add(TaskDraft::new("rebuilt")))?;
    let reopened = TaskStore::open(FileKvStore::open(dir.path())?)?;
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tasks()[0].text, "rebuilt");
    Ok(())
}

#[test]
fn one_bad_record_does_not_drop_the_list() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join(TASKS_KEY),
        r#"[{"id":2,"text":"keep me","dueDate":"","priority":"high"},{"id":1,"text":"odd one","dueDate":"someday","priority":""}]"#,
    )?;

    let store = TaskStore::open(FileKvStore::open(dir.path())?)?;
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0].priority, Priority::High);
    assert_eq!(store.tasks()[1].priority, Priority::Medium);
    assert!(store.tasks()[1].due_date.is_none());
    Ok(())
}
