//! CLI entry point for ticklist.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use render::LsFormat;
use ticklist_app::{AppConfig, Intent, Mutation, Skipped, TaskStore, dispatch};
use ticklist_core::{Priority, Task, TaskDraft, TaskId, parse_due_date};
use ticklist_hooks::HookExecutor;
use ticklist_store_kv::FileKvStore;

mod render;

const DATA_DIR_ENV: &str = "TICKLIST_DIR";

/// A small personal to-do list.
#[derive(Parser, Debug)]
#[command(
    name = "ticklist",
    version,
    about = "ticklist: a personal to-do list kept in a local data directory"
)]
struct Cli {
    /// Data directory (defaults to $TICKLIST_DIR, then the platform data dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a task.
    Add {
        text: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// Change the text of a task, and optionally its due date and priority.
    Edit {
        id: TaskId,
        text: String,
        /// New due date as YYYY-MM-DD; `""` clears it, omit to keep it.
        #[arg(long)]
        due: Option<String>,
        /// New priority; omit to keep it.
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// Mark a task done, or undone.
    Toggle { id: TaskId },

    /// Delete a task.
    Rm { id: TaskId },

    /// Delete every completed task.
    ClearCompleted,

    /// Show only `all`, `pending` or `completed` tasks.
    Filter { value: String },

    /// Order by `default`, `dueDate` or `priority`.
    Sort { value: String },

    /// List tasks.
    Ls {
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },
}

impl Command {
    fn into_intent<S>(self, store: &TaskStore<S>) -> Result<(Intent, LsFormat)> {
        let intent = match self {
            Self::Add {
                text,
                due,
                priority,
            } => Intent::submit(None, draft(None, text, due.as_deref(), priority)?),
            Self::Edit {
                id,
                text,
                due,
                priority,
            } => Intent::submit(
                Some(id),
                draft(store.get(id), text, due.as_deref(), priority)?,
            ),
            Self::Toggle { id } => Intent::Toggle(id),
            Self::Rm { id } => Intent::Delete(id),
            Self::ClearCompleted => Intent::ClearCompleted,
            Self::Filter { value } => Intent::SetFilter(value),
            Self::Sort { value } => Intent::SetSort(value),
            Self::Ls { format } => return Ok((Intent::Refresh, format)),
        };
        Ok((intent, LsFormat::Table))
    }
}

// Fields left out keep the values of `current`, if any.
fn draft(
    current: Option<&Task>,
    text: String,
    due: Option<&str>,
    priority: Option<Priority>,
) -> Result<TaskDraft> {
    let due = match due {
        Some(raw) => parse_due_date(raw)?,
        None => current.and_then(|task| task.due_date),
    };
    let priority = priority.or_else(|| current.map(|task| task.priority));
    let mut draft = TaskDraft::new(text).due(due);
    if let Some(priority) = priority {
        draft = draft.priority(priority);
    }
    Ok(draft)
}

fn main() -> Result<()> {
    let Cli { data_dir, cmd } = Cli::parse();
    install_tracing();

    let data_dir = resolve_data_dir(data_dir, env::var_os(DATA_DIR_ENV), dirs::data_dir())?;
    execute_command(&data_dir, cmd)
}

fn execute_command(data_dir: &Path, command: Command) -> Result<()> {
    let config = AppConfig::from_dir(data_dir)?;
    let kv = FileKvStore::open(data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    let hooks = HookExecutor::new(config.hooks, data_dir.to_path_buf());
    let mut store = TaskStore::open(kv)?.with_feedback(hooks);

    let (intent, format) = command.into_intent(&store)?;
    let dispatched = dispatch(&mut store, intent)?;
    if let Some(Mutation::Skipped(reason)) = &dispatched.mutation {
        report_skipped(*reason);
    }
    print!(
        "{}",
        render::render(&dispatched.projection, format, render::todays_quote())?
    );
    Ok(())
}

fn report_skipped(reason: Skipped) {
    match reason {
        Skipped::EmptyText => warn!("Task text is empty; nothing changed"),
        Skipped::MissingTask(id) => warn!(%id, "No task with this id; nothing changed"),
    }
}

fn resolve_data_dir(
    flag: Option<PathBuf>,
    from_env: Option<OsString>,
    platform: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = from_env.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    platform
        .map(|dir| dir.join("ticklist"))
        .ok_or_else(|| anyhow!("could not determine a data directory; pass --data-dir"))
}

fn install_tracing() {
    // RUST_LOG overrides; the default stays quiet so command output is clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use ticklist_app::TASKS_KEY;
    use ticklist_core::decode_tasks;
    use ticklist_store_kv::MemoryKvStore;
    use time::macros::date;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "ticklist",
            "--data-dir",
            "/tmp/tl",
            "add",
            "Buy groceries",
            "--due",
            "2025-02-01",
            "--priority",
            "high",
        ]);

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tl")));
        match cli.cmd {
            Command::Add {
                text,
                due,
                priority,
            } => {
                assert_eq!(text, "Buy groceries");
                assert_eq!(due.as_deref(), Some("2025-02-01"));
                assert_eq!(priority, Some(Priority::High));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_edit_and_clear_completed() {
        let cli = Cli::parse_from(["ticklist", "edit", "1700000000000", "Renamed"]);
        match cli.cmd {
            Command::Edit { id, text, due, priority } => {
                assert_eq!(id.get(), 1_700_000_000_000);
                assert_eq!(text, "Renamed");
                assert!(due.is_none());
                assert!(priority.is_none());
            }
            _ => panic!("expected edit command"),
        }

        let cli = Cli::parse_from(["ticklist", "clear-completed"]);
        assert!(matches!(cli.cmd, Command::ClearCompleted));
    }

    #[test]
    fn parse_ls_format() {
        let cli = Cli::parse_from(["ticklist", "ls", "--format", "json"]);
        assert!(matches!(cli.cmd, Command::Ls { format: LsFormat::Json }));
        let cli = Cli::parse_from(["ticklist", "ls"]);
        assert!(matches!(cli.cmd, Command::Ls { format: LsFormat::Table }));
    }

    #[test]
    fn rejects_bad_id_and_priority() {
        assert!(Cli::try_parse_from(["ticklist", "rm", "0"]).is_err());
        assert!(Cli::try_parse_from(["ticklist", "toggle", "abc"]).is_err());
        assert!(Cli::try_parse_from(["ticklist", "add", "x", "--priority", "urgent"]).is_err());
    }

    fn memory_store() -> TaskStore<MemoryKvStore> {
        TaskStore::open(MemoryKvStore::new()).unwrap_or_else(|err| panic!("memory store opens: {err}"))
    }

    #[test]
    fn intents_from_commands() -> Result<()> {
        let store = memory_store();
        let (intent, format) = Command::Filter {
            value: "pending".into(),
        }
        .into_intent(&store)?;
        assert_eq!(intent, Intent::SetFilter("pending".into()));
        assert_eq!(format, LsFormat::Table);

        let (intent, _) = Command::Add {
            text: "Plan trip".into(),
            due: Some(String::new()),
            priority: None,
        }
        .into_intent(&store)?;
        assert_eq!(intent, Intent::Add(TaskDraft::new("Plan trip")));

        let bad_due = Command::Add {
            text: "Plan trip".into(),
            due: Some("2025-02-30".into()),
            priority: None,
        };
        assert!(bad_due.into_intent(&store).is_err());
        Ok(())
    }

    #[test]
    fn edit_keeps_fields_that_are_not_given() -> Result<()> {
        let dir = tempdir()?;
        execute_command(
            dir.path(),
            Command::Add {
                text: "pay rent".into(),
                due: Some("2025-03-01".into()),
                priority: Some(Priority::High),
            },
        )?;
        let load = || -> Result<Vec<Task>> {
            let raw = FileKvStore::open(dir.path())?
                .get(TASKS_KEY)?
                .ok_or_else(|| anyhow!("tasks persisted"))?;
            Ok(decode_tasks(&raw)?)
        };
        let id = load()?[0].id;

        execute_command(
            dir.path(),
            Command::Edit {
                id,
                text: "pay rent today".into(),
                due: None,
                priority: None,
            },
        )?;
        let tasks = load()?;
        let task = &tasks[0];
        assert_eq!(task.text, "pay rent today");
        assert_eq!(task.due_date, Some(date!(2025 - 03 - 01)));
        assert_eq!(task.priority, Priority::High);

        execute_command(
            dir.path(),
            Command::Edit {
                id,
                text: "pay rent someday".into(),
                due: Some(String::new()),
                priority: Some(Priority::Low),
            },
        )?;
        let tasks = load()?;
        let task = &tasks[0];
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::Low);
        Ok(())
    }

    #[test]
    fn data_dir_precedence() -> Result<()> {
        let flag = Some(PathBuf::from("/flag"));
        let env = Some(OsString::from("/env"));
        let platform = Some(PathBuf::from("/data"));

        assert_eq!(
            resolve_data_dir(flag, env.clone(), platform.clone())?,
            PathBuf::from("/flag")
        );
        assert_eq!(
            resolve_data_dir(None, env, platform.clone())?,
            PathBuf::from("/env")
        );
        assert_eq!(
            resolve_data_dir(None, Some(OsString::new()), platform)?,
            PathBuf::from("/data/ticklist")
        );
        assert!(resolve_data_dir(None, None, None).is_err());
        Ok(())
    }

    #[test]
    fn commands_persist_to_data_dir() -> Result<()> {
        let dir = tempdir()?;
        execute_command(
            dir.path(),
            Command::Add {
                text: "Write tests".into(),
                due: None,
                priority: Some(Priority::Low),
            },
        )?;
        execute_command(dir.path(), Command::Ls { format: LsFormat::Json })?;

        let raw = FileKvStore::open(dir.path())?
            .get(TASKS_KEY)?
            .ok_or_else(|| anyhow!("tasks persisted"))?;
        let tasks = decode_tasks(&raw)?;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Write tests");
        assert_eq!(tasks[0].priority, Priority::Low);
        Ok(())
    }
}
