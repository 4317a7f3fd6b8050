//! Text and JSON rendering of a projection.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use ticklist_app::{EMPTY_VIEW_MESSAGE, Projection, TaskSummary};
use ticklist_core::format_due_date;
use time::OffsetDateTime;

const QUOTES: [&str; 4] = [
    "Discipline is the bridge between goals and accomplishment.",
    "The secret to your future is hidden in your daily routine.",
    "You don't have to be great to start, but you have to start to be great.",
    "Focus on progress, not perfection.",
];

/// Output format for the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LsFormat {
    /// Pipe-separated table followed by the status line and a quote.
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Pick a quote from `seed`.
pub fn quote_for(seed: u32) -> &'static str {
    let index = usize::try_from(seed).unwrap_or_default() % QUOTES.len();
    QUOTES[index]
}

/// Quote for this run.
pub fn todays_quote() -> &'static str {
    quote_for(OffsetDateTime::now_utc().nanosecond())
}

pub fn render(projection: &Projection, format: LsFormat, quote: &str) -> Result<String> {
    match format {
        LsFormat::Table => Ok(render_table(projection, quote)),
        LsFormat::Json => render_json(projection, quote),
    }
}

fn render_table(projection: &Projection, quote: &str) -> String {
    let mut out = String::new();
    if projection.items.is_empty() {
        let _ = writeln!(out, "{EMPTY_VIEW_MESSAGE}");
    } else {
        out.push_str("ID | Done | Priority | Due | Text\n");
        out.push_str("-- | ---- | -------- | --- | ----\n");
        for item in &projection.items {
            let done = if item.completed { "x" } else { " " };
            let due = item.due_label.as_deref().unwrap_or("-");
            let _ = writeln!(
                out,
                "{} | [{done}] | {} | {due} | {}",
                item.id, item.priority, item.text
            );
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", projection.status);
    let _ = writeln!(out, "\"{quote}\"");
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonItem<'a> {
    id: u64,
    text: &'a str,
    completed: bool,
    priority: &'static str,
    due_date: Option<String>,
    due_label: Option<&'a str>,
}

impl<'a> From<&'a TaskSummary> for JsonItem<'a> {
    fn from(item: &'a TaskSummary) -> Self {
        Self {
            id: item.id.get(),
            text: &item.text,
            completed: item.completed,
            priority: item.priority.as_str(),
            due_date: item.due_date.map(format_due_date),
            due_label: item.due_label.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct JsonView<'a> {
    tasks: Vec<JsonItem<'a>>,
    status: String,
    quote: &'a str,
}

fn render_json(projection: &Projection, quote: &str) -> Result<String> {
    let view = JsonView {
        tasks: projection.items.iter().map(JsonItem::from).collect(),
        status: projection.status.to_string(),
        quote,
    };
    let mut out = serde_json::to_string_pretty(&view)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticklist_app::project;
    use ticklist_core::{FilterMode, Priority, SortMode, Task, TaskDraft, TaskId, ViewPreferences};
    use time::macros::date;

    fn tasks() -> Vec<Task> {
        let build = |raw: u64, text: &str, completed: bool| {
            let id = TaskId::new(raw).unwrap_or_else(|| panic!("non-zero id"));
            let draft = TaskDraft::new(text)
                .due((raw == 2).then_some(date!(2025 - 01 - 05)))
                .priority(if raw == 2 { Priority::High } else { Priority::Low });
            let mut task = Task::from_draft(id, draft).unwrap_or_else(|| panic!("non-blank draft"));
            task.completed = completed;
            task
        };
        vec![build(2, "file taxes", false), build(1, "call mom", true)]
    }

    #[test]
    fn table_lists_tasks_status_and_quote() {
        let projection = project(&tasks(), &ViewPreferences::default());
        let out = render_table(&projection, "Keep going.");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID | Done | Priority | Due | Text");
        assert_eq!(lines[2], "2 | [ ] | high | Jan 5 | file taxes");
        assert_eq!(lines[3], "1 | [x] | low | - | call mom");
        assert_eq!(lines[5], "1 task remaining");
        assert_eq!(lines[6], "\"Keep going.\"");
    }

    #[test]
    fn empty_view_shows_placeholder() {
        let preferences = ViewPreferences {
            filter: FilterMode::Completed,
            sort: SortMode::Default,
        };
        let mut all = tasks();
        all.retain(|task| !task.completed);
        let out = render_table(&project(&all, &preferences), "q");
        assert!(out.starts_with(EMPTY_VIEW_MESSAGE));
        assert!(out.contains("1 task remaining"));

        let out = render_table(&project(&[], &ViewPreferences::default()), "q");
        assert!(out.starts_with(EMPTY_VIEW_MESSAGE));
        assert!(out.contains("Ready to build momentum?"));
    }

    #[test]
    fn json_uses_camel_case_fields() -> Result<()> {
        let projection = project(&tasks(), &ViewPreferences::default());
        let out = render(&projection, LsFormat::Json, "q")?;
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["tasks"][0]["id"], 2);
        assert_eq!(value["tasks"][0]["dueDate"], "2025-01-05");
        assert_eq!(value["tasks"][0]["dueLabel"], "Jan 5");
        assert_eq!(value["tasks"][1]["dueDate"], serde_json::Value::Null);
        assert_eq!(value["status"], "1 task remaining");
        Ok(())
    }

    #[test]
    fn quotes_cycle_through_all_four() {
        let picked: std::collections::HashSet<_> = (0..4).map(quote_for).collect();
        assert_eq!(picked.len(), QUOTES.len());
        assert_eq!(quote_for(4), quote_for(0));
    }
}
