//! Plain-text rendering of the session and task list.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use taskdesk_core::ClientError;
use taskdesk_core::domain::{Pagination, Task, TaskQuery, TaskStats, TaskStatus};
use taskdesk_core::services::TaskListView;

pub fn task_line(task: &Task, now: DateTime<Utc>) -> String {
    let mark = match task.status {
        TaskStatus::Completed => "[x]",
        TaskStatus::Pending => "[ ]",
    };

    let mut line = format!(
        "{mark} {:<10} {:<6} {}",
        task.id,
        task.priority.as_str(),
        task.title
    );
    if let Some(due) = task.due_day() {
        let _ = write!(line, "  due {due}");
        if task.is_overdue(now) {
            line.push_str(" (overdue)");
        }
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(line, "\n      {description}");
    }
    line
}

pub fn filters(query: &TaskQuery) -> String {
    let status = query.status.map_or("all", |s| s.as_str());
    let mut line = format!("Status: {status} | Sort: {}", query.sort);
    if !query.search.trim().is_empty() {
        let _ = write!(line, " | Search: \"{}\"", query.search.trim());
    }
    line
}

/// "Page X of Y"; an empty list still shows one page.
pub fn page_footer(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} tasks)",
        pagination.page,
        pagination.total_pages().max(1),
        pagination.total
    )
}

pub fn stats_line(stats: &TaskStats) -> String {
    format!(
        "Pending: {}  Completed: {}  Overdue: {}",
        stats.pending, stats.completed, stats.overdue
    )
}

pub fn task_list(view: &TaskListView, now: DateTime<Utc>) -> String {
    let mut out = filters(&view.query);
    out.push('\n');

    if view.tasks.is_empty() {
        out.push_str("No tasks found\n");
    }
    for task in &view.tasks {
        out.push_str(&task_line(task, now));
        out.push('\n');
    }

    out.push_str(&page_footer(&view.pagination()));
    out.push('\n');
    out.push_str(&stats_line(&view.stats(now)));
    if let Some(error) = &view.last_error {
        let _ = write!(out, "\nLast refresh failed: {error}");
    }
    out
}

/// What the user sees for a failed command.
pub fn error(err: &ClientError) -> String {
    match err {
        ClientError::Validation(errors) => {
            let mut out = err.user_message().to_string();
            for field in errors.iter() {
                let _ = write!(out, "\n  {}: {}", field.field, field.message);
            }
            out
        }
        _ => err.user_message().to_string(),
    }
}
