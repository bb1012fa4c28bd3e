use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{Task, TaskStatus};

/// Server-side ordering of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first; the server default, sent as no parameter.
    #[default]
    Newest,
    Oldest,
    Priority,
    Due,
}

impl SortKey {
    /// Value of the `sort` query parameter, `None` for the server default.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            SortKey::Newest => None,
            SortKey::Oldest => Some("oldest"),
            SortKey::Priority => Some("priority"),
            SortKey::Due => Some("due"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest first",
            SortKey::Oldest => "Oldest first",
            SortKey::Priority => "High priority",
            SortKey::Due => "Due date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "priority" => Ok(SortKey::Priority),
            "due" => Ok(SortKey::Due),
            other => Err(format!("unknown sort: {other}")),
        }
    }
}

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<TaskStatus>,
    pub search: String,
    pub sort: SortKey,
}

impl TaskQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            status: None,
            search: String::new(),
            sort: SortKey::default(),
        }
    }
}

/// One page of tasks plus the unpaged total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total: u64,
}

/// Number of pages needed to show `total` items `limit` at a time.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit)).min(u64::from(u32::MAX)) as u32
}

/// Page position derived from the current query and the last total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether `page` is a page the user may navigate to.
    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages()).contains(&page)
    }
}

/// Counters shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskPriority;
    use chrono::TimeDelta;

    #[test]
    fn test_twelve_items_five_per_page() {
        let p = Pagination {
            page: 1,
            limit: 5,
            total: 12,
        };
        assert_eq!(p.total_pages(), 3);
        assert!(!p.contains(0));
        assert!(p.contains(3));
        assert!(!p.contains(4));
    }

    #[test]
    fn test_boundaries() {
        let first = Pagination {
            page: 1,
            limit: 5,
            total: 12,
        };
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = Pagination { page: 3, ..first };
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn test_empty_list_has_no_pages() {
        let p = Pagination {
            page: 1,
            limit: 5,
            total: 0,
        };
        assert_eq!(p.total_pages(), 0);
        assert!(!p.has_next());
        assert!(!p.contains(1));
    }

    #[test]
    fn test_sort_param() {
        assert_eq!(SortKey::Newest.as_param(), None);
        assert_eq!(SortKey::Due.as_param(), Some("due"));
        assert_eq!("".parse::<SortKey>(), Ok(SortKey::Newest));
        assert_eq!("priority".parse::<SortKey>(), Ok(SortKey::Priority));
    }

    #[test]
    fn test_stats_count_overdue_only_for_pending() {
        let now = Utc::now();
        let yesterday = Some(now - TimeDelta::days(1));
        let make = |id: &str, status, due_date| Task {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            status,
            priority: TaskPriority::Low,
            due_date,
            created_at: now,
            updated_at: now,
        };

        let tasks = vec![
            make("a", TaskStatus::Pending, yesterday),
            make("b", TaskStatus::Completed, yesterday),
            make("c", TaskStatus::Pending, None),
        ];

        assert_eq!(
            TaskStats::from_tasks(&tasks, now),
            TaskStats {
                pending: 2,
                completed: 1,
                overdue: 1,
            }
        );
    }
}
