use serde::{Deserialize, Serialize};

use crate::model::task::{Category, Status, Task};

/// Status filter applied before bucketing. `None` (no filter) shows
/// everything.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Open,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::Open => status == Status::Open,
            StatusFilter::Completed => status == Status::Completed,
        }
    }
}

/// One display bucket: a category (or `None` for uncategorized) and
/// the tasks in it, in insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskGroup {
    pub category: Option<Category>,
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    pub fn label(&self) -> &'static str {
        match self.category {
            Some(cat) => cat.label(),
            None => "Uncategorized",
        }
    }
}

/// Partitions the snapshot into display buckets: known categories in
/// their fixed order first, uncategorized last, empty buckets dropped.
/// Concatenating the buckets reproduces the filtered tasks in their
/// original order.
pub fn group_by_category(tasks: &[Task], filter: Option<StatusFilter>) -> Vec<TaskGroup> {
    let visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| filter.map_or(true, |f| f.matches(t.status)))
        .collect();

    let mut groups = Vec::new();
    for cat in Category::ALL {
        let bucket: Vec<Task> = visible
            .iter()
            .filter(|t| t.category == Some(cat))
            .map(|t| (*t).clone())
            .collect();
        if !bucket.is_empty() {
            groups.push(TaskGroup {
                category: Some(cat),
                tasks: bucket,
            });
        }
    }

    let uncategorized: Vec<Task> = visible
        .iter()
        .filter(|t| t.category.is_none())
        .map(|t| (*t).clone())
        .collect();
    if !uncategorized.is_empty() {
        groups.push(TaskGroup {
            category: None,
            tasks: uncategorized,
        });
    }

    groups
}
