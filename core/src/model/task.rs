use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Milliseconds an open task may dwell before it is flagged urgent.
pub const URGENT_THRESHOLD_MS: i64 = 60_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Completed,
}

impl Default for Status {
    fn default() -> Self {
        Status::Open
    }
}

/// Fixed category set; "no category" is modelled as `Option::None`,
/// never as an extra variant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Other,
}

impl Category {
    /// Display order used by the grouped view.
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.key() == key)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub category: Option<Category>,
    pub status: Status,

    // Cache of `urgent_at`. Only status transitions and the store's
    // tick pass are allowed to rewrite it.
    pub is_urgent: bool,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// The store trims and validates `description` before calling this;
    /// the constructor itself takes the text as-is.
    pub fn new(description: String, category: Option<Category>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            category,
            status: Status::default(),
            is_urgent: false,
            created_at: now,
        }
    }

    /// Pure urgency predicate: completed tasks are never urgent, open
    /// tasks are urgent once they have dwelt longer than `threshold`.
    pub fn urgent_at(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        if self.status == Status::Completed {
            return false;
        }
        now - self.created_at > threshold
    }
}
