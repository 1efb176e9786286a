pub mod ticker;
pub mod view;

use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use uuid::Uuid;

use crate::model::task::{Category, Status, Task, URGENT_THRESHOLD_MS};
use crate::store::view::{group_by_category, StatusFilter, TaskGroup};

/// Timing knobs the store is constructed with. Both default to the
/// production values but stay independently overridable so tests can
/// run at millisecond scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub urgent_threshold: Duration,
    pub tick_interval: std::time::Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            urgent_threshold: Duration::milliseconds(URGENT_THRESHOLD_MS),
            tick_interval: std::time::Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub open: usize,
    pub completed: usize,
}

/// Owns the authoritative task collection. All mutation goes through
/// the methods below; readers only ever see immutable snapshots and
/// derived values.
///
/// Unknown ids and empty descriptions are silent no-ops, not errors.
/// The `bool`/`Option` returns report whether anything changed, which
/// is the only failure signal callers get.
#[derive(Debug, Default)]
pub struct TaskStore {
    config: StoreConfig,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            tasks: Vec::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Appends a new open task. Returns the fresh id, or `None` when
    /// the trimmed description is empty. Presentation is expected to
    /// block blank submissions too, but the store enforces the rule
    /// on its own.
    pub fn add(
        &mut self,
        description: &str,
        category: Option<Category>,
        now: DateTime<Utc>,
    ) -> Option<Uuid> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            trace!("add ignored: empty description");
            return None;
        }

        let task = Task::new(trimmed.to_string(), category, now);
        let id = task.id;
        self.tasks.push(task);
        debug!("task added id={} category={:?}", id, category);
        Some(id)
    }

    /// Flips a task between open and completed. Completing a task
    /// always clears the urgency flag; reopening recomputes it from
    /// `now` instead of waiting for the next tick.
    pub fn toggle(&mut self, id: Uuid, now: DateTime<Utc>) -> bool {
        let threshold = self.config.urgent_threshold;
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            trace!("toggle ignored: unknown id={}", id);
            return false;
        };

        task.status = match task.status {
            Status::Open => Status::Completed,
            Status::Completed => Status::Open,
        };
        task.is_urgent = task.urgent_at(now, threshold);
        debug!("task toggled id={} status={:?}", id, task.status);
        true
    }

    /// Replaces the description of an open task. Completed tasks and
    /// blank replacements are left untouched.
    pub fn edit(&mut self, id: Uuid, description: &str) -> bool {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            trace!("edit ignored: empty description id={}", id);
            return false;
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            trace!("edit ignored: unknown id={}", id);
            return false;
        };
        if task.status != Status::Open {
            trace!("edit ignored: task completed id={}", id);
            return false;
        }

        task.description = trimmed.to_string();
        debug!("task edited id={}", id);
        true
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() < before;
        if removed {
            debug!("task deleted id={}", id);
        }
        removed
    }

    /// Sets or clears the category. Allowed in any status.
    pub fn recategorize(&mut self, id: Uuid, category: Option<Category>) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            trace!("recategorize ignored: unknown id={}", id);
            return false;
        };
        task.category = category;
        debug!("task recategorized id={} category={:?}", id, category);
        true
    }

    /// One urgency-recompute pass over every open task. Completed
    /// tasks keep their (always false) flag. Returns how many flags
    /// changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> usize {
        let threshold = self.config.urgent_threshold;
        let mut changed = 0;
        for task in &mut self.tasks {
            if task.status != Status::Open {
                continue;
            }
            let urgent = task.urgent_at(now, threshold);
            if urgent != task.is_urgent {
                task.is_urgent = urgent;
                changed += 1;
            }
        }
        if changed > 0 {
            debug!("tick: {} task(s) changed urgency", changed);
        }
        changed
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            open: self
                .tasks
                .iter()
                .filter(|t| t.status == Status::Open)
                .count(),
            completed: self
                .tasks
                .iter()
                .filter(|t| t.status == Status::Completed)
                .count(),
        }
    }

    /// Read-only snapshot in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Grouped projection for the given status filter (§ view module).
    pub fn grouped(&self, filter: Option<StatusFilter>) -> Vec<TaskGroup> {
        group_by_category(&self.tasks, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StoreConfig {
        StoreConfig {
            urgent_threshold: Duration::seconds(60),
            tick_interval: std::time::Duration::from_millis(10),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn add_trims_and_appends_open_tasks() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();

        let id = store.add("  Buy milk  ", Some(Category::Shopping), t0).unwrap();

        assert_eq!(store.len(), 1);
        let task = store.get(id).unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.status, Status::Open);
        assert!(!task.is_urgent);
        assert_eq!(store.counts().open, 1);
    }

    #[test]
    fn add_rejects_blank_descriptions() {
        let mut store = TaskStore::new(test_config());
        assert_eq!(store.add("", None, now()), None);
        assert_eq!(store.add("   ", None, now()), None);
        assert!(store.is_empty());
    }

    #[test]
    fn insertion_order_survives_mutations() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let a = store.add("A", None, t0).unwrap();
        let b = store.add("B", Some(Category::Work), t0).unwrap();
        let c = store.add("C", None, t0).unwrap();

        store.toggle(b, t0);
        store.edit(a, "A2");
        store.recategorize(c, Some(Category::Other));

        let order: Vec<Uuid> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let id = store.add("Buy milk", None, t0).unwrap();

        assert!(store.toggle(id, t0));
        assert_eq!(store.get(id).unwrap().status, Status::Completed);
        assert!(store.toggle(id, t0));
        assert_eq!(store.get(id).unwrap().status, Status::Open);
    }

    #[test]
    fn completing_clears_urgency_and_reopening_recomputes_it() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let id = store.add("Buy milk", None, t0).unwrap();

        let later = t0 + Duration::seconds(61);
        store.tick(later);
        assert!(store.get(id).unwrap().is_urgent);

        store.toggle(id, later);
        let task = store.get(id).unwrap();
        assert_eq!(task.status, Status::Completed);
        assert!(!task.is_urgent);

        // Reopening past the threshold flags it urgent right away.
        store.toggle(id, later);
        let task = store.get(id).unwrap();
        assert_eq!(task.status, Status::Open);
        assert!(task.is_urgent);
    }

    #[test]
    fn edit_only_touches_open_tasks() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let id = store.add("Task A", None, t0).unwrap();

        assert!(store.edit(id, "Task A updated"));
        assert_eq!(store.get(id).unwrap().description, "Task A updated");

        store.toggle(id, t0);
        assert!(!store.edit(id, "fails"));
        assert_eq!(store.get(id).unwrap().description, "Task A updated");
    }

    #[test]
    fn edit_rejects_blank_replacements() {
        let mut store = TaskStore::new(test_config());
        let id = store.add("Keep me", None, now()).unwrap();
        assert!(!store.edit(id, "   "));
        assert_eq!(store.get(id).unwrap().description, "Keep me");
    }

    #[test]
    fn deleted_ids_stay_dead() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let id = store.add("Ephemeral", None, t0).unwrap();

        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(!store.toggle(id, t0));
        assert!(!store.edit(id, "still gone"));
        assert!(!store.recategorize(id, Some(Category::Work)));
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        store.add("Only task", None, t0);
        let bogus = Uuid::new_v4();

        assert!(!store.toggle(bogus, t0));
        assert!(!store.edit(bogus, "nope"));
        assert!(!store.delete(bogus));
        assert!(!store.recategorize(bogus, None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn recategorize_works_regardless_of_status() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let id = store.add("Buy milk", Some(Category::Shopping), t0).unwrap();

        store.toggle(id, t0);
        assert!(store.recategorize(id, Some(Category::Personal)));
        assert_eq!(store.get(id).unwrap().category, Some(Category::Personal));

        assert!(store.recategorize(id, None));
        assert_eq!(store.get(id).unwrap().category, None);
    }

    #[test]
    fn tick_flags_every_stale_open_task() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let milk = store.add("Buy milk", Some(Category::Shopping), t0).unwrap();
        let bank = store.add("Call bank", None, t0).unwrap();

        assert_eq!(store.tick(t0 + Duration::seconds(59)), 0);
        assert_eq!(store.tick(t0 + Duration::seconds(61)), 2);
        assert!(store.get(milk).unwrap().is_urgent);
        assert!(store.get(bank).unwrap().is_urgent);

        // Repeat tick is a fixpoint.
        assert_eq!(store.tick(t0 + Duration::seconds(62)), 0);
    }

    #[test]
    fn tick_skips_completed_tasks() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let id = store.add("Done early", None, t0).unwrap();
        store.toggle(id, t0);

        assert_eq!(store.tick(t0 + Duration::seconds(120)), 0);
        assert!(!store.get(id).unwrap().is_urgent);
    }

    // The walkthrough from the grouped-list view: two tasks age past
    // the threshold, one gets completed.
    #[test]
    fn urgency_and_counts_scenario() {
        let mut store = TaskStore::new(test_config());
        let t0 = now();
        let milk = store.add("Buy milk", Some(Category::Shopping), t0).unwrap();
        let bank = store.add("Call bank", None, t0).unwrap();

        let later = t0 + Duration::seconds(61);
        store.tick(later);
        assert!(store.get(milk).unwrap().is_urgent);
        assert!(store.get(bank).unwrap().is_urgent);

        store.toggle(milk, later);
        let milk_task = store.get(milk).unwrap();
        assert_eq!(milk_task.status, Status::Completed);
        assert!(!milk_task.is_urgent);

        let counts = store.counts();
        assert_eq!(counts.open, 1);
        assert_eq!(counts.completed, 1);
    }

    #[test]
    fn custom_threshold_is_honored() {
        let config = StoreConfig {
            urgent_threshold: Duration::milliseconds(50),
            ..test_config()
        };
        let mut store = TaskStore::new(config);
        let t0 = now();
        let id = store.add("Quick", None, t0).unwrap();

        assert_eq!(store.tick(t0 + Duration::milliseconds(51)), 1);
        assert!(store.get(id).unwrap().is_urgent);
    }
}
