use chrono::Utc;
use ratatui::widgets::TableState;
use tickdo_core::{
    entry_category, parse_entry, Category, SharedStore, StatusFilter, TaskCounts, TaskGroup,
};
use uuid::Uuid;

pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

pub struct App {
    pub store: SharedStore,
    pub filter: Option<StatusFilter>,

    // Snapshot rebuilt from the store after every mutation and on
    // every frame, so background ticks show up without user input.
    pub groups: Vec<TaskGroup>,
    pub counts: TaskCounts,

    /// Flat selection index across all visible tasks, group by group.
    pub selected: Option<usize>,
    pub state: TableState,

    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,

    editing_id: Option<Uuid>,
}

impl App {
    pub fn new(store: SharedStore, filter: Option<StatusFilter>) -> App {
        let mut app = App {
            store,
            filter,
            groups: Vec::new(),
            counts: TaskCounts {
                open: 0,
                completed: 0,
            },
            selected: None,
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
            editing_id: None,
        };
        app.refresh();
        app
    }

    /// Re-reads the grouped snapshot and clamps the selection.
    pub fn refresh(&mut self) {
        {
            let store = self.store.lock().expect("store lock poisoned");
            self.groups = store.grouped(self.filter);
            self.counts = store.counts();
        }

        let len = self.visible_len();
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), _) => Some(i.min(len - 1)),
        };
        self.state.select(self.table_row_of_selected());
    }

    pub fn visible_len(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }

    fn selected_id(&self) -> Option<Uuid> {
        let idx = self.selected?;
        self.groups
            .iter()
            .flat_map(|g| g.tasks.iter())
            .nth(idx)
            .map(|t| t.id)
    }

    /// Table row of the selection, counting one header row per group.
    pub fn table_row_of_selected(&self) -> Option<usize> {
        let mut remaining = self.selected?;
        let mut row = 0;
        for group in &self.groups {
            row += 1; // group header
            if remaining < group.tasks.len() {
                return Some(row + remaining);
            }
            remaining -= group.tasks.len();
            row += group.tasks.len();
        }
        None
    }

    pub fn next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        });
        self.state.select(self.table_row_of_selected());
    }

    pub fn previous(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.state.select(self.table_row_of_selected());
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store
                .lock()
                .expect("store lock poisoned")
                .toggle(id, Utc::now());
            self.refresh();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.lock().expect("store lock poisoned").delete(id);
            self.refresh();
        }
    }

    /// Walks the selected task through work -> personal -> shopping ->
    /// other -> uncategorized -> work ...
    pub fn cycle_category_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let current = self
            .store
            .lock()
            .expect("store lock poisoned")
            .get(id)
            .and_then(|t| t.category);

        let next = match current {
            None => Some(Category::ALL[0]),
            Some(cat) => {
                let pos = Category::ALL.iter().position(|c| *c == cat).unwrap_or(0);
                Category::ALL.get(pos + 1).copied()
            }
        };

        self.store
            .lock()
            .expect("store lock poisoned")
            .recategorize(id, next);
        self.refresh();
    }

    pub fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            None => Some(StatusFilter::Open),
            Some(StatusFilter::Open) => Some(StatusFilter::Completed),
            Some(StatusFilter::Completed) => None,
        };
        self.refresh();
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.message = None;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let description = self
            .store
            .lock()
            .expect("store lock poisoned")
            .get(id)
            .map(|t| t.description.clone());
        if let Some(description) = description {
            self.input_mode = InputMode::Editing;
            self.cursor_position = description.chars().count();
            self.input = description;
            self.editing_id = Some(id);
            self.message = None;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
        self.editing_id = None;
        self.message = None;
    }

    pub fn submit(&mut self) {
        let entry = parse_entry(&self.input);
        let category = match entry_category(&entry) {
            Ok(category) => category,
            Err(err) => {
                self.message = Some(err.to_string());
                return;
            }
        };

        match self.input_mode {
            InputMode::Adding => {
                let added = self.store.lock().expect("store lock poisoned").add(
                    &entry.description,
                    category,
                    Utc::now(),
                );
                if added.is_none() {
                    self.message = Some("Description cannot be empty".to_string());
                    return;
                }
            }
            InputMode::Editing => {
                let Some(id) = self.editing_id else {
                    self.exit_input_mode();
                    return;
                };
                let mut store = self.store.lock().expect("store lock poisoned");
                if !entry.description.trim().is_empty() {
                    store.edit(id, &entry.description);
                }
                if category.is_some() {
                    store.recategorize(id, category);
                }
            }
            InputMode::Normal => {}
        }

        self.exit_input_mode();
        self.refresh();
    }

    // Char-indexed cursor editing; the input may contain multi-byte
    // characters.

    pub fn input_char(&mut self, c: char) {
        self.message = None;
        let byte_idx = self.byte_index();
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        self.message = None;
        if self.cursor_position == 0 {
            return;
        }
        let keep = self.cursor_position - 1;
        let before: String = self.input.chars().take(keep).collect();
        let after: String = self.input.chars().skip(self.cursor_position).collect();
        self.input = before + &after;
        self.cursor_position = keep;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.input.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(len);
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input.len())
    }
}
