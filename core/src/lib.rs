pub mod input;
pub mod model;
pub mod store;

pub use input::{entry_category, expand_key, parse_category, parse_entry, ParsedEntry};
pub use model::task::{Category, Status, Task, URGENT_THRESHOLD_MS};
pub use store::ticker::{shared, SharedStore, Ticker};
pub use store::view::{group_by_category, StatusFilter, TaskGroup};
pub use store::{StoreConfig, TaskCounts, TaskStore};
