pub mod task;

pub use task::{Category, Status, Task, URGENT_THRESHOLD_MS};
