pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod storage;
pub mod task;
pub mod todo_list;
pub mod ui;

pub use error::StorageError;
pub use filter::{visible, Filter};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use task::Task;
pub use todo_list::{EditDraft, TodoList};
