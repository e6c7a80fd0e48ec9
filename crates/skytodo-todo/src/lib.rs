//! To-do list storage for SkyTodo
//!
//! In-memory list operations and display ordering, plus whole-collection
//! persistence into a named key-value slot.

pub mod codec;
pub mod dates;
pub mod error;
pub mod item;
pub mod kv;
pub mod list;
pub mod store;

pub use error::{TodoError, TodoResult};
pub use item::{normalize_text, TodoItem};
pub use kv::{KeyValueStore, SqliteKvStore};
pub use list::{display_order, TodoList};
pub use store::{TodoStore, TODO_SLOT};
