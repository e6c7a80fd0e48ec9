//! Persistent to-do store.
//!
//! `TodoStore` pairs the in-memory [`TodoList`] with a key-value slot and
//! writes the whole collection back after every change.

use chrono::{DateTime, Utc};

use crate::codec;
use crate::error::TodoResult;
use crate::item::TodoItem;
use crate::kv::KeyValueStore;
use crate::list::TodoList;

/// Default slot name for the serialized collection.
pub const TODO_SLOT: &str = "todo_list";

pub struct TodoStore {
    list: TodoList,
    backend: Box<dyn KeyValueStore>,
    slot: String,
}

impl TodoStore {
    /// Open the store and load the collection from `slot`.
    ///
    /// # Errors
    /// Returns `TodoError::Corrupt` if the persisted payload is malformed and
    /// `TodoError::Storage` if the backend cannot be read.
    pub fn open(backend: Box<dyn KeyValueStore>, slot: impl Into<String>) -> TodoResult<Self> {
        let slot = slot.into();
        let list = TodoList::from_items(load(backend.as_ref(), &slot)?);
        tracing::info!("Loaded {} to-do items from slot {}", list.len(), slot);
        Ok(Self {
            list,
            backend,
            slot,
        })
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    /// Items in storage order.
    pub fn items(&self) -> &[TodoItem] {
        self.list.items()
    }

    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.list.get(id)
    }

    /// Items in display order.
    pub fn ordered_view(&self) -> Vec<&TodoItem> {
        self.list.ordered()
    }

    /// Add an item. Blank text returns `Ok(None)` and writes nothing.
    ///
    /// # Errors
    /// Returns the backend error if the list cannot be saved. The item is
    /// not kept in memory in that case.
    pub fn add(
        &mut self,
        text: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> TodoResult<Option<TodoItem>> {
        let before = self.list.clone();
        let Some(item) = self.list.add(text, due_date) else {
            return Ok(None);
        };
        self.commit(before)?;
        tracing::debug!("Added to-do {}", item.id);
        Ok(Some(item))
    }

    /// Flip completion. Returns whether an item matched.
    ///
    /// # Errors
    /// Returns the backend error if the list cannot be saved; the flip is
    /// undone.
    pub fn toggle(&mut self, id: &str) -> TodoResult<bool> {
        let before = self.list.clone();
        if self.list.toggle(id).is_none() {
            return Ok(false);
        }
        self.commit(before)?;
        tracing::debug!("Toggled to-do {}", id);
        Ok(true)
    }

    /// Replace text and due date. Blank text or an unknown id change nothing.
    ///
    /// # Errors
    /// Returns the backend error if the list cannot be saved; the item keeps
    /// its previous text and due date.
    pub fn edit(
        &mut self,
        id: &str,
        text: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> TodoResult<bool> {
        let before = self.list.clone();
        if self.list.edit(id, text, due_date).is_none() {
            return Ok(false);
        }
        self.commit(before)?;
        tracing::debug!("Edited to-do {}", id);
        Ok(true)
    }

    /// Remove an item. Returns whether an item matched.
    ///
    /// # Errors
    /// Returns the backend error if the list cannot be saved; the item is
    /// restored.
    pub fn delete(&mut self, id: &str) -> TodoResult<bool> {
        let before = self.list.clone();
        if self.list.delete(id).is_none() {
            return Ok(false);
        }
        self.commit(before)?;
        tracing::debug!("Deleted to-do {}", id);
        Ok(true)
    }

    /// Persist the current list, restoring `before` if the write fails.
    fn commit(&mut self, before: TodoList) -> TodoResult<()> {
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to save to-do list, reverting change: {}", e);
            self.list = before;
            return Err(e);
        }
        Ok(())
    }

    /// Write the whole collection to the slot.
    pub fn persist(&self) -> TodoResult<()> {
        persist(self.backend.as_ref(), &self.slot, self.list.items())
    }

    /// Discard in-memory state and read the slot again.
    pub fn reload(&mut self) -> TodoResult<()> {
        self.list = TodoList::from_items(load(self.backend.as_ref(), &self.slot)?);
        Ok(())
    }
}

/// Serialize `items` into `slot`, replacing its previous value.
pub fn persist(backend: &dyn KeyValueStore, slot: &str, items: &[TodoItem]) -> TodoResult<()> {
    let payload = codec::encode(items)?;
    backend.write(slot, &payload)
}

/// Read `slot`; a missing or empty slot is an empty collection.
pub fn load(backend: &dyn KeyValueStore, slot: &str) -> TodoResult<Vec<TodoItem>> {
    match backend.read(slot)? {
        Some(payload) => codec::decode(&payload),
        None => Ok(Vec::new()),
    }
}
