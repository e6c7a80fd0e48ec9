//! In-memory to-do collection and display ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::item::{normalize_text, to_millis, TodoItem};

/// The to-do collection in storage order.
///
/// Blank text is rejected silently: mutations that would store it return
/// `None` and leave the list unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<TodoItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TodoItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Append a new item created now.
    pub fn add(&mut self, text: &str, due_date: Option<DateTime<Utc>>) -> Option<TodoItem> {
        self.add_at(text, due_date, Utc::now())
    }

    /// Append a new item with an explicit creation time.
    pub fn add_at(
        &mut self,
        text: &str,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<TodoItem> {
        let text = normalize_text(text)?;
        let item = TodoItem::new(text, due_date, now);
        self.items.push(item.clone());
        Some(item)
    }

    /// Flip completion. Returns the updated item.
    pub fn toggle(&mut self, id: &str) -> Option<&TodoItem> {
        let item = self.get_mut(id)?;
        item.is_completed = !item.is_completed;
        Some(&*item)
    }

    /// Replace text and due date; id, completion and timestamp are kept.
    pub fn edit(
        &mut self,
        id: &str,
        text: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Option<&TodoItem> {
        let text = normalize_text(text)?;
        let item = self.get_mut(id)?;
        item.text = text;
        item.due_date = due_date.map(to_millis);
        Some(&*item)
    }

    pub fn delete(&mut self, id: &str) -> Option<TodoItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Items in display order; see [`display_order`].
    pub fn ordered(&self) -> Vec<&TodoItem> {
        let mut view: Vec<&TodoItem> = self.items.iter().collect();
        view.sort_by(|a, b| display_order(a, b));
        view
    }
}

/// Open items first, then sooner due dates (none last), then newest first.
pub fn display_order(a: &TodoItem, b: &TodoItem) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then_with(|| compare_due(a.due_date, b.due_date))
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

fn compare_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
