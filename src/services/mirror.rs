use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Event, HelperTask, Team, User};

pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for User {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Team {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Event {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for HelperTask {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// In-memory copy of the last fetched rows of one table.
///
/// Holds no policy of its own: callers decide when to replace the whole
/// page and when to patch single entries after a confirmed write.
#[derive(Debug)]
pub struct Mirror<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for Mirror<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Keyed + Clone> Mirror<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.find(|item| item.key() == id).await
    }

    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.items.read().await.iter().find(|i| predicate(i)).cloned()
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .read()
            .await
            .iter()
            .filter(|i| predicate(i))
            .cloned()
            .collect()
    }

    pub async fn replace_all(&self, items: Vec<T>) {
        *self.items.write().await = items;
    }

    /// Appends `item`, or overwrites the entry with the same key.
    pub async fn upsert(&self, item: T) {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.key() == item.key()) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }

    /// Mutates the entry with `id` in place and returns its new value.
    pub async fn patch(&self, id: Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut items = self.items.write().await;
        let item = items.iter_mut().find(|i| i.key() == id)?;
        f(item);
        Some(item.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<T> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|i| i.key() == id)?;
        Some(items.remove(index))
    }
}
