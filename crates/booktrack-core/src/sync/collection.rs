//! Local mirror of a remote collection
//!
//! Pure state: every mutation here is the reconciliation of one successful
//! server response. Failed calls never reach this type.

use tracing::debug;

use crate::models::Resource;

/// How a saved resource was merged into the local list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// An entry with the same id was replaced in place
    Replaced,
    /// The resource was added at the end
    Appended,
}

/// Ordered, in-memory copy of the remote collection
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCollection<R: Resource> {
    items: Vec<R>,
}

impl<R: Resource> Default for LocalCollection<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<R: Resource> LocalCollection<R> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, in order
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an entry by id
    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether an entry with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace everything with a freshly fetched list
    pub fn replace_all(&mut self, items: Vec<R>) {
        self.items = items;
    }

    /// Merge a resource returned by create or update
    ///
    /// The first entry with the same id is replaced in place and any other
    /// entry with that id is dropped, leaving exactly one. A resource whose
    /// id is not present locally is appended, including the result of an
    /// update whose target was never loaded.
    pub fn merge(&mut self, resource: R) -> Merge {
        let id = resource.id().to_string();
        match self.items.iter().position(|item| item.id() == id) {
            Some(index) => {
                self.items[index] = resource;
                let mut seen = 0usize;
                self.items.retain(|item| {
                    if item.id() != id {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
                Merge::Replaced
            }
            None => {
                self.items.push(resource);
                Merge::Appended
            }
        }
    }

    /// Remove every entry with this id, returning how many were removed
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed = before - self.items.len();
        if removed == 0 {
            debug!("Removed id {} was not present locally", id);
        }
        removed
    }
}
