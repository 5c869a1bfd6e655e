use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use crate::{Error, Identifiable, Result};

/// Insertion-ordered registrants paired with an id index.
///
/// Both halves are always mutated together; every registry flavour keeps one
/// of these behind its own synchronisation.
pub(crate) struct Entries<T: ?Sized> {
    ordered: Vec<Arc<T>>,
    keyed: HashMap<String, Arc<T>>,
}

impl<T: Identifiable + ?Sized> Entries<T> {
    pub(crate) fn new() -> Self {
        Self {
            ordered: Vec::new(),
            keyed: HashMap::new(),
        }
    }

    /// Builds entries from a list that must not repeat an id.
    pub(crate) fn from_unique(registrants: impl IntoIterator<Item = Arc<T>>) -> Result<Self> {
        let mut entries = Self::new();
        for registrant in registrants {
            if entries.contains(registrant.id()) {
                return Err(Error::DuplicateId {
                    id: registrant.id().to_owned(),
                });
            }
            entries.insert(registrant);
        }
        Ok(entries)
    }

    pub(crate) fn len(&self) -> usize {
        self.ordered.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.keyed.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<T>> {
        self.keyed.get(id).cloned()
    }

    /// Returns `true` if `item` itself (not just its id) is registered.
    pub(crate) fn contains_item(&self, item: &Arc<T>) -> bool {
        self.keyed
            .get(item.id())
            .is_some_and(|current| Arc::ptr_eq(current, item))
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<T>> {
        self.ordered.clone()
    }

    pub(crate) fn as_slice(&self) -> &[Arc<T>] {
        &self.ordered
    }

    /// Inserts `item` unless its id is taken. First registration wins.
    pub(crate) fn insert(&mut self, item: Arc<T>) -> bool {
        match self.keyed.entry(item.id().to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&item));
                self.ordered.push(item);
                true
            }
        }
    }

    pub(crate) fn remove_id(&mut self, id: &str) -> Option<Arc<T>> {
        let removed = self.keyed.remove(id)?;
        if let Some(index) = self
            .ordered
            .iter()
            .position(|entry| Arc::ptr_eq(entry, &removed))
        {
            self.ordered.remove(index);
        }
        Some(removed)
    }

    pub(crate) fn remove_item(&mut self, item: &Arc<T>) -> bool {
        if !self.contains_item(item) {
            return false;
        }
        self.remove_id(item.id()).is_some()
    }
}

impl<T: ?Sized> Clone for Entries<T> {
    fn clone(&self) -> Self {
        Self {
            ordered: self.ordered.clone(),
            keyed: self.keyed.clone(),
        }
    }
}

impl<T: Identifiable + ?Sized> Default for Entries<T> {
    fn default() -> Self {
        Self::new()
    }
}
