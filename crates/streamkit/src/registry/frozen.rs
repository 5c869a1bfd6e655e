use std::sync::Arc;

use super::entries::Entries;
use crate::{Error, Identifiable, ReadOnlyRegistry, Result};

/// An immutable registry built once from a fixed list.
///
/// There is no synchronisation at all: the registrants never change after
/// construction, so a [`FrozenRegistry`] can be shared freely (for example
/// behind an [`Arc`]) and read from any thread.
///
/// # Example
/// ```
/// use streamkit::{FrozenRegistry, ReadOnlyRegistry, builtin_platforms};
///
/// let platforms = FrozenRegistry::new(builtin_platforms()).unwrap();
/// assert_eq!(platforms.get("twitch").unwrap().name, "Twitch");
/// ```
pub struct FrozenRegistry<T: ?Sized> {
    entries: Entries<T>,
}

impl<T: Identifiable + ?Sized> FrozenRegistry<T> {
    /// Builds a registry from `registrants`, preserving their order.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRegistry`] if `registrants` is empty
    /// - [`Error::DuplicateId`] if two registrants share an id
    pub fn new(registrants: impl IntoIterator<Item = Arc<T>>) -> Result<Self> {
        let entries = Entries::from_unique(registrants)?;
        if entries.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        Ok(Self { entries })
    }

    /// Iterates over the registrants without copying them.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.as_slice().iter()
    }

    /// Picks a registrant uniformly at random.
    #[cfg_attr(docsrs, doc(cfg(feature = "rand")))]
    #[cfg(feature = "rand")]
    pub fn choose<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<Arc<T>> {
        use rand::seq::IndexedRandom;

        self.entries.as_slice().choose(rng).cloned()
    }
}

impl<T: Identifiable + ?Sized> ReadOnlyRegistry<T> for FrozenRegistry<T> {
    fn try_all_registrants(&self) -> Result<Vec<Arc<T>>> {
        Ok(self.entries.snapshot())
    }

    fn try_get(&self, id: &str) -> Result<Option<Arc<T>>> {
        Ok(self.entries.get(id))
    }

    fn contains(&self, id: &str) -> bool {
        self.entries.contains(id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: ?Sized> Clone for FrozenRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
