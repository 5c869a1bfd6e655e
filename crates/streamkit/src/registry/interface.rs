use std::sync::Arc;

use crate::{Identifiable, Result};

/// Read access to a keyed collection of registrants.
///
/// The `try_*` methods report lock contention as
/// [`Error::Contended`](crate::Error::Contended). The plain methods are their
/// infallible counterparts: a contended read degrades to an empty snapshot or
/// `None`, which callers cannot tell apart from a legitimately empty result.
pub trait ReadOnlyRegistry<T: Identifiable + ?Sized> {
    /// Copies out every registrant in insertion order.
    ///
    /// The returned list is a snapshot; later mutations of the registry do not
    /// affect it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contended`](crate::Error::Contended) if the
    /// implementation could not acquire its lock in time.
    fn try_all_registrants(&self) -> Result<Vec<Arc<T>>>;

    /// Looks up the registrant with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contended`](crate::Error::Contended) if the
    /// implementation could not acquire its lock in time.
    fn try_get(&self, id: &str) -> Result<Option<Arc<T>>>;

    /// Copies out every registrant in insertion order, or nothing if the
    /// registry was contended.
    fn all_registrants(&self) -> Vec<Arc<T>> {
        degrade(self.try_all_registrants(), Vec::new)
    }

    /// Looks up the registrant with the given id, returning `None` if it is
    /// absent or the registry was contended.
    fn get(&self, id: &str) -> Option<Arc<T>> {
        degrade(self.try_get(id), || None)
    }

    /// Returns `true` if a registrant with the given id is visible.
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The number of visible registrants.
    fn len(&self) -> usize {
        self.all_registrants().len()
    }

    /// Returns `true` if no registrants are visible.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registry that can be mutated through a shared reference.
///
/// Registration is first-come-first-served: a second registrant with an id
/// that is already taken is rejected and the original stays in place.
pub trait Registry<T: Identifiable + ?Sized>: ReadOnlyRegistry<T> {
    /// Inserts `item` under its id.
    ///
    /// Returns `Ok(true)` if it was inserted and `Ok(false)` if the id was
    /// already taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contended`](crate::Error::Contended) if the
    /// implementation could not acquire its lock in time. Nothing was
    /// inserted.
    fn try_register(&self, item: Arc<T>) -> Result<bool>;

    /// Removes `item` if it is the registrant currently held under its id.
    ///
    /// A different object that merely shares the id is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contended`](crate::Error::Contended) if the
    /// implementation could not acquire its lock in time.
    fn try_unregister(&self, item: &Arc<T>) -> Result<bool>;

    /// Removes whichever registrant is held under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contended`](crate::Error::Contended) if the
    /// implementation could not acquire its lock in time.
    fn try_unregister_id(&self, id: &str) -> Result<bool>;

    /// Inserts `item`, returning whether the insertion took effect.
    ///
    /// `false` covers both a taken id and a dropped, contended call.
    fn register(&self, item: Arc<T>) -> bool {
        degrade(self.try_register(item), || false)
    }

    /// Removes `item`, returning whether a removal took effect.
    fn unregister(&self, item: &Arc<T>) -> bool {
        degrade(self.try_unregister(item), || false)
    }

    /// Removes the registrant held under `id`, returning whether a removal took
    /// effect.
    fn unregister_id(&self, id: &str) -> bool {
        degrade(self.try_unregister_id(id), || false)
    }
}

// Contention is the only error a registry operation can raise.
fn degrade<V>(result: Result<V>, fallback: impl FnOnce() -> V) -> V {
    match result {
        Ok(value) => value,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "registry operation dropped");
            fallback()
        }
    }
}
