use std::{sync::Arc, time::Duration};

use parking_lot::{
    RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::entries::Entries;
use crate::{Error, Identifiable, Operation, ReadOnlyRegistry, Registry, Result};

/// How long a [`LockRegistry`] waits for its lock before dropping an
/// operation.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(300);

/// The lock acquisition policy of a [`LockRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockTimeout {
    /// Wait at most this long, then report [`Error::Contended`].
    Bounded(Duration),
    /// Wait for as long as it takes. Operations never report contention.
    Blocking,
}

impl Default for LockTimeout {
    fn default() -> Self {
        Self::Bounded(DEFAULT_LOCK_TIMEOUT)
    }
}

/// A reader-writer locked registry suitable for sharing between a main loop
/// and background workers.
///
/// Registrants live in an insertion-ordered list paired with an id index, both
/// guarded by one [`RwLock`]. Reads run concurrently with each other but never
/// with a write. Every lock acquisition is bounded by the registry's
/// [`LockTimeout`]; an operation that times out is dropped and reported as
/// [`Error::Contended`] by the `try_*` methods.
///
/// Cloning a [`LockRegistry`] yields another handle to the same registrants.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Bounded waits under contention
/// - ❌ Wait-free reads
///
/// ## Recommended When
/// - Writes are frequent enough that copying the whole registry per write is
///   wasteful
/// - A caller must never stall behind a slow writer for longer than a known
///   bound
///
/// ## See Also
/// - [`SnapshotRegistry`]
/// - [`FrozenRegistry`]
///
/// [`SnapshotRegistry`]: crate::SnapshotRegistry
/// [`FrozenRegistry`]: crate::FrozenRegistry
pub struct LockRegistry<T: ?Sized> {
    pub(crate) state: Arc<RwLock<Entries<T>>>,
    timeout: LockTimeout,
}

impl<T: Identifiable + ?Sized> LockRegistry<T> {
    /// Creates an empty registry that waits at most
    /// [`DEFAULT_LOCK_TIMEOUT`] for its lock.
    pub fn new() -> Self {
        Self::with_timeout(LockTimeout::default())
    }

    /// Creates an empty registry with the given lock policy.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use streamkit::{LockRegistry, LockTimeout, Platform};
    ///
    /// let registry: LockRegistry<Platform> =
    ///     LockRegistry::with_timeout(LockTimeout::Bounded(Duration::from_millis(50)));
    /// assert_eq!(
    ///     registry.timeout(),
    ///     LockTimeout::Bounded(Duration::from_millis(50))
    /// );
    /// ```
    pub fn with_timeout(timeout: LockTimeout) -> Self {
        Self {
            state: Arc::new(RwLock::new(Entries::new())),
            timeout,
        }
    }

    /// Creates a registry pre-populated from a list of registrants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if two registrants share an id.
    pub fn from_registrants(
        registrants: impl IntoIterator<Item = Arc<T>>,
        timeout: LockTimeout,
    ) -> Result<Self> {
        Ok(Self {
            state: Arc::new(RwLock::new(Entries::from_unique(registrants)?)),
            timeout,
        })
    }

    /// The lock acquisition policy of this registry.
    pub const fn timeout(&self) -> LockTimeout {
        self.timeout
    }

    fn read(&self, op: Operation) -> Result<RwLockReadGuard<'_, Entries<T>>> {
        match self.timeout {
            LockTimeout::Blocking => Ok(self.state.read()),
            LockTimeout::Bounded(wait) => self
                .state
                .try_read_for(wait)
                .ok_or(Error::Contended { op }),
        }
    }

    fn write(&self, op: Operation) -> Result<RwLockWriteGuard<'_, Entries<T>>> {
        match self.timeout {
            LockTimeout::Blocking => Ok(self.state.write()),
            LockTimeout::Bounded(wait) => self
                .state
                .try_write_for(wait)
                .ok_or(Error::Contended { op }),
        }
    }

    fn upgradable_read(&self, op: Operation) -> Result<RwLockUpgradableReadGuard<'_, Entries<T>>> {
        match self.timeout {
            LockTimeout::Blocking => Ok(self.state.upgradable_read()),
            LockTimeout::Bounded(wait) => self
                .state
                .try_upgradable_read_for(wait)
                .ok_or(Error::Contended { op }),
        }
    }

    fn upgrade<'a>(
        &self,
        guard: RwLockUpgradableReadGuard<'a, Entries<T>>,
        op: Operation,
    ) -> Result<RwLockWriteGuard<'a, Entries<T>>> {
        match self.timeout {
            LockTimeout::Blocking => Ok(RwLockUpgradableReadGuard::upgrade(guard)),
            LockTimeout::Bounded(wait) => RwLockUpgradableReadGuard::try_upgrade_for(guard, wait)
                .map_err(|_| Error::Contended { op }),
        }
    }
}

impl<T: Identifiable + ?Sized> ReadOnlyRegistry<T> for LockRegistry<T> {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_all_registrants(&self) -> Result<Vec<Arc<T>>> {
        Ok(self.read(Operation::Snapshot)?.snapshot())
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_get(&self, id: &str) -> Result<Option<Arc<T>>> {
        Ok(self.read(Operation::Get)?.get(id))
    }

    fn len(&self) -> usize {
        self.read(Operation::Snapshot)
            .map(|entries| entries.len())
            .unwrap_or_default()
    }
}

impl<T: Identifiable + ?Sized> Registry<T> for LockRegistry<T> {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(id = item.id())))]
    fn try_register(&self, item: Arc<T>) -> Result<bool> {
        Ok(self.write(Operation::Register)?.insert(item))
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(id = item.id())))]
    fn try_unregister(&self, item: &Arc<T>) -> Result<bool> {
        Ok(self.write(Operation::Unregister)?.remove_item(item))
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_unregister_id(&self, id: &str) -> Result<bool> {
        let guard = self.upgradable_read(Operation::Unregister)?;
        if !guard.contains(id) {
            return Ok(false);
        }
        let mut entries = self.upgrade(guard, Operation::Unregister)?;
        Ok(entries.remove_id(id).is_some())
    }
}

impl<T: Identifiable + ?Sized> Default for LockRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for LockRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            timeout: self.timeout,
        }
    }
}
