use std::{
    collections::HashSet,
    ffi::OsString,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Component, Path, PathBuf},
};

use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{DataSerializer, StoreError};

/// Loads and atomically saves documents through a [`DataSerializer`].
///
/// Saves never write the target in place. The document is serialized into a
/// temporary file in the target's directory, synced, and renamed over the
/// target; the previous version is kept next to it as `<stem>.bck.<ext>`.
///
/// A path whose load fails (other than by not existing) is blocked for saving
/// until [`PersistableFile::unblock_saving`] is called.
///
/// # Example
/// ```
/// use streamkit::{JsonSerializer, PersistableFile, PlatformCatalog};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("platforms.json");
/// let store = PersistableFile::new(JsonSerializer::default());
///
/// store.save(&path, &PlatformCatalog::builtin()).unwrap();
/// let loaded: PlatformCatalog = store.load(&path).unwrap();
/// assert_eq!(loaded, PlatformCatalog::builtin());
/// ```
pub struct PersistableFile<S> {
    serializer: S,
    blocked: Mutex<HashSet<PathBuf>>,
}

impl<S: DataSerializer> PersistableFile<S> {
    /// Creates a store with no blocked paths.
    pub fn new(serializer: S) -> Self {
        Self {
            serializer,
            blocked: Mutex::new(HashSet::new()),
        }
    }

    /// The serializer documents are read and written with.
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Returns `true` if saves to `path` are currently refused.
    pub fn is_saving_blocked(&self, path: impl AsRef<Path>) -> bool {
        self.blocked.lock().contains(&absolute(path.as_ref()))
    }

    /// Refuses further saves to `path`. Returns `false` if it was already
    /// blocked.
    pub fn block_saving(&self, path: impl AsRef<Path>) -> bool {
        self.blocked.lock().insert(absolute(path.as_ref()))
    }

    /// Allows saves to `path` again. Returns `false` if it was not blocked.
    pub fn unblock_saving(&self, path: impl AsRef<Path>) -> bool {
        self.blocked.lock().remove(&absolute(path.as_ref()))
    }

    /// Reads a `T` from `path`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the file does not exist
    /// - [`StoreError::Io`] if it cannot be opened
    /// - a serializer error if its contents are not a valid `T`
    ///
    /// Every error except [`StoreError::NotFound`] blocks further saves to
    /// `path`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))
    )]
    pub fn load<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T, StoreError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                #[cfg(feature = "tracing")]
                tracing::warn!("file not found");
                return Err(StoreError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(self.load_failed(path, StoreError::io(path, err))),
        };

        self.serializer
            .deserialize(BufReader::new(file))
            .map_err(|err| self.load_failed(path, err))
    }

    /// Atomically writes `data` to `path`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SavingBlocked`] if an earlier load of `path` failed
    /// - [`StoreError::InvalidPath`] if `path` has no parent directory
    /// - [`StoreError::Io`] or a serializer error if writing fails; the
    ///   previous document is left untouched
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))
    )]
    pub fn save<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        data: &T,
    ) -> Result<(), StoreError> {
        let target = absolute(path.as_ref());
        if self.is_saving_blocked(&target) {
            #[cfg(feature = "tracing")]
            tracing::warn!("save attempts are blocked on this file");
            return Err(StoreError::SavingBlocked { path: target });
        }

        let Some(directory) = target.parent() else {
            return Err(StoreError::InvalidPath { path: target });
        };

        let result = self.write_atomically(directory, &target, data);
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::error!(error = %err, "could not save file to disk");
        }
        result
    }

    fn write_atomically<T: Serialize + ?Sized>(
        &self,
        directory: &Path,
        target: &Path,
        data: &T,
    ) -> Result<(), StoreError> {
        let mut temp =
            NamedTempFile::new_in(directory).map_err(|err| StoreError::io(directory, err))?;
        let temp_path = temp.path().to_path_buf();
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.serializer.serialize(&mut writer, data)?;
            writer
                .flush()
                .map_err(|err| StoreError::io(&temp_path, err))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|err| StoreError::io(&temp_path, err))?;

        if target.exists() {
            let backup = backup_path(target);
            fs::copy(target, &backup).map_err(|err| StoreError::io(backup, err))?;
        }

        temp.persist(target)
            .map_err(|err| StoreError::io(target, err.error))?;
        Ok(())
    }

    fn load_failed(&self, path: &Path, err: StoreError) -> StoreError {
        #[cfg(feature = "tracing")]
        tracing::error!(
            error = %err,
            "could not load file from disk; further save attempts will be blocked"
        );
        self.block_saving(path);
        err
    }
}

/// The sibling file the previous version of `target` is copied to.
pub fn backup_path(target: &Path) -> PathBuf {
    match target.extension() {
        Some(ext) => {
            let mut extension = OsString::from("bck.");
            extension.push(ext);
            target.with_extension(extension)
        }
        None => target.with_extension("bck"),
    }
}

/// Absolute form of `path` with `.` and `..` collapsed, so aliases of one
/// file share a key. Symlinks are not resolved; the file may not exist yet.
fn absolute(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if !matches!(normalized.components().next_back(), Some(Component::RootDir)) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
