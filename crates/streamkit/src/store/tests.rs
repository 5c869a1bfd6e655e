use std::fs;

use crate::{
    DataSerializer, JsonSerializer, PersistableFile, Platform, PlatformCatalog, StoreError,
    backup_path,
};

fn sample_catalog() -> PlatformCatalog {
    PlatformCatalog {
        platforms: vec![
            Platform::new("twitch", "Twitch"),
            Platform::new("kick", "Kick"),
        ],
    }
}

fn run_save_then_load<S: DataSerializer>(serializer: S) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir
        .path()
        .join(format!("catalog.{}", serializer.extension()));
    let store = PersistableFile::new(serializer);

    store.save(&path, &sample_catalog()).unwrap();
    let loaded: PlatformCatalog = store.load(&path).unwrap();

    assert_eq!(loaded, sample_catalog());
    assert!(!store.is_saving_blocked(&path));
}

fn run_overwrite_keeps_backup<S: DataSerializer>(serializer: S) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir
        .path()
        .join(format!("catalog.{}", serializer.extension()));
    let store = PersistableFile::new(serializer);

    store.save(&path, &PlatformCatalog::builtin()).unwrap();
    store.save(&path, &sample_catalog()).unwrap();

    let current: PlatformCatalog = store.load(&path).unwrap();
    let previous: PlatformCatalog = store.load(backup_path(&path)).unwrap();
    assert_eq!(current, sample_catalog());
    assert_eq!(previous, PlatformCatalog::builtin());
}

#[test]
fn json_save_then_load() {
    run_save_then_load(JsonSerializer::pretty());
    run_save_then_load(JsonSerializer::compact());
}

#[test]
fn json_overwrite_keeps_backup() {
    run_overwrite_keeps_backup(JsonSerializer::default());
}

#[cfg(feature = "toml")]
#[test]
fn toml_save_then_load() {
    run_save_then_load(crate::TomlSerializer);
}

#[cfg(feature = "toml")]
#[test]
fn toml_overwrite_keeps_backup() {
    run_overwrite_keeps_backup(crate::TomlSerializer);
}

#[test]
fn missing_file_is_not_found_and_not_blocked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let store = PersistableFile::new(JsonSerializer::default());

    let err = store.load::<PlatformCatalog>(&path).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(!store.is_saving_blocked(&path));

    store.save(&path, &sample_catalog()).unwrap();
    assert!(path.exists());
}

#[test]
fn corrupt_file_blocks_saving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    fs::write(&path, "{ not json").unwrap();
    let store = PersistableFile::new(JsonSerializer::default());

    let err = store.load::<PlatformCatalog>(&path).unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
    assert!(store.is_saving_blocked(&path));

    let err = store.save(&path, &sample_catalog()).unwrap_err();
    assert!(matches!(err, StoreError::SavingBlocked { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

    assert!(store.unblock_saving(&path));
    store.save(&path, &sample_catalog()).unwrap();
    let loaded: PlatformCatalog = store.load(&path).unwrap();
    assert_eq!(loaded, sample_catalog());
}

#[test]
fn blocking_is_keyed_by_absolute_path() {
    let store = PersistableFile::new(JsonSerializer::default());
    let relative = std::path::Path::new("settings.json");
    let absolute = std::env::current_dir().unwrap().join(relative);

    assert!(store.block_saving(relative));
    assert!(!store.block_saving(&absolute));
    assert!(store.is_saving_blocked(&absolute));
}

#[test]
fn blocking_covers_dot_dot_aliases() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let path = dir.path().join("corrupt.json");
    let alias = dir.path().join("sub").join("..").join(".").join("corrupt.json");
    fs::write(&path, "{ not json").unwrap();
    let store = PersistableFile::new(JsonSerializer::default());

    assert!(store.load::<PlatformCatalog>(&path).is_err());
    assert!(store.is_saving_blocked(&alias));

    let err = store.save(&alias, &sample_catalog()).unwrap_err();
    assert!(matches!(err, StoreError::SavingBlocked { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

    assert!(store.unblock_saving(&alias));
    assert!(!store.is_saving_blocked(&path));
}

#[test]
fn save_into_missing_directory_fails_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.json");
    let store = PersistableFile::new(JsonSerializer::default());

    let err = store.save(&path, &sample_catalog()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(!path.exists());
    assert!(!store.is_saving_blocked(&path));
}

#[test]
fn save_to_root_is_invalid() {
    let store = PersistableFile::new(JsonSerializer::default());
    let err = store.save("/", &sample_catalog()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath { .. }));
}

#[test]
fn backup_path_keeps_extension_last() {
    assert_eq!(
        backup_path(std::path::Path::new("/tmp/points.json")),
        std::path::Path::new("/tmp/points.bck.json")
    );
    assert_eq!(
        backup_path(std::path::Path::new("/tmp/points")),
        std::path::Path::new("/tmp/points.bck")
    );
}

#[cfg(unix)]
#[test]
fn backup_path_keeps_non_utf8_extension() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt, path::Path};

    let target = Path::new("/tmp").join(OsStr::from_bytes(b"points.j\xffson"));
    let other = Path::new("/tmp").join(OsStr::from_bytes(b"points.t\xfeoml"));

    assert_eq!(
        backup_path(&target),
        Path::new("/tmp").join(OsStr::from_bytes(b"points.bck.j\xffson"))
    );
    assert_ne!(backup_path(&target), backup_path(&other));
}
